//! Top-level command routing.
//!
//! Maps inbound text to one of the five fixed menu actions by exact match
//! against the button labels. Everything else is unrecognized; there is no
//! fuzzy matching and no trimming.

use crate::text::menu;

/// The five menu actions a user can pick when no dialogue is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Recent,
    Stats,
    Motivate,
    Clear,
}

impl Command {
    /// Classify a top-level message. `None` means the text is not one of
    /// the five labels and falls through to the unrecognized reply.
    pub fn from_text(text: &str) -> Option<Self> {
        match text {
            menu::ADD => Some(Command::Add),
            menu::RECENT => Some(Command::Recent),
            menu::STATS => Some(Command::Stats),
            menu::MOTIVATE => Some(Command::Motivate),
            menu::CLEAR => Some(Command::Clear),
            _ => None,
        }
    }
}
