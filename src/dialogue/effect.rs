//! Effects requested by dialogue transitions

use crate::db::Training;

/// Side effects for the dispatcher to execute, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one message to the user
    Reply {
        text: String,
        /// Attach the main menu keyboard to this message
        with_menu: bool,
    },
    /// Persist one completed training
    SaveTraining(Training),
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            with_menu: false,
        }
    }

    /// Reply that re-shows the main menu keyboard
    pub fn reply_with_menu(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            with_menu: true,
        }
    }
}
