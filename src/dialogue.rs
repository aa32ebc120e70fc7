//! Add-training dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition` does no I/O and returns the effects for the caller to run.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::DialogueState;
pub use transition::{transition, Flow, TransitionError, TransitionResult};
