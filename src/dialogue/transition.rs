//! Pure dialogue transition function

use super::{DialogueState, Effect, Event};
use crate::db::Training;
use crate::text;
use thiserror::Error;

/// What the dispatcher should do with the session after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep the session alive in the given state
    Continue(DialogueState),
    /// Drop the session; the next message goes to top-level routing
    Terminate,
}

/// Result of a dialogue transition
#[derive(Debug)]
pub struct TransitionResult {
    pub flow: Flow,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn advance(state: DialogueState) -> Self {
        Self {
            flow: Flow::Continue(state),
            effects: vec![],
        }
    }

    pub fn terminate() -> Self {
        Self {
            flow: Flow::Terminate,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors for event and state pairs outside the transition table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no transition from {state:?} on {event:?}")]
    UnexpectedEvent {
        state: DialogueState,
        event: Event,
    },
}

/// Pure transition function for the add-training flow.
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// Every accepted transition emits exactly one reply; the successful final
/// step additionally emits the save effect, ordered before its
/// confirmation.
pub fn transition(
    state: &DialogueState,
    user_id: i64,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Cancel wins from anywhere, Idle included.
        (_, Event::Cancel) => {
            Ok(TransitionResult::terminate().with_effect(Effect::reply(text::CANCELLED)))
        }

        (DialogueState::Idle, Event::StartAdd) => {
            Ok(TransitionResult::advance(DialogueState::AwaitingDate)
                .with_effect(Effect::reply(text::DATE_PROMPT)))
        }

        (DialogueState::AwaitingDate, Event::Text(date)) => {
            Ok(TransitionResult::advance(DialogueState::AwaitingKind { date })
                .with_effect(Effect::reply(text::KIND_PROMPT)))
        }

        (DialogueState::AwaitingKind { date }, Event::Text(kind)) => Ok(
            TransitionResult::advance(DialogueState::AwaitingDuration {
                date: date.clone(),
                kind,
            })
            .with_effect(Effect::reply(text::DURATION_PROMPT)),
        ),

        (DialogueState::AwaitingDuration { date, kind }, Event::Text(input)) => {
            match input.trim().parse::<i64>() {
                Ok(duration) => {
                    let training = Training {
                        user_id,
                        date: date.clone(),
                        kind: kind.clone(),
                        duration,
                    };
                    Ok(TransitionResult::terminate()
                        .with_effect(Effect::SaveTraining(training))
                        .with_effect(Effect::reply_with_menu(text::SAVED)))
                }
                // Stay put with the collected date and kind intact.
                Err(_) => Ok(
                    TransitionResult::advance(DialogueState::AwaitingDuration {
                        date: date.clone(),
                        kind: kind.clone(),
                    })
                    .with_effect(Effect::reply(text::NOT_A_NUMBER)),
                ),
            }
        }

        (state, event) => Err(TransitionError::UnexpectedEvent {
            state: state.clone(),
            event,
        }),
    }
}
