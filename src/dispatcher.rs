//! Message dispatch
//!
//! Hands each inbound message either to the user's active dialogue or to
//! top-level command routing, then executes the resulting effects. The
//! poll loop awaits every `handle` call before starting the next, so
//! session reads and writes never interleave.

#[cfg(test)]
pub mod testing;

use std::collections::HashMap;

use rand::seq::SliceRandom;

use crate::db::{Database, DbError, DEFAULT_RECENT_LIMIT};
use crate::dialogue::{transition, DialogueState, Effect, Event, Flow};
use crate::router::Command;
use crate::telegram::{main_menu, MessageSender, ReplyMarkup};
use crate::text;

/// Per-user routing over a shared store and one outbound sender.
///
/// A user appears in `sessions` only while the add flow is active; absence
/// means idle. Sessions live in memory and do not survive a restart.
pub struct Dispatcher<S: MessageSender> {
    db: Database,
    sender: S,
    sessions: HashMap<i64, DialogueState>,
}

impl<S: MessageSender> Dispatcher<S> {
    pub fn new(db: Database, sender: S) -> Self {
        Self {
            db,
            sender,
            sessions: HashMap::new(),
        }
    }

    /// Handle one inbound message end to end.
    ///
    /// Faults never escape. Storage errors answer with a generic failure
    /// text; send errors are logged and dropped.
    pub async fn handle(&mut self, user_id: i64, text: &str) {
        // An active dialogue captures everything except the cancel command.
        if let Some(state) = self.sessions.get(&user_id).cloned() {
            let event = if text == text::CANCEL_COMMAND {
                Event::Cancel
            } else {
                Event::Text(text.to_string())
            };
            self.drive_dialogue(user_id, state, event).await;
            return;
        }

        if text == text::START_COMMAND {
            self.deliver(user_id, text::GREETING, Some(&main_menu())).await;
            return;
        }

        match Command::from_text(text) {
            Some(Command::Add) => {
                self.drive_dialogue(user_id, DialogueState::Idle, Event::StartAdd)
                    .await;
            }
            Some(Command::Recent) => self.handle_recent(user_id).await,
            Some(Command::Stats) => self.handle_stats(user_id).await,
            Some(Command::Motivate) => self.handle_motivate(user_id).await,
            Some(Command::Clear) => self.handle_clear(user_id).await,
            None => self.deliver(user_id, text::UNRECOGNIZED, None).await,
        }
    }

    /// Run one dialogue transition and execute its effects in order.
    ///
    /// A failed save aborts before the flow is applied, leaving the session
    /// in the duration state with its collected data, so the user can send
    /// the duration again.
    async fn drive_dialogue(&mut self, user_id: i64, state: DialogueState, event: Event) {
        let result = match transition(&state, user_id, event) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(user_id, error = %e, "Dialogue rejected event");
                return;
            }
        };

        for effect in result.effects {
            match effect {
                Effect::SaveTraining(training) => {
                    if let Err(e) = self.db.insert_training(&training) {
                        tracing::error!(user_id, error = %e, "Failed to save training");
                        self.deliver(user_id, text::STORE_FAILURE, None).await;
                        return;
                    }
                }
                Effect::Reply { text, with_menu } => {
                    let menu = with_menu.then(main_menu);
                    self.deliver(user_id, &text, menu.as_ref()).await;
                }
            }
        }

        match result.flow {
            Flow::Continue(next) => {
                self.sessions.insert(user_id, next);
            }
            Flow::Terminate => {
                self.sessions.remove(&user_id);
            }
        }
    }

    async fn handle_recent(&self, user_id: i64) {
        match self.db.recent_trainings(user_id, DEFAULT_RECENT_LIMIT) {
            Ok(trainings) if trainings.is_empty() => {
                self.deliver(user_id, text::NO_TRAININGS, None).await;
            }
            Ok(trainings) => {
                self.deliver(user_id, &text::recent_reply(&trainings), None)
                    .await;
            }
            Err(e) => self.report_store_failure(user_id, "list", &e).await,
        }
    }

    async fn handle_stats(&self, user_id: i64) {
        match self.db.training_stats(user_id) {
            Ok(stats) => self.deliver(user_id, &text::stats_reply(&stats), None).await,
            Err(e) => self.report_store_failure(user_id, "stats", &e).await,
        }
    }

    async fn handle_motivate(&self, user_id: i64) {
        let quote = {
            let mut rng = rand::thread_rng();
            text::MOTIVATIONS
                .choose(&mut rng)
                .copied()
                .unwrap_or(text::MOTIVATIONS[0])
        };
        self.deliver(user_id, &text::motivation_reply(quote), None)
            .await;
    }

    async fn handle_clear(&self, user_id: i64) {
        match self.db.clear_trainings(user_id) {
            Ok(()) => self.deliver(user_id, text::CLEARED, None).await,
            Err(e) => self.report_store_failure(user_id, "clear", &e).await,
        }
    }

    async fn report_store_failure(&self, user_id: i64, action: &str, error: &DbError) {
        tracing::error!(user_id, action, error = %error, "Storage operation failed");
        self.deliver(user_id, text::STORE_FAILURE, None).await;
    }

    /// Best-effort send. Delivery failures are logged and dropped; the
    /// user can always send another message.
    async fn deliver(&self, user_id: i64, message: &str, keyboard: Option<&ReplyMarkup>) {
        if let Err(e) = self.sender.send_message(user_id, message, keyboard).await {
            tracing::warn!(user_id, error = %e, "Failed to send message");
        }
    }
}
