//! Test doubles for dispatcher tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::telegram::{MessageSender, ReplyMarkup, TransportError};

/// One message recorded by the mock sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub with_menu: bool,
}

/// Sender that records every message instead of doing network I/O
#[derive(Default)]
pub struct MockSender {
    sent: Mutex<Vec<SentMessage>>,
    fail_sends: Mutex<bool>,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail with a network error until restored
    pub fn fail_sends(&self) {
        *self.fail_sends.lock().unwrap() = true;
    }

    pub fn restore_sends(&self) {
        *self.fail_sends.lock().unwrap() = false;
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|message| message.text.clone())
            .collect()
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(TransportError::network("mock send failure"));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            with_menu: keyboard.is_some(),
        });
        Ok(())
    }
}
