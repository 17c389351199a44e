//! Reply sink trait and implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ConversationError;

/// One button: what the user sees and what comes back when they press it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub payload: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Trait for replying to users.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), ConversationError>;

    /// Send a prompt with rows of buttons.
    async fn send_choices(
        &self,
        recipient: i64,
        text: &str,
        rows: &[Vec<Choice>],
    ) -> Result<(), ConversationError>;

    /// Send a file.
    ///
    /// # Arguments
    /// * `recipient` - Chat to send to
    /// * `file_name` - Name shown for the attachment
    /// * `bytes` - File contents
    /// * `caption` - Text shown under the attachment
    async fn send_document(
        &self,
        recipient: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), ConversationError>;
}

/// A sink that discards all replies.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

#[async_trait]
impl ReplySink for NoOpSink {
    async fn send_text(&self, _recipient: i64, _text: &str) -> Result<(), ConversationError> {
        Ok(())
    }

    async fn send_choices(
        &self,
        _recipient: i64,
        _text: &str,
        _rows: &[Vec<Choice>],
    ) -> Result<(), ConversationError> {
        Ok(())
    }

    async fn send_document(
        &self,
        _recipient: i64,
        _file_name: &str,
        _bytes: Vec<u8>,
        _caption: &str,
    ) -> Result<(), ConversationError> {
        Ok(())
    }
}

/// A sink that logs every reply.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl ReplySink for LoggingSink {
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), ConversationError> {
        tracing::info!("Sending text to {}: {}", recipient, text);
        Ok(())
    }

    async fn send_choices(
        &self,
        recipient: i64,
        text: &str,
        rows: &[Vec<Choice>],
    ) -> Result<(), ConversationError> {
        let buttons: usize = rows.iter().map(Vec::len).sum();
        tracing::info!("Sending {} choices to {}: {}", buttons, recipient, text);
        Ok(())
    }

    async fn send_document(
        &self,
        recipient: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), ConversationError> {
        tracing::info!(
            "Sending {} ({} bytes) to {}: {}",
            file_name,
            bytes.len(),
            recipient,
            caption
        );
        Ok(())
    }
}

/// A reply captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        recipient: i64,
        text: String,
    },
    Choices {
        recipient: i64,
        text: String,
        rows: Vec<Vec<Choice>>,
    },
    Document {
        recipient: i64,
        file_name: String,
        bytes: Vec<u8>,
        caption: String,
    },
}

/// A sink that keeps every reply in memory.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    replies: Arc<Mutex<Vec<Reply>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All replies so far, oldest first.
    pub async fn replies(&self) -> Vec<Reply> {
        self.replies.lock().await.clone()
    }

    /// Documents sent so far.
    pub async fn documents(&self) -> Vec<Reply> {
        self.replies
            .lock()
            .await
            .iter()
            .filter(|reply| matches!(reply, Reply::Document { .. }))
            .cloned()
            .collect()
    }

    /// The most recent reply, if any.
    pub async fn last(&self) -> Option<Reply> {
        self.replies.lock().await.last().cloned()
    }

    pub async fn clear(&self) {
        self.replies.lock().await.clear();
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send_text(&self, recipient: i64, text: &str) -> Result<(), ConversationError> {
        self.replies.lock().await.push(Reply::Text {
            recipient,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_choices(
        &self,
        recipient: i64,
        text: &str,
        rows: &[Vec<Choice>],
    ) -> Result<(), ConversationError> {
        self.replies.lock().await.push(Reply::Choices {
            recipient,
            text: text.to_string(),
            rows: rows.to_vec(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        recipient: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), ConversationError> {
        self.replies.lock().await.push(Reply::Document {
            recipient,
            file_name: file_name.to_string(),
            bytes,
            caption: caption.to_string(),
        });
        Ok(())
    }
}
