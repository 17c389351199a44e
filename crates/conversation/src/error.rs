//! Error types for conversation handling.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur while handling an inbound event.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Ledger or state storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] DatabaseError),

    /// A reply could not be delivered.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Result type for conversation operations.
pub type Result<T> = std::result::Result<T, ConversationError>;
