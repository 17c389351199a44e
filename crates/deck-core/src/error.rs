//! Error types for deck generation.

use thiserror::Error;

/// Errors that can occur while generating a deck.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request is missing data or out of range.
    #[error("invalid deck spec: {0}")]
    InvalidSpec(String),

    /// The theme id is not in the catalog.
    #[error("unknown theme: {0}")]
    UnknownTheme(u32),

    /// The document could not be rendered or encoded.
    #[error("render failed: {0}")]
    Render(String),
}
