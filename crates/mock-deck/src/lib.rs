//! Mock deck generators for testing.
//!
//! This crate provides implementations of `DeckGenerator` that never render
//! a real document:
//! - `StaticGenerator` - Returns placeholder bytes and records every request
//! - `FailingGenerator` - Always fails
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! For real output, use the `pptx-deck` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_deck::{DeckGenerator, DeckSpec, StaticGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_deck::GenerationError> {
//!     let generator = StaticGenerator::new();
//!     let deck = generator.generate(&DeckSpec::new("Space", "Ali", 10, 2)).await?;
//!     assert_eq!(deck.slide_count, 10);
//!     assert_eq!(generator.requests().await.len(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod failing;
mod fixed;

// Re-export deck-core types for convenience
pub use deck_core::{async_trait, DeckArtifact, DeckGenerator, DeckSpec, GenerationError};

pub use delayed::DelayedGenerator;
pub use failing::FailingGenerator;
pub use fixed::StaticGenerator;
