//! PowerPoint deck generator for Slayd Bot.
//!
//! [`PptxGenerator`] implements [`deck_core::DeckGenerator`] by writing a
//! minimal Office Open XML presentation: a title slide on the theme's primary
//! colour followed by `page_count - 1` content slides on its accent colour.
//!
//! # Example
//!
//! ```rust
//! use deck_core::{DeckGenerator, DeckSpec};
//! use pptx_deck::PptxGenerator;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), deck_core::GenerationError> {
//! let generator = PptxGenerator::new();
//! let deck = generator.generate(&DeckSpec::new("Space", "Ali", 10, 2)).await?;
//! assert_eq!(deck.slide_count, 10);
//! # Ok(())
//! # }
//! ```

mod generator;
mod parts;
mod xml;

pub use generator::PptxGenerator;
