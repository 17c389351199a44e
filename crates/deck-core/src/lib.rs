//! Core trait and types for slide deck generation.
//!
//! This crate provides the shared vocabulary between the conversation core
//! and deck generators. It defines:
//!
//! - [`DeckSpec`] - The fully assembled request for one deck
//! - [`Theme`] / [`ThemeCatalog`] - The fixed set of visual styles
//! - [`DeckGenerator`] - The trait that all generators implement
//! - [`GenerationError`] - Error types for generation
//!
//! # Example
//!
//! ```rust
//! use deck_core::{async_trait, DeckArtifact, DeckGenerator, DeckSpec, GenerationError};
//!
//! struct Blank;
//!
//! #[async_trait]
//! impl DeckGenerator for Blank {
//!     async fn generate(&self, spec: &DeckSpec) -> Result<DeckArtifact, GenerationError> {
//!         spec.validate()?;
//!         Ok(DeckArtifact::new(Vec::new(), spec.page_count))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Blank"
//!     }
//! }
//! ```

mod error;
mod generator;
mod pages;
mod spec;
mod theme;

pub use error::GenerationError;
pub use generator::{DeckArtifact, DeckGenerator};
pub use pages::{is_valid_page_count, page_counts, MAX_PAGES, MIN_PAGES};
pub use spec::DeckSpec;
pub use theme::{Theme, ThemeCatalog, THEMES};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
