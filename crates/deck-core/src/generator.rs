//! The generator trait.

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::spec::DeckSpec;

/// A generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckArtifact {
    /// Encoded document.
    pub bytes: Vec<u8>,
    /// Number of slides in the document.
    pub slide_count: u32,
}

impl DeckArtifact {
    pub fn new(bytes: Vec<u8>, slide_count: u32) -> Self {
        Self { bytes, slide_count }
    }
}

/// Turns a [`DeckSpec`] into a document.
///
/// Implementations keep no state between calls. This trait is object-safe
/// and can be used as `Arc<dyn DeckGenerator>`.
#[async_trait]
pub trait DeckGenerator: Send + Sync {
    /// Generate a deck for `spec`.
    async fn generate(&self, spec: &DeckSpec) -> Result<DeckArtifact, GenerationError>;

    /// Get a human-readable name for this generator.
    fn name(&self) -> &str;
}
