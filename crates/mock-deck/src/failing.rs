//! Failing generator - never produces a deck.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use deck_core::{async_trait, DeckArtifact, DeckGenerator, DeckSpec, GenerationError};

/// A generator that always returns [`GenerationError::Render`].
#[derive(Debug, Clone, Default)]
pub struct FailingGenerator {
    calls: Arc<AtomicUsize>,
}

impl FailingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `generate` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeckGenerator for FailingGenerator {
    async fn generate(&self, _spec: &DeckSpec) -> Result<DeckArtifact, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GenerationError::Render("mock failure".to_string()))
    }

    fn name(&self) -> &str {
        "FailingGenerator"
    }
}
