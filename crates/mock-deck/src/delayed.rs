//! Delayed generator - wraps another generator with artificial delay.

use std::time::Duration;

use deck_core::{async_trait, DeckArtifact, DeckGenerator, DeckSpec, GenerationError};
use tokio::time::sleep;

/// A generator that waits before delegating to another generator.
///
/// Useful for widening race windows in concurrency tests.
pub struct DelayedGenerator<G: DeckGenerator> {
    inner: G,
    delay: Duration,
}

impl<G: DeckGenerator> DelayedGenerator<G> {
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a generator with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: DeckGenerator> DeckGenerator for DelayedGenerator<G> {
    async fn generate(&self, spec: &DeckSpec) -> Result<DeckArtifact, GenerationError> {
        sleep(self.delay).await;
        self.inner.generate(spec).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }
}
