//! Static generator - returns placeholder bytes.

use std::sync::Arc;

use deck_core::{async_trait, DeckArtifact, DeckGenerator, DeckSpec, GenerationError};
use tokio::sync::Mutex;

/// A generator that validates the spec and returns a small text payload.
///
/// Clones share the request log, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct StaticGenerator {
    requests: Arc<Mutex<Vec<DeckSpec>>>,
}

impl StaticGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every spec this generator has been asked for, in order.
    pub async fn requests(&self) -> Vec<DeckSpec> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl DeckGenerator for StaticGenerator {
    async fn generate(&self, spec: &DeckSpec) -> Result<DeckArtifact, GenerationError> {
        self.requests.lock().await.push(spec.clone());
        spec.validate()?;

        let body = format!("{} | {} | {} slides", spec.topic, spec.requester_name, spec.page_count);
        Ok(DeckArtifact::new(body.into_bytes(), spec.page_count))
    }

    fn name(&self) -> &str {
        "StaticGenerator"
    }
}
