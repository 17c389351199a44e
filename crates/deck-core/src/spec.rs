//! The request for one deck.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::pages::{is_valid_page_count, MAX_PAGES, MIN_PAGES};
use crate::theme::{Theme, ThemeCatalog};

/// Everything a generator needs to build one deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSpec {
    /// Subject of the deck, shown on the title slide.
    pub topic: String,
    /// Name of the person the deck is made for.
    pub requester_name: String,
    /// Total number of slides, title slide included.
    pub page_count: u32,
    /// Theme id from the [`ThemeCatalog`].
    pub theme_id: u32,
}

impl DeckSpec {
    pub fn new(
        topic: impl Into<String>,
        requester_name: impl Into<String>,
        page_count: u32,
        theme_id: u32,
    ) -> Self {
        Self {
            topic: topic.into(),
            requester_name: requester_name.into(),
            page_count,
            theme_id,
        }
    }

    /// Resolve the theme against the built-in catalog.
    pub fn theme(&self) -> Result<&'static Theme, GenerationError> {
        ThemeCatalog::builtin()
            .get(self.theme_id)
            .ok_or(GenerationError::UnknownTheme(self.theme_id))
    }

    /// Check the spec against the page and theme catalogs.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.topic.trim().is_empty() {
            return Err(GenerationError::InvalidSpec("topic is empty".to_string()));
        }
        if !is_valid_page_count(self.page_count) {
            return Err(GenerationError::InvalidSpec(format!(
                "page count {} outside {}..={}",
                self.page_count, MIN_PAGES, MAX_PAGES
            )));
        }
        self.theme()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_spec() {
        let spec = DeckSpec::new("Space", "Ali", 10, 2);
        assert!(spec.validate().is_ok());
        assert_eq!(spec.theme().unwrap().id, 2);
    }

    #[test]
    fn test_rejects_empty_topic() {
        let spec = DeckSpec::new("   ", "Ali", 10, 2);
        assert!(matches!(spec.validate(), Err(GenerationError::InvalidSpec(_))));
    }

    #[test]
    fn test_rejects_page_count_outside_catalog() {
        let spec = DeckSpec::new("Space", "Ali", 3, 2);
        assert!(matches!(spec.validate(), Err(GenerationError::InvalidSpec(_))));
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let spec = DeckSpec::new("Space", "Ali", 10, 42);
        assert!(matches!(spec.validate(), Err(GenerationError::UnknownTheme(42))));
    }
}
