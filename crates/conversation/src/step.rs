//! Dialogue steps and the data collected along the way.

use std::fmt;

use deck_core::DeckSpec;
use serde::{Deserialize, Serialize};

/// Position of a user in the deck dialogue.
///
/// The flow is strictly linear:
/// `Idle → AwaitingName → AwaitingPageCount → AwaitingTheme → AwaitingTopic → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    Idle,
    AwaitingName,
    AwaitingPageCount,
    AwaitingTheme,
    AwaitingTopic,
}

impl Step {
    /// Storage code for this step.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Idle => "idle",
            Step::AwaitingName => "awaiting_name",
            Step::AwaitingPageCount => "awaiting_page_count",
            Step::AwaitingTheme => "awaiting_theme",
            Step::AwaitingTopic => "awaiting_topic",
        }
    }

    /// Parse a storage code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "idle" => Some(Step::Idle),
            "awaiting_name" => Some(Step::AwaitingName),
            "awaiting_page_count" => Some(Step::AwaitingPageCount),
            "awaiting_theme" => Some(Step::AwaitingTheme),
            "awaiting_topic" => Some(Step::AwaitingTopic),
            _ => None,
        }
    }

    /// Whether this step is answered with free text (as opposed to a choice).
    pub fn expects_text(&self) -> bool {
        matches!(self, Step::AwaitingName | Step::AwaitingTopic)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers gathered so far in the current dialogue.
///
/// Stored as a JSON object; absent answers are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collected {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<u32>,
}

impl Collected {
    /// Build the deck request once every answer is present.
    pub fn deck_spec(&self, topic: &str) -> Option<DeckSpec> {
        let name = self.full_name.as_deref()?;
        Some(DeckSpec::new(topic, name, self.pages?, self.theme_id?))
    }

    pub fn to_json(&self) -> String {
        // Options of strings and integers cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A user's full conversation row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub step: Step,
    pub collected: Collected,
}

impl ConversationState {
    pub fn new(step: Step, collected: Collected) -> Self {
        Self { step, collected }
    }

    /// The `(Idle, {})` state.
    pub fn idle() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_codes_roundtrip() {
        for step in [
            Step::Idle,
            Step::AwaitingName,
            Step::AwaitingPageCount,
            Step::AwaitingTheme,
            Step::AwaitingTopic,
        ] {
            assert_eq!(Step::from_code(step.as_str()), Some(step));
        }
        assert_eq!(Step::from_code("4"), None);
    }

    #[test]
    fn test_collected_json_shape() {
        let collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(10),
            theme_id: None,
        };
        assert_eq!(collected.to_json(), r#"{"full_name":"Ali","pages":10}"#);
        assert_eq!(Collected::default().to_json(), "{}");
        assert_eq!(Collected::from_json("{}").unwrap(), Collected::default());
    }

    #[test]
    fn test_collected_ignores_unknown_fields() {
        let collected = Collected::from_json(r#"{"full_name":"Ali","design":3}"#).unwrap();
        assert_eq!(collected.full_name.as_deref(), Some("Ali"));
        assert_eq!(collected.theme_id, None);
    }

    #[test]
    fn test_deck_spec_requires_all_answers() {
        let mut collected = Collected {
            full_name: Some("Ali".to_string()),
            pages: Some(10),
            theme_id: None,
        };
        assert!(collected.deck_spec("Space").is_none());

        collected.theme_id = Some(2);
        let spec = collected.deck_spec("Space").unwrap();
        assert_eq!(spec, DeckSpec::new("Space", "Ali", 10, 2));
    }
}
