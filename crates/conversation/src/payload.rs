//! Choice payloads carried by inline buttons.
//!
//! Payloads are `<kind>_<value>` strings: `start_creation`, `pages_<n>`,
//! `design_<id>`. The legacy `create_slide` payload also means start.

use std::fmt;

/// A parsed button payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoicePayload {
    Start,
    Pages(u32),
    Design(u32),
}

impl ChoicePayload {
    /// Parse a raw payload. Unknown kinds and non-numeric values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "create_slide" {
            return Some(ChoicePayload::Start);
        }

        let (kind, value) = raw.split_once('_')?;
        match kind {
            "start" => Some(ChoicePayload::Start),
            "pages" => value.parse().ok().map(ChoicePayload::Pages),
            "design" => value.parse().ok().map(ChoicePayload::Design),
            _ => None,
        }
    }
}

impl fmt::Display for ChoicePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoicePayload::Start => f.write_str("start_creation"),
            ChoicePayload::Pages(n) => write!(f, "pages_{}", n),
            ChoicePayload::Design(id) => write!(f, "design_{}", id),
        }
    }
}
