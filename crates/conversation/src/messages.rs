//! Reply texts and button layouts.

use deck_core::{page_counts, ThemeCatalog};

use crate::payload::ChoicePayload;
use crate::sender::Choice;

pub const NO_CREDITS: &str = "Kredit qolmadi!";
pub const ASK_NAME: &str = "Ismingizni yozing:";
pub const ASK_PAGES: &str = "Betlar soni:";
pub const ASK_THEME: &str = "Dizayn tanlang:";
pub const ASK_TOPIC: &str = "Mavzuni yozing:";
pub const PREPARING: &str = "Tayyorlanmoqda...";
pub const DECK_CAPTION: &str = "Tayyor!";
pub const GENERATION_FAILED: &str = "Xato!";

pub const START_LABEL: &str = "📊 Slayd Yaratish";

/// Buttons per row on the page-count keyboard.
const PAGES_PER_ROW: usize = 4;

pub fn welcome(credits: i64, referral_code: &str) -> String {
    format!(
        "Xush kelibsiz! Kreditlar: {}\nReferal kodingiz: {}",
        credits, referral_code
    )
}

pub fn start_keyboard() -> Vec<Vec<Choice>> {
    vec![vec![Choice::new(START_LABEL, ChoicePayload::Start.to_string())]]
}

/// Page counts in rows of four: 8-11, 12-15.
pub fn pages_keyboard() -> Vec<Vec<Choice>> {
    let choices: Vec<Choice> = page_counts()
        .map(|n| Choice::new(n.to_string(), ChoicePayload::Pages(n).to_string()))
        .collect();
    choices
        .chunks(PAGES_PER_ROW)
        .map(<[Choice]>::to_vec)
        .collect()
}

/// One theme per row.
pub fn themes_keyboard(catalog: &ThemeCatalog) -> Vec<Vec<Choice>> {
    catalog
        .iter()
        .map(|theme| {
            vec![Choice::new(
                theme.name,
                ChoicePayload::Design(theme.id).to_string(),
            )]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_keyboard_layout() {
        let rows = pages_keyboard();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(rows[0][0], Choice::new("8", "pages_8"));
        assert_eq!(rows[1][3], Choice::new("15", "pages_15"));
    }

    #[test]
    fn test_themes_keyboard_layout() {
        let rows = themes_keyboard(&ThemeCatalog::builtin());
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|row| row.len() == 1));
        assert_eq!(rows[1][0].payload, "design_2");
    }

    #[test]
    fn test_welcome_mentions_credits_and_code() {
        let text = welcome(2, "REF42");
        assert!(text.contains("Kreditlar: 2"));
        assert!(text.contains("REF42"));
    }
}
