//! The fixed theme catalog.

use serde::Serialize;

/// A named visual style. Colours are 6-digit RGB hex without `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Identifier offered to users.
    pub id: u32,
    /// Button label.
    pub name: &'static str,
    /// Title slide background.
    pub primary: &'static str,
    /// Decorative highlights.
    pub secondary: &'static str,
    /// Content slide background.
    pub accent: &'static str,
    /// Body text colour.
    pub text: &'static str,
}

/// Every theme a user can choose, ordered by id.
pub const THEMES: &[Theme] = &[
    Theme {
        id: 1,
        name: "🔵 Ko'k Professional",
        primary: "1E3A8A",
        secondary: "3B82F6",
        accent: "DBEAFE",
        text: "1E293B",
    },
    Theme {
        id: 2,
        name: "🟢 Yashil Tabiat",
        primary: "166534",
        secondary: "22C55E",
        accent: "DCFCE7",
        text: "1E293B",
    },
    Theme {
        id: 3,
        name: "🔴 Qizil Energiya",
        primary: "991B1B",
        secondary: "EF4444",
        accent: "FEE2E2",
        text: "1E293B",
    },
    Theme {
        id: 4,
        name: "🟣 Binafsha Kreativ",
        primary: "581C87",
        secondary: "A855F7",
        accent: "F3E8FF",
        text: "1E293B",
    },
    Theme {
        id: 5,
        name: "🟡 Sariq Quyosh",
        primary: "854D0E",
        secondary: "EAB308",
        accent: "FEF9C3",
        text: "1E293B",
    },
    Theme {
        id: 6,
        name: "⚫ Qora Elegant",
        primary: "18181B",
        secondary: "3F3F46",
        accent: "F4F4F5",
        text: "18181B",
    },
];

/// Read-only view over a set of themes.
#[derive(Debug, Clone, Copy)]
pub struct ThemeCatalog {
    themes: &'static [Theme],
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeCatalog {
    /// The built-in catalog.
    pub const fn builtin() -> Self {
        Self { themes: THEMES }
    }

    /// Look up a theme by id.
    pub fn get(&self, id: u32) -> Option<&'static Theme> {
        self.themes.iter().find(|theme| theme.id == id)
    }

    /// Whether `id` names a theme.
    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over themes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &'static Theme> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
