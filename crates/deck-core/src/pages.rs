//! The closed set of page counts a user may pick.

use std::ops::RangeInclusive;

/// Smallest deck offered.
pub const MIN_PAGES: u32 = 8;

/// Largest deck offered.
pub const MAX_PAGES: u32 = 15;

/// All page counts offered, in order.
pub fn page_counts() -> RangeInclusive<u32> {
    MIN_PAGES..=MAX_PAGES
}

/// Whether `pages` is one of the offered page counts.
pub fn is_valid_page_count(pages: u32) -> bool {
    page_counts().contains(&pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_bounds() {
        assert!(is_valid_page_count(8));
        assert!(is_valid_page_count(15));
        assert!(!is_valid_page_count(7));
        assert!(!is_valid_page_count(16));
        assert!(!is_valid_page_count(0));
        assert_eq!(page_counts().count(), 8);
    }
}
