#![forbid(unsafe_code)]

//! Display-width helpers for terminal text.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Number of terminal cells `text` occupies.
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(grapheme_width).sum()
}

/// Cell width of a single grapheme cluster.
///
/// Zero-width clusters (lone combining marks) still advance by one cell so
/// they never collapse onto their neighbour.
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    UnicodeWidthStr::width(grapheme).max(1)
}

/// Truncate `text` to at most `max_width` cells, appending `…` when cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for g in text.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_wide_glyphs_twice() {
        assert_eq!(display_width("Rick"), 4);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_with_ellipsis("Morty", 10), "Morty");
    }

    #[test]
    fn truncate_appends_ellipsis_within_budget() {
        let cut = truncate_with_ellipsis("Abadango Cluster Princess", 10);
        assert_eq!(cut, "Abadango …");
        assert_eq!(display_width(&cut), 10);
    }

    #[test]
    fn truncate_to_zero_is_empty() {
        assert_eq!(truncate_with_ellipsis("Rick", 0), "");
    }
}
