//! Unicode-aware width and truncation.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual width of a string in terminal cells.
///
/// Wide characters (CJK, most emoji) count as 2 cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` cells, appending "..." when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }

    let target = max_width.saturating_sub(3);
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > target {
            break;
        }
        result.push(ch);
        width += w;
    }

    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_width() {
        assert_eq!(visual_width("Duke"), 4);
        assert_eq!(visual_width(""), 0);
        assert_eq!(visual_width("你好"), 4);
        assert_eq!(visual_width("✓✓"), 2);
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_to_width("Online", 6), "Online");
    }

    #[test]
    fn test_truncate_cuts_with_ellipsis() {
        assert_eq!(truncate_to_width("Human Resources", 8), "Human...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
    }

    #[test]
    fn test_truncate_tiny_width() {
        assert_eq!(truncate_to_width("hello", 2), "...");
    }
}
