//! Fixed-width column helpers for terminal output.
//!
//! Widths are measured in display columns, so CJK text lines up with ASCII.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// ANSI escape sequences used by the human renderers.
pub mod color {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

/// Truncates a string to fit within the specified display width.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Shortens a string to at most `width` columns, ending in "..." when cut.
/// Unlike [`pad_or_truncate`], short strings are returned unpadded.
pub fn ellipsize(s: &str, width: usize) -> String {
    if s.width() <= width {
        s.to_string()
    } else if width < 3 {
        truncate_to_width(s, width)
    } else {
        format!("{}...", truncate_to_width(s, width - 3))
    }
}

/// Pads or truncates a string to exactly the specified display width.
///
/// - Shorter strings are padded with spaces on the right.
/// - Longer strings are cut and end in "..." (if width >= 3).
pub fn pad_or_truncate(s: &str, width: usize) -> String {
    let cell = ellipsize(s, width);
    // saturating_sub: a cut CJK char can leave the cell one column short
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(padding))
}

/// Collapses a multi-line value to its first line, for single-row cells.
pub fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ascii_short("hello", 10, "hello")]
    #[case::ascii_exact("hello", 5, "hello")]
    #[case::ascii_truncate("hello world", 5, "hello")]
    #[case::empty("", 5, "")]
    #[case::zero_width("hello", 0, "")]
    #[case::cjk_truncate("日本語", 4, "日本")]
    #[case::cjk_odd_width("日本語", 5, "日本")]
    fn test_truncate_to_width(
        #[case] input: &str,
        #[case] max_width: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(truncate_to_width(input, max_width), expected);
    }

    #[rstest]
    #[case::fits("short title", 20, "short title")]
    #[case::cut("a rather long issue title", 12, "a rather ...")]
    #[case::tiny("hello", 2, "he")]
    #[case::cjk("日本語テスト", 8, "日本...")]
    fn test_ellipsize(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(ellipsize(input, width), expected);
    }

    #[rstest]
    #[case::short("hello", 10, "hello     ")]
    #[case::exact("hello", 5, "hello")]
    #[case::truncate("hello world", 8, "hello...")]
    #[case::max_len_3("hello", 3, "...")]
    #[case::max_len_1("hello", 1, "h")]
    #[case::cjk_short("日本語", 10, "日本語    ")]
    #[case::cjk_truncate("日本語テスト", 8, "日本... ")]
    fn test_pad_or_truncate(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(pad_or_truncate(input, width), expected);
    }

    #[rstest]
    #[case::single("one", "one")]
    #[case::multi("one\ntwo", "one")]
    #[case::empty("", "")]
    fn test_first_line(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(first_line(input), expected);
    }
}
