//! Display-width helpers for plain (unstyled) text.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncates `text` to at most `max_width` columns, ending with `ellipsis`
/// when anything was cut. Graphemes are never split.
pub fn truncate_to_width(text: &str, max_width: usize, ellipsis: &str) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = display_width(ellipsis);
    if max_width <= ellipsis_width {
        return ellipsis.chars().take(max_width).collect();
    }

    let budget = max_width - ellipsis_width;
    let mut out = String::with_capacity(text.len());
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = display_width(grapheme);
        if used + width > budget {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push_str(ellipsis);
    out
}

/// Pads `text` with spaces to `width` columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - current))
}

/// Greedy word wrap. Words wider than `width` are hard-split by grapheme.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            let gap = usize::from(line_width > 0);
            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for grapheme in word.graphemes(true) {
                let grapheme_width = display_width(grapheme);
                if line_width + grapheme_width > width && line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push_str(grapheme);
                line_width += grapheme_width;
            }
        }

        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{display_width, pad_to_width, truncate_to_width, wrap_words};

    #[test]
    fn truncation_keeps_short_text() {
        assert_eq!(truncate_to_width("short", 40, "..."), "short");
    }

    #[test]
    fn truncation_appends_ellipsis_within_budget() {
        let long = "a".repeat(50);
        let truncated = truncate_to_width(&long, 40, "...");
        assert_eq!(display_width(&truncated), 40);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_counts_wide_characters() {
        let truncated = truncate_to_width("日本語のテキスト", 7, "...");
        assert_eq!(truncated, "日本...");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_words("What is the capital of France?", 12),
            vec!["What is the", "capital of", "France?"]
        );
    }

    #[test]
    fn wraps_overlong_words() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn keeps_explicit_line_breaks() {
        assert_eq!(wrap_words("one\ntwo", 20), vec!["one", "two"]);
    }

    #[test]
    fn pads_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcd", 2), "abcd");
    }
}
