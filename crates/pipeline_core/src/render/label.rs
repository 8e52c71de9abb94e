//! Label wrapping and XML text escaping.
//!
//! # Invariants
//! - No wrapped line is longer than `max_chars` characters.
//! - At most `max_lines` lines are returned; a cut is marked with `…`.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
// Characters XML 1.0 does not allow in text content.
static XML_INVALID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid xml control regex")
});

pub const ELLIPSIS: char = '…';

/// Wraps `text` greedily on whitespace, honoring explicit `\n` breaks.
///
/// Words longer than a line are split. Blank lines are dropped.
pub fn wrap_label(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let max_lines = max_lines.max(1);

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in WHITESPACE_RE.split(paragraph.trim()) {
            if word.is_empty() {
                continue;
            }
            for chunk in split_long_word(word, max_chars) {
                let chunk_len = chunk.chars().count();
                if current_len > 0 && current_len + 1 + chunk_len > max_chars {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(&chunk);
                current_len += chunk_len;
            }
        }
        if current_len > 0 {
            lines.push(current);
        }
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(max_chars - 1).collect();
            *last = format!("{}{ELLIPSIS}", kept.trim_end());
        }
    }
    lines
}

fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Escapes XML metacharacters and drops characters XML cannot carry.
pub fn escape_xml(text: &str) -> String {
    let cleaned = XML_INVALID_RE.replace_all(text, "");
    let mut escaped = String::with_capacity(cleaned.len());
    for ch in cleaned.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, wrap_label};

    #[test]
    fn wrap_keeps_explicit_breaks() {
        let lines = wrap_label("Decision:\nShip it", 20, 5);
        assert_eq!(lines, vec!["Decision:", "Ship it"]);
    }

    #[test]
    fn wrap_fills_lines_greedily() {
        let lines = wrap_label("one two three four", 9, 5);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_splits_words_longer_than_a_line() {
        let lines = wrap_label("abcdefghij", 4, 5);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_truncates_with_ellipsis() {
        let lines = wrap_label("aa bb cc dd", 2, 2);
        assert_eq!(lines, vec!["aa", "b…"]);
    }

    #[test]
    fn escape_handles_markup_and_controls() {
        assert_eq!(
            escape_xml("<b>\"R&D\"</b>\u{0007}'"),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;&apos;"
        );
    }
}
