//! Match highlighting for suggestion labels.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Highlight case-insensitive occurrences of `query` in `text`.
///
/// The query is matched literally, the same way the filter matches. Matched
/// parts keep their original case. Span boundaries always fall on char
/// boundaries of `text`, even where lowercasing changes a char's length.
pub fn highlight_text(text: &str, query: &str, style: Style) -> Line<'static> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Line::from(text.to_string());
    }

    let mut spans = Vec::new();
    let mut last_end = 0;
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        match match_len(&text[pos..], &needle) {
            Some(len) => {
                if pos > last_end {
                    spans.push(Span::raw(text[last_end..pos].to_string()));
                }
                spans.push(Span::styled(text[pos..pos + len].to_string(), style));
                pos += len;
                last_end = pos;
            }
            None => pos += c.len_utf8(),
        }
    }

    if spans.is_empty() {
        return Line::from(text.to_string());
    }
    if last_end < text.len() {
        spans.push(Span::raw(text[last_end..].to_string()));
    }
    Line::from(spans)
}

/// Byte length of the prefix of `text` whose lowercased chars equal `needle`.
///
/// A needle ending inside the lowercase expansion of a char does not match.
fn match_len(text: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, c) in text.char_indices() {
        if matched == needle.len() {
            return Some(offset);
        }
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
    }
    (matched == needle.len()).then_some(text.len())
}
