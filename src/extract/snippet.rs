use std::ops::Range;

/// Characters of context kept on each side of a match
pub const SNIPPET_RADIUS: usize = 40;

/// Builds a context snippet around a match
///
/// Takes up to [`SNIPPET_RADIUS`] characters on each side of `span`, drops
/// a partial word at either cut edge, and collapses all whitespace
/// (including line breaks) to single spaces so the result fits in one CSV
/// field without record separators.
///
/// # Examples
///
/// ```
/// use email_hunter::extract::snippet;
///
/// let text = "Questions?\nWrite to   contact@example.com any time.";
/// let start = text.find("contact").unwrap();
/// let span = start..start + "contact@example.com".len();
/// assert_eq!(
///     snippet(text, span),
///     "Questions? Write to contact@example.com any time."
/// );
/// ```
pub fn snippet(text: &str, span: Range<usize>) -> String {
    let match_start = floor_boundary(text, span.start.min(text.len()));
    let match_end = floor_boundary(text, span.end.clamp(match_start, text.len()));

    let mut start = text[..match_start]
        .char_indices()
        .rev()
        .nth(SNIPPET_RADIUS - 1)
        .map_or(0, |(i, _)| i);
    let mut end = text[match_end..]
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map_or(text.len(), |(i, _)| match_end + i);

    // Cut mid-word on the left: skip to the next whitespace
    if start > 0 && !preceded_by_whitespace(text, start) {
        start = text[start..match_start]
            .find(char::is_whitespace)
            .map_or(match_start, |i| start + i);
    }

    // Cut mid-word on the right: back up to the previous whitespace
    if end < text.len() && !starts_with_whitespace(&text[end..]) {
        end = text[match_end..end]
            .rfind(char::is_whitespace)
            .map_or(match_end, |i| match_end + i);
    }

    collapse_whitespace(&text[start..end])
}

/// Joins whitespace-separated words with single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn preceded_by_whitespace(text: &str, index: usize) -> bool {
    text[..index].chars().next_back().is_some_and(char::is_whitespace)
}

fn starts_with_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}
