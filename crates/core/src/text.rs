//! Text normalization and sentence-boundary helpers.
//!
//! Everything here is a pure function over `&str`. None of it fails, including
//! on empty input.

/// Marker prepended to list items extracted from `<li>` elements.
pub const BULLET: &str = "• ";

/// Characters that close a sentence.
pub const SENTENCE_TERMINALS: [char; 4] = ['.', '!', '?', '…'];

/// Closing quotation marks tolerated after a sentence terminal.
const CLOSING_QUOTES: [char; 7] = ['"', '\'', '”', '“', '’', '»', '«'];

/// Invisible code points stripped before whitespace collapsing.
const INVISIBLE: [char; 4] = ['\u{200B}', '\u{200C}', '\u{FEFF}', '\u{00AD}'];

/// Collapses every whitespace run (non-breaking space included) to a single
/// ASCII space and trims both ends.
///
/// # Example
///
/// ```rust
/// use rovat_core::text::normalize;
///
/// assert_eq!(normalize("  A\u{a0}forint \n\t gyengült  "), "A forint gyengült");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in raw.split(|c: char| c.is_whitespace()) {
        let word: String = word.chars().filter(|c| !INVISIBLE.contains(c)).collect();
        if word.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word);
    }
    out
}

/// Whether a line is a list item: it starts with the bullet marker or a
/// hyphen followed by a space.
pub fn is_list_item(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('•') || text.starts_with("- ")
}

/// Strips the list marker from a list item, returning the item body.
pub fn list_item_body(text: &str) -> &str {
    let text = text.trim_start();
    text.strip_prefix('•')
        .or_else(|| text.strip_prefix("- "))
        .unwrap_or(text)
        .trim()
}

/// Whether the text ends with a sentence terminal, ignoring one trailing
/// closing quotation mark.
pub fn ends_sentence(text: &str) -> bool {
    let text = text.trim_end();
    let text = text.strip_suffix(CLOSING_QUOTES).unwrap_or(text);
    text.ends_with(SENTENCE_TERMINALS)
}

/// Decides whether an accumulated buffer can be emitted as a paragraph.
///
/// A buffer is complete when it is a list item, ends a sentence, or is longer
/// than `long_paragraph_len` characters.
pub fn is_complete_unit(buffer: &str, long_paragraph_len: usize) -> bool {
    let buffer = buffer.trim();
    if is_list_item(buffer) {
        return true;
    }
    ends_sentence(buffer) || buffer.chars().count() > long_paragraph_len
}

/// Splits text into sentence-like segments at whitespace that follows a
/// sentence terminal. Empty segments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && prev.is_some_and(|p| SENTENCE_TERMINALS.contains(&p)) {
            let mut end_ws = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end_ws = next_idx + next.len_utf8();
                chars.next();
            }
            let segment = text[start..idx].trim();
            if !segment.is_empty() {
                segments.push(segment);
            }
            start = end_ws;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        segments.push(tail);
    }
    segments
}
