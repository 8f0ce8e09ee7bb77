//! Text shaping for spoken answers.

/// Cut `text` to at most `max_len` characters for speech.
///
/// Prefers ending at a sentence boundary when one falls in the last 30% of
/// the window, otherwise cuts at the last word boundary and appends "...".
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_len)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..cut];

    // `end` is a byte offset; the 70% threshold is in characters.
    if let Some(end) = window.rfind(['.', '!', '?'])
        && window[..end].chars().count() as f64 > max_len as f64 * 0.7
    {
        return window[..=end].to_string();
    }

    match window.rfind(' ') {
        Some(space) => format!("{}...", &window[..space]),
        None => format!("{window}..."),
    }
}

/// The first `n` sentences of `text`.
pub fn first_sentences(text: &str, n: usize) -> String {
    let mut taken = 0;
    let bytes = text.as_bytes();
    for (i, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let next = bytes.get(i + 1).copied();
            if next.is_none() || next == Some(b' ') || next == Some(b'\n') {
                taken += 1;
                if taken == n {
                    return text[..=i].trim().to_string();
                }
            }
        }
    }
    text.trim().to_string()
}

/// Collapse runs of whitespace into single spaces.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
