/// Split text into parts of at most `max_chars` characters.
///
/// Breaks after the last newline in the window when it falls in the second
/// half of the window, else after the last other whitespace, else hard at
/// the limit. Separators stay attached to the end of the part they
/// terminate, so concatenating the parts reproduces the input exactly. Empty
/// input yields no parts.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let window_end = match remaining.char_indices().nth(max_chars) {
            Some((idx, _)) => idx,
            None => {
                parts.push(remaining.to_string());
                break;
            },
        };

        let window = &remaining[..window_end];
        let split_at = last_break_after(window, |c| c == '\n')
            .filter(|&at| window[..at].chars().count() > max_chars / 2)
            .or_else(|| last_break_after(window, |c| c != '\n' && c.is_whitespace()))
            .unwrap_or(window_end);

        parts.push(remaining[..split_at].to_string());
        remaining = &remaining[split_at..];
    }

    parts
}

/// Byte offset just past the last char in `window` matching `pred`.
fn last_break_after(window: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    window
        .char_indices()
        .rev()
        .find(|(_, c)| pred(*c))
        .map(|(idx, c)| idx + c.len_utf8())
}
