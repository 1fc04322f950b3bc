//! String utilities for the domain layer.

/// One-line preview of a model response for log fields (UTF-8 safe).
///
/// Collapses runs of whitespace (including newlines) into single spaces and
/// truncates to `max_len` bytes on a character boundary, appending `...`
/// when anything was cut.
pub fn preview(s: &str, max_len: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= max_len {
        return collapsed;
    }
    let target = max_len.saturating_sub(3);
    let mut end = target.min(collapsed.len());
    while end > 0 && !collapsed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &collapsed[..end])
}
