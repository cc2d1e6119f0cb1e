//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of user or model text for log lines.
///
/// Newlines are flattened and an ellipsis marks truncation.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    let cut = truncate_str(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("Total sales: $100", 11), "Total sales");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // 'é' is 2 bytes; cutting inside it backs up
        assert_eq!(truncate_str("café", 4), "caf");
    }

    #[test]
    fn preview_flattens_and_marks_truncation() {
        assert_eq!(preview("top\ncustomers", 50), "top customers");
        assert_eq!(preview("Show me the top customers", 8), "Show me ...");
    }
}
