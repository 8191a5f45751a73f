//! Small helpers for logging and file naming.

/// Truncate a string for logging purposes.
///
/// Long payload previews are cut to `max` bytes with a byte-count marker so
/// a malformed body never floods the log.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…(+{} bytes)", &s[..end], s.len() - end)
    }
}

/// Convert a keyword to a filename-safe slug.
///
/// Keeps alphanumerics (including Hangul), lowercases ASCII, and joins the
/// rest with hyphens.
pub fn slugify_keyword(keyword: &str) -> String {
    let slug: String = keyword
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let parts: Vec<&str> = slug.split('-').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        "keyword".to_string()
    } else {
        parts.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("hello", 100), "hello");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "인공지능 규제";
        let result = truncate_for_log(s, 4);
        assert!(result.starts_with('인'));
    }

    #[test]
    fn test_slugify_keyword() {
        assert_eq!(slugify_keyword("AI regulation"), "ai-regulation");
        assert_eq!(slugify_keyword("인공지능 규제"), "인공지능-규제");
        assert_eq!(slugify_keyword("  GPT-4!  "), "gpt-4");
        assert_eq!(slugify_keyword("???"), "keyword");
    }
}
