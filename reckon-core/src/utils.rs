//! Text helpers shared across crates.

/// Shorten `s` to at most `max_chars` characters for logs and console output.
///
/// Surrounding whitespace is dropped first. A shortened result ends in `...`
/// and counts toward the limit.
///
/// # Examples
///
/// ```
/// use reckon_core::truncate;
///
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("short", 10), "short");
/// ```
pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let cut = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}...", s[..cut].trim_end())
        }
    }
}

/// Collapse a multi-line text to one line for console reports.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
