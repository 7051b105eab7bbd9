//! Deterministic canonicalization of raw model answers for exact-match scoring.
//!
//! One pass applies, in order:
//!
//! 1. trim (empty input short-circuits to empty output)
//! 2. strip one leading `the final answer is` / `final answer` / `answer`
//!    prefix, case-insensitive, with optional trailing `:` or `-`
//! 3. strip a whole-string `$$...$$`, else `$...$`
//! 4. unwrap a whole-string `\boxed{...}`
//! 5. drop one trailing period
//! 6. collapse whitespace runs to single spaces
//!
//! [`normalize_answer`] repeats the pass until the text stops changing, so the
//! result is always a fixed point: `normalize(normalize(x)) == normalize(x)`.

/// Prefixes in priority order; at most one is stripped per pass.
const ANSWER_PREFIXES: [&str; 3] = ["the final answer is", "final answer", "answer"];

const BOXED_OPEN: &str = "\\boxed{";

/// Canonicalize a raw answer string.
///
/// # Example
///
/// ```
/// use reckon_core::normalize_answer;
///
/// assert_eq!(normalize_answer("The final answer is: 42."), "42");
/// assert_eq!(normalize_answer("$\\boxed{7}$"), "7");
/// assert_eq!(normalize_answer("  New   York "), "New York");
/// ```
pub fn normalize_answer(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let text = raw.trim();
    if text.is_empty() {
        return String::new();
    }

    let text = strip_answer_prefix(text).trim();
    let text = strip_math_delimiters(text).trim();
    let text = unwrap_boxed(text).trim();
    let text = text.strip_suffix('.').unwrap_or(text);

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_answer_prefix(text: &str) -> &str {
    for prefix in ANSWER_PREFIXES {
        let Some(head) = text.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &text[prefix.len()..];
        // Whole-word match only: "answers" keeps its prefix.
        if rest
            .chars()
            .next()
            .is_some_and(|c| !(c.is_whitespace() || c == ':' || c == '-'))
        {
            continue;
        }
        let rest = rest.trim_start();
        let rest = rest
            .strip_prefix(':')
            .or_else(|| rest.strip_prefix('-'))
            .unwrap_or(rest);
        return rest.trim_start();
    }
    text
}

fn strip_math_delimiters(text: &str) -> &str {
    if text.len() >= 4 && text.starts_with("$$") && text.ends_with("$$") {
        return &text[2..text.len() - 2];
    }
    if text.len() >= 2 && text.starts_with('$') && text.ends_with('$') {
        return &text[1..text.len() - 1];
    }
    text
}

/// Exact whole-string match only; surrounding text disables the unwrap.
fn unwrap_boxed(text: &str) -> &str {
    text.strip_prefix(BOXED_OPEN)
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(text)
}
