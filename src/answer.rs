pub const ANSWER_OPEN: &str = "<answer>";
pub const ANSWER_CLOSE: &str = "</answer>";

/// Content between the first `open` marker and the nearest `close` marker
/// after it, untrimmed.
pub fn extract_between<'a>(raw: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = raw.find(open)? + open.len();
    let len = raw[start..].find(close)?;
    Some(&raw[start..start + len])
}

/// The trimmed text of the first `<answer>...</answer>` region, or `raw`
/// unchanged when the model did not mark its answer.
pub fn extract_answer(raw: &str) -> &str {
    extract_between(raw, ANSWER_OPEN, ANSWER_CLOSE)
        .map(str::trim)
        .unwrap_or(raw)
}
