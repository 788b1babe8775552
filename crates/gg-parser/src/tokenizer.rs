/// One tokenized record line: `LEVEL TAG VALUE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLine<'a> {
    pub level: usize,
    pub tag: &'a str,
    /// Remaining words rejoined with single spaces; empty when the line has no value.
    pub value: String,
}

/// Split a raw line into level, tag and value.
///
/// Returns `None` for blank lines, lines without a tag, and lines whose first word is not a
/// non-negative integer.
#[must_use]
pub fn tokenize_line(raw: &str) -> Option<RecordLine<'_>> {
    let mut parts = raw.split_whitespace();
    let level = parse_level(parts.next()?)?;
    let tag = parts.next()?;
    let value = parts.collect::<Vec<_>>().join(" ");
    Some(RecordLine { level, tag, value })
}

fn parse_level(token: &str) -> Option<usize> {
    if token.bytes().all(|byte| byte.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}
