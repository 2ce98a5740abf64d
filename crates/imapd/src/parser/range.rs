//! Sequence-set grammar: `1,2:4,5:*`.

use super::ParseError;
use crate::types::Range;

/// Parses a comma-separated sequence set.
///
/// Each element is `n`, `n:m` or `n:*`. If any element is malformed the whole
/// set is rejected; no partial result is returned.
///
/// # Errors
///
/// Returns [`ParseError::InvalidRange`] carrying the full input.
pub fn parse_range_set(input: &str) -> Result<Vec<Range>, ParseError> {
    input
        .split(',')
        .map(parse_range)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ParseError::InvalidRange(input.to_string()))
}

fn parse_range(token: &str) -> Option<Range> {
    let mut parts = token.split(':');
    let start = parse_id(parts.next()?)?;
    match (parts.next(), parts.next()) {
        (None, _) => Some(Range::single(start)),
        (Some("*"), None) => Some(Range::open(start)),
        (Some(end), None) => Some(Range::closed(start, parse_id(end)?)),
        (Some(_), Some(_)) => None,
    }
}

/// Parses a non-zero message id made of ASCII digits only.
fn parse_id(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().filter(|&n| n != 0)
}
