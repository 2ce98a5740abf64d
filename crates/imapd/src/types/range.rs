//! Message ranges from sequence-set arguments.

/// One element of a sequence set such as `1`, `2:4` or `5:*`.
///
/// An `end` of 0 without `infinite` denotes the single id `start`; 0 is never
/// a valid message id. When `infinite` is set, `end` is unused and kept at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    /// First id of the range.
    pub start: u32,
    /// Last id of the range, or 0 for a single id / open range.
    pub end: u32,
    /// Range extends to the highest id in the mailbox (`start:*`).
    pub infinite: bool,
}

impl Range {
    /// A range covering exactly one id.
    #[must_use]
    pub const fn single(id: u32) -> Self {
        Self {
            start: id,
            end: 0,
            infinite: false,
        }
    }

    /// A closed range `start:end`.
    #[must_use]
    pub const fn closed(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            infinite: false,
        }
    }

    /// An open range `start:*`.
    #[must_use]
    pub const fn open(start: u32) -> Self {
        Self {
            start,
            end: 0,
            infinite: true,
        }
    }

    /// Returns true if `id` falls inside the range.
    ///
    /// Closed ranges may be written in either order (`4:2` equals `2:4`).
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        if self.infinite {
            id >= self.start
        } else if self.end == 0 {
            id == self.start
        } else {
            let (lo, hi) = if self.start <= self.end {
                (self.start, self.end)
            } else {
                (self.end, self.start)
            };
            (lo..=hi).contains(&id)
        }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.infinite {
            write!(f, "{}:*", self.start)
        } else if self.end == 0 {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Range::single(42).to_string(), "42");
        assert_eq!(Range::closed(1, 100).to_string(), "1:100");
        assert_eq!(Range::open(50).to_string(), "50:*");
    }

    #[test]
    fn contains_single() {
        let r = Range::single(7);
        assert!(r.contains(7));
        assert!(!r.contains(8));
    }

    #[test]
    fn contains_closed_either_order() {
        assert!(Range::closed(2, 4).contains(3));
        assert!(Range::closed(4, 2).contains(2));
        assert!(!Range::closed(2, 4).contains(5));
    }

    #[test]
    fn contains_open() {
        let r = Range::open(10);
        assert!(!r.contains(9));
        assert!(r.contains(10));
        assert!(r.contains(u32::MAX));
    }
}
