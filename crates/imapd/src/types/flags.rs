//! Message flags.

/// Message flags (RFC 3501 section 2.3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been read.
    Seen,
    /// Message has been answered.
    Answered,
    /// Message is flagged for special attention.
    Flagged,
    /// Message is marked for deletion.
    Deleted,
    /// Message is a draft.
    Draft,
    /// Message is recent (first session to see it). Cannot be altered by
    /// the client.
    Recent,
    /// `\*`: clients may create new keywords. Only meaningful in
    /// PERMANENTFLAGS.
    AnyKeyword,
    /// Custom keyword flag.
    Keyword(String),
}

impl Flag {
    /// The system flags a client can set, in the order SELECT reports them.
    pub const SYSTEM: [Self; 5] = [
        Self::Answered,
        Self::Flagged,
        Self::Draft,
        Self::Deleted,
        Self::Seen,
    ];

    /// Returns the flag as an IMAP string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Seen => "\\Seen",
            Self::Answered => "\\Answered",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
            Self::Draft => "\\Draft",
            Self::Recent => "\\Recent",
            Self::AnyKeyword => "\\*",
            Self::Keyword(s) => s,
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders flags as they appear inside a parenthesized flag list.
#[must_use]
pub fn flag_strings(flags: &[Flag]) -> Vec<String> {
    flags.iter().map(|f| f.as_str().to_string()).collect()
}
