//! Command-related type definitions.

/// STATUS data items a client may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAttribute {
    /// Number of messages.
    Messages,
    /// Number of recent messages.
    Recent,
    /// Next UID.
    UidNext,
    /// UIDVALIDITY.
    UidValidity,
    /// Number of unseen messages.
    Unseen,
}

impl StatusAttribute {
    /// Looks up an item name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MESSAGES" => Some(Self::Messages),
            "RECENT" => Some(Self::Recent),
            "UIDNEXT" => Some(Self::UidNext),
            "UIDVALIDITY" => Some(Self::UidValidity),
            "UNSEEN" => Some(Self::Unseen),
            _ => None,
        }
    }

    /// Returns the item name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "MESSAGES",
            Self::Recent => "RECENT",
            Self::UidNext => "UIDNEXT",
            Self::UidValidity => "UIDVALIDITY",
            Self::Unseen => "UNSEEN",
        }
    }
}
