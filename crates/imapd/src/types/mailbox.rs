//! Mailbox types.

/// Mailbox metadata reported by STATUS and SELECT.
///
/// This is a snapshot: the server asks the backend for a fresh one every
/// time it needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxInfo {
    /// Next UID to be assigned.
    pub next_uid: u32,
    /// UIDVALIDITY value.
    pub uid_validity: u32,
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Number of recent messages.
    pub recent: u32,
    /// Number of messages without the `\Seen` flag.
    pub unseen: u32,
}

/// One mailbox in a LIST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxListing {
    /// Mailbox attributes.
    pub attributes: Vec<MailboxAttribute>,
    /// Hierarchy delimiter, `None` for a flat namespace.
    pub delimiter: Option<char>,
    /// Mailbox name.
    pub name: String,
}

impl MailboxListing {
    /// Creates a listing with the `/` delimiter and no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            delimiter: Some('/'),
            name: name.into(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: MailboxAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Mailbox name attributes from LIST (RFC 3501 section 7.2.2, RFC 3348).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MailboxAttribute {
    /// No child levels can exist under this name.
    NoInferiors,
    /// Mailbox cannot be selected.
    NoSelect,
    /// Mailbox is marked for attention.
    Marked,
    /// Mailbox is not marked.
    Unmarked,
    /// Mailbox has children.
    HasChildren,
    /// Mailbox has no children.
    HasNoChildren,
}

impl MailboxAttribute {
    /// Returns the attribute as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoInferiors => "\\Noinferiors",
            Self::NoSelect => "\\Noselect",
            Self::Marked => "\\Marked",
            Self::Unmarked => "\\Unmarked",
            Self::HasChildren => "\\HasChildren",
            Self::HasNoChildren => "\\HasNoChildren",
        }
    }
}

impl std::fmt::Display for MailboxAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
