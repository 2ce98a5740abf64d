//! Server capabilities and response status.

/// Status of a tagged or untagged status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command failed (protocol/syntax error).
    Bad,
    /// Server is closing the connection.
    Bye,
}

impl Status {
    /// Returns the status keyword as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::Bye => "BYE",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `IMAP4rev1` (RFC 3501)
    Imap4Rev1,
    /// STARTTLS support
    StartTls,
    /// LOGIN disabled until the connection is secure
    LoginDisabled,
    /// AUTH mechanism
    Auth(String),
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imap4Rev1 => write!(f, "IMAP4rev1"),
            Self::StartTls => write!(f, "STARTTLS"),
            Self::LoginDisabled => write!(f, "LOGINDISABLED"),
            Self::Auth(mech) => write!(f, "AUTH={mech}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_keywords() {
        assert_eq!(Status::Ok.to_string(), "OK");
        assert_eq!(Status::No.to_string(), "NO");
        assert_eq!(Status::Bad.to_string(), "BAD");
        assert_eq!(Status::Bye.to_string(), "BYE");
    }

    #[test]
    fn capability_display() {
        assert_eq!(Capability::Imap4Rev1.to_string(), "IMAP4rev1");
        assert_eq!(Capability::StartTls.to_string(), "STARTTLS");
        assert_eq!(Capability::LoginDisabled.to_string(), "LOGINDISABLED");
        assert_eq!(Capability::Auth("LOGIN".to_string()).to_string(), "AUTH=LOGIN");
    }
}
