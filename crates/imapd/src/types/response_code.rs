//! Response codes.

use super::{Capability, Flag, flag_strings};

/// Bracketed response code attached to a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// AUTHENTICATIONFAILED (RFC 5530): credentials were rejected.
    AuthenticationFailed,
    /// CAPABILITY list, used in the greeting.
    Capability(Vec<Capability>),
    /// PERMANENTFLAGS: Flags that can be changed permanently.
    PermanentFlags(Vec<Flag>),
    /// READ-WRITE: Mailbox selected as read-write.
    ReadWrite,
    /// UIDNEXT: Next UID to be assigned.
    UidNext(u32),
    /// UIDVALIDITY: Unique identifier validity value.
    UidValidity(u32),
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed => f.write_str("AUTHENTICATIONFAILED"),
            Self::Capability(caps) => {
                f.write_str("CAPABILITY")?;
                for cap in caps {
                    write!(f, " {cap}")?;
                }
                Ok(())
            }
            Self::PermanentFlags(flags) => {
                write!(f, "PERMANENTFLAGS ({})", flag_strings(flags).join(" "))
            }
            Self::ReadWrite => f.write_str("READ-WRITE"),
            Self::UidNext(uid) => write!(f, "UIDNEXT {uid}"),
            Self::UidValidity(validity) => write!(f, "UIDVALIDITY {validity}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn capability_code() {
        let code = ResponseCode::Capability(vec![Capability::Imap4Rev1, Capability::StartTls]);
        assert_eq!(code.to_string(), "CAPABILITY IMAP4rev1 STARTTLS");
    }

    #[test]
    fn permanent_flags() {
        let code = ResponseCode::PermanentFlags(vec![Flag::Seen, Flag::AnyKeyword]);
        assert_eq!(code.to_string(), "PERMANENTFLAGS (\\Seen \\*)");
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(ResponseCode::UidNext(2).to_string(), "UIDNEXT 2");
        assert_eq!(ResponseCode::UidValidity(3).to_string(), "UIDVALIDITY 3");
        assert_eq!(ResponseCode::ReadWrite.to_string(), "READ-WRITE");
    }
}
