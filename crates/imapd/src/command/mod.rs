//! IMAP commands understood by the server.
//!
//! [`Command::parse`] turns a tokenized [`CommandLine`] into a typed command.
//! Anything it rejects is answered with a tagged `BAD` whose text is the
//! [`CommandError`] message; the session then carries on.

mod types;

pub use types::StatusAttribute;

use thiserror::Error;

use crate::parser::{
    CommandLine, ParseError, parse_message_data_item_names, parse_range_set, unquote,
};
use crate::types::{MessageDataItemName, Range};

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Any State Commands
    /// CAPABILITY command.
    Capability,
    /// NOOP command.
    Noop,
    /// LOGOUT command.
    Logout,

    // Not Authenticated State Commands
    /// STARTTLS command.
    StartTls,
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },

    // Authenticated State Commands
    /// SELECT command.
    Select {
        /// Mailbox to select.
        mailbox: String,
    },
    /// LIST command.
    List {
        /// Reference name.
        reference: String,
        /// Mailbox pattern with possible wildcards.
        pattern: String,
    },
    /// STATUS command.
    Status {
        /// Mailbox name.
        mailbox: String,
        /// Recognized items in request order; unknown items are dropped.
        items: Vec<StatusAttribute>,
    },

    // Selected State Commands
    /// CLOSE command.
    Close,
    /// UID FETCH command.
    UidFetch {
        /// UID ranges.
        ranges: Vec<Range>,
        /// Requested data items.
        items: Vec<MessageDataItemName>,
    },
}

/// Why a command line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The command (or UID sub-command) is not supported.
    #[error("Unknown command")]
    Unknown,

    /// `UID` without a sub-command.
    #[error("Missing command")]
    MissingSubcommand,

    /// Required arguments are missing.
    #[error("{0}")]
    MissingArguments(&'static str),

    /// The sequence set did not parse.
    #[error("invalid range")]
    InvalidRange(#[source] ParseError),

    /// The data item list did not parse.
    #[error("invalid item names")]
    InvalidItems(#[source] ParseError),
}

impl Command {
    /// Builds a command from a tokenized request line.
    ///
    /// Command names are matched case-insensitively. Quoted mailbox names
    /// and credentials are unquoted.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] for unknown commands and bad arguments.
    pub fn parse(line: &CommandLine<'_>) -> Result<Self, CommandError> {
        let args = line.args.as_slice();
        let command = match line.name.to_ascii_uppercase().as_str() {
            "CAPABILITY" => Self::Capability,
            "NOOP" => Self::Noop,
            "LOGOUT" => Self::Logout,
            "STARTTLS" => Self::StartTls,
            "CLOSE" => Self::Close,
            "LOGIN" => match args {
                [username, password, ..] => Self::Login {
                    username: unquote(username),
                    password: unquote(password),
                },
                _ => return Err(CommandError::MissingArguments("Missing username and password")),
            },
            "SELECT" => match args {
                [mailbox, ..] => Self::Select {
                    mailbox: unquote(mailbox),
                },
                [] => return Err(CommandError::MissingArguments("Missing mailbox name")),
            },
            "LIST" => match args {
                [reference, pattern, ..] => Self::List {
                    reference: unquote(reference),
                    pattern: unquote(pattern),
                },
                _ => {
                    return Err(CommandError::MissingArguments(
                        "Missing reference and mailbox name",
                    ));
                }
            },
            "STATUS" => match args {
                [mailbox, items @ ..] if !items.is_empty() => Self::Status {
                    mailbox: unquote(mailbox),
                    items: parse_status_items(&items.join(" ")),
                },
                _ => {
                    return Err(CommandError::MissingArguments(
                        "Missing mailbox and item names",
                    ));
                }
            },
            "UID" => Self::parse_uid(args)?,
            _ => return Err(CommandError::Unknown),
        };
        Ok(command)
    }

    fn parse_uid(args: &[&str]) -> Result<Self, CommandError> {
        let Some((subcommand, args)) = args.split_first() else {
            return Err(CommandError::MissingSubcommand);
        };

        if !subcommand.eq_ignore_ascii_case("FETCH") {
            return Err(CommandError::Unknown);
        }

        let [set, items @ ..] = args else {
            return Err(CommandError::MissingArguments(
                "Missing range set and item names",
            ));
        };
        if items.is_empty() {
            return Err(CommandError::MissingArguments(
                "Missing range set and item names",
            ));
        }

        let ranges = parse_range_set(set).map_err(CommandError::InvalidRange)?;
        let items =
            parse_message_data_item_names(&items.join(" ")).map_err(CommandError::InvalidItems)?;
        Ok(Self::UidFetch { ranges, items })
    }

    /// Returns the command name, for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::StartTls => "STARTTLS",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::List { .. } => "LIST",
            Self::Status { .. } => "STATUS",
            Self::Close => "CLOSE",
            Self::UidFetch { .. } => "UID FETCH",
        }
    }
}

/// Parses `(MESSAGES UNSEEN ...)`, silently dropping unknown items.
fn parse_status_items(list: &str) -> Vec<StatusAttribute> {
    let list = list.trim();
    let list = list.strip_prefix('(').unwrap_or(list);
    let list = list.strip_suffix(')').unwrap_or(list);
    list.split_whitespace()
        .filter_map(StatusAttribute::parse)
        .collect()
}
