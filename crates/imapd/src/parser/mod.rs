//! IMAP request parsing.
//!
//! Pure, sans-I/O functions that turn the text of a request line into
//! structured values:
//!
//! - [`CommandLine`]: splits a line into tag, command name and arguments
//! - [`parse_range_set`]: message ranges such as `1,2:4,5:*`
//! - [`parse_message_data_item_names`]: FETCH items such as
//!   `(UID BODY.PEEK[HEADER.FIELDS (DATE FROM)]<0.1024>)` or the `FAST`,
//!   `ALL` and `FULL` macros
//!
//! # Example
//!
//! ```
//! use imapd::parser::{parse_message_data_item_names, parse_range_set};
//!
//! let ranges = parse_range_set("1,2:4,5:*").unwrap();
//! assert_eq!(ranges.len(), 3);
//!
//! let items = parse_message_data_item_names("(UID RFC822.SIZE)").unwrap();
//! assert_eq!(items[1].name, "RFC822.SIZE");
//! ```

mod items;
mod line;
mod range;

pub use items::{ALL, FAST, FULL, VALID_DATA_ITEM_NAMES, parse_message_data_item_names};
pub use line::{CommandLine, unquote};
pub use range::parse_range_set;

use thiserror::Error;

/// Errors from the argument grammars.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The sequence set is malformed; carries the whole argument.
    #[error("'{0}' is not a valid range set")]
    InvalidRange(String),

    /// A data item is malformed or not allowed; carries the raw token.
    #[error("'{0}' is not a valid data item selector")]
    InvalidDataItem(String),
}
