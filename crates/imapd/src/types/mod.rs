//! Core IMAP types.
//!
//! This module defines the values exchanged between the protocol engine and
//! mailbox backends, following RFC 3501 (`IMAP4rev1`).

#![allow(clippy::missing_const_for_fn)]

mod capability;
mod flags;
mod item;
mod mailbox;
mod range;
mod response_code;
mod value;

pub use capability::{Capability, Status};
pub use flags::{Flag, flag_strings};
pub use item::MessageDataItemName;
pub use mailbox::{MailboxAttribute, MailboxInfo, MailboxListing};
pub use range::Range;
pub use response_code::ResponseCode;
pub use value::{MessageDataItem, Value};
