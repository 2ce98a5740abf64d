//! Server response serialization.
//!
//! Every writer appends one complete CRLF-terminated response (or, for
//! values, one fragment of it) to a byte buffer. The session queues the
//! buffer on the transport once the whole response has been encoded, so an
//! encoding error never leaves half a line on the wire.

mod encode;

pub use encode::{
    write_astring, write_item_label, write_list, write_literal, write_quoted, write_timestamp,
    write_value,
};

use crate::command::StatusAttribute;
use crate::error::Result;
use crate::types::{
    Capability, Flag, MailboxListing, MessageDataItem, ResponseCode, Status, flag_strings,
};

use encode::check_line_safe;

/// Writes a status response: `<tag> OK [CODE] text` or `* OK ...` when
/// `tag` is `None`.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if the tag or text contains CR or LF.
pub fn write_status_response(
    buf: &mut Vec<u8>,
    tag: Option<&str>,
    status: Status,
    code: Option<&ResponseCode>,
    text: &str,
) -> Result<()> {
    let tag = tag.unwrap_or("*");
    check_line_safe(tag)?;
    check_line_safe(text)?;

    let mut line = format!("{tag} {status} ");
    if let Some(code) = code {
        line.push_str(&format!("[{code}] "));
    }
    line.push_str(text);
    buf.extend_from_slice(line.as_bytes());
    buf.extend_from_slice(b"\r\n");
    Ok(())
}

/// Writes `* CAPABILITY ...`.
pub fn write_capability(buf: &mut Vec<u8>, capabilities: &[Capability]) {
    buf.extend_from_slice(b"* CAPABILITY");
    for cap in capabilities {
        buf.push(b' ');
        buf.extend_from_slice(cap.to_string().as_bytes());
    }
    buf.extend_from_slice(b"\r\n");
}

/// Writes `* FLAGS (...)`.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if a keyword contains CR or LF.
pub fn write_flags(buf: &mut Vec<u8>, flags: &[Flag]) -> Result<()> {
    buf.extend_from_slice(b"* FLAGS ");
    write_list(buf, &flag_strings(flags))?;
    buf.extend_from_slice(b"\r\n");
    Ok(())
}

/// Writes a message count such as `* 3 EXISTS`.
pub fn write_count(buf: &mut Vec<u8>, count: u32, name: &str) {
    buf.extend_from_slice(format!("* {count} {name}\r\n").as_bytes());
}

/// Writes `* STATUS <mailbox> (<item> <n> ...)`.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if the mailbox name contains CR or LF.
pub fn write_status(
    buf: &mut Vec<u8>,
    mailbox: &str,
    items: &[(StatusAttribute, u32)],
) -> Result<()> {
    buf.extend_from_slice(b"* STATUS ");
    write_astring(buf, mailbox)?;
    buf.extend_from_slice(b" (");
    for (i, (attr, value)) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        buf.extend_from_slice(format!("{} {value}", attr.as_str()).as_bytes());
    }
    buf.extend_from_slice(b")\r\n");
    Ok(())
}

/// Writes `* LIST (<attrs>) "<delim>" <name>`.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if the name contains CR or LF.
pub fn write_mailbox_listing(buf: &mut Vec<u8>, listing: &MailboxListing) -> Result<()> {
    buf.extend_from_slice(b"* LIST (");
    for (i, attr) in listing.attributes.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        buf.extend_from_slice(attr.as_str().as_bytes());
    }
    buf.extend_from_slice(b") ");
    match listing.delimiter {
        Some(delim) => write_quoted(buf, &delim.to_string())?,
        None => buf.extend_from_slice(b"NIL"),
    }
    buf.push(b' ');
    write_quoted(buf, &listing.name)?;
    buf.extend_from_slice(b"\r\n");
    Ok(())
}

/// Writes `* <seq> FETCH (<label> <value> ...)`.
///
/// # Errors
///
/// Returns [`crate::Error::Encode`] if a value cannot be represented.
pub fn write_fetch(buf: &mut Vec<u8>, seq: u32, items: &[MessageDataItem]) -> Result<()> {
    buf.extend_from_slice(format!("* {seq} FETCH (").as_bytes());
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write_item_label(buf, &item.item);
        buf.push(b' ');
        write_value(buf, &item.data)?;
    }
    buf.extend_from_slice(b")\r\n");
    Ok(())
}
