//! Wire encoding of FETCH values.

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};
use crate::types::{MessageDataItemName, Value};

/// Format of INTERNALDATE style timestamps.
const DATE_TIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// Writes a value in its wire form.
///
/// # Errors
///
/// Returns [`Error::Encode`] if text contains CR or LF.
pub fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Nil => buf.extend_from_slice(b"NIL"),
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::Text(s) => write_quoted(buf, s)?,
        Value::List(items) => write_list(buf, items)?,
        Value::Timestamp(t) => write_timestamp(buf, t),
        Value::Literal(bytes) => write_literal(buf, bytes),
    }
    Ok(())
}

/// Writes a quoted string. `"` is escaped, backslashes are passed through.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the string contains CR or LF.
pub fn write_quoted(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    check_line_safe(s)?;
    buf.push(b'"');
    for b in s.bytes() {
        if b == b'"' {
            buf.push(b'\\');
        }
        buf.push(b);
    }
    buf.push(b'"');
    Ok(())
}

/// Writes an atom when possible, a quoted string otherwise.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the string contains CR or LF.
pub fn write_astring(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    if s.is_empty() || s.bytes().any(needs_quoting) {
        write_quoted(buf, s)
    } else {
        buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Returns true if the byte cannot appear in an atom.
const fn needs_quoting(b: u8) -> bool {
    matches!(b, b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*') || b < 0x20 || b == 0x7F
}

/// Writes a parenthesized list; elements are written as they are.
///
/// # Errors
///
/// Returns [`Error::Encode`] if an element contains CR or LF.
pub fn write_list<S: AsRef<str>>(buf: &mut Vec<u8>, items: &[S]) -> Result<()> {
    buf.push(b'(');
    for (i, item) in items.iter().enumerate() {
        let item = item.as_ref();
        check_line_safe(item)?;
        if i > 0 {
            buf.push(b' ');
        }
        buf.extend_from_slice(item.as_bytes());
    }
    buf.push(b')');
    Ok(())
}

/// Writes `{len}\r\n` followed by the raw bytes.
pub fn write_literal(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.push(b'{');
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.extend_from_slice(b"}\r\n");
    buf.extend_from_slice(bytes);
}

/// Writes a quoted `DD-Mon-YYYY HH:MM:SS +ZZZZ` date-time.
pub fn write_timestamp(buf: &mut Vec<u8>, t: &DateTime<FixedOffset>) {
    buf.push(b'"');
    buf.extend_from_slice(t.format(DATE_TIME_FORMAT).to_string().as_bytes());
    buf.push(b'"');
}

/// Writes the label a FETCH response uses for an item.
///
/// `BODY.PEEK[...]` is answered as `BODY[...]` and a `<start.count>` partial
/// as `<start>`.
pub fn write_item_label(buf: &mut Vec<u8>, item: &MessageDataItemName) {
    if !item.is_body_section() {
        buf.extend_from_slice(item.name.as_bytes());
        return;
    }

    let label = match item.partial {
        Some((start, _)) => format!("BODY{}<{start}>", item.section_spec()),
        None => format!("BODY{}", item.section_spec()),
    };
    buf.extend_from_slice(label.as_bytes());
}

/// Rejects text that would break response framing.
pub(crate) fn check_line_safe(s: &str) -> Result<()> {
    if s.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(Error::Encode(format!(
            "{s:?} cannot be sent without a literal"
        )));
    }
    Ok(())
}
