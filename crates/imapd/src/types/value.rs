//! Values carried in FETCH responses.

use chrono::{DateTime, FixedOffset, TimeZone};

use super::MessageDataItemName;

/// A value the response encoder knows how to put on the wire.
///
/// The set is closed: a backend cannot hand the encoder anything it does not
/// know how to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `NIL`.
    Nil,
    /// A decimal number.
    Number(u64),
    /// A quoted string.
    Text(String),
    /// A parenthesized list of atoms, written unquoted.
    List(Vec<String>),
    /// A date-time, written as a quoted `DD-Mon-YYYY HH:MM:SS +ZZZZ`.
    Timestamp(DateTime<FixedOffset>),
    /// Raw bytes, written as a `{length}` literal.
    Literal(Vec<u8>),
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(u64::from(n))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Literal(bytes)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(t: DateTime<Tz>) -> Self {
        Self::Timestamp(t.fixed_offset())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

/// One item of a FETCH response: the requested name and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDataItem {
    /// The item this value answers.
    pub item: MessageDataItemName,
    /// The value.
    pub data: Value,
}

impl MessageDataItem {
    /// Pairs an item name with its value.
    #[must_use]
    pub fn new(item: MessageDataItemName, data: impl Into<Value>) -> Self {
        Self {
            item,
            data: data.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(7u32), Value::Number(7));
        assert_eq!(Value::from("hi"), Value::Text("hi".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Literal(vec![1, 2]));
        assert_eq!(
            Value::from(vec!["\\Seen".to_string()]),
            Value::List(vec!["\\Seen".to_string()])
        );
        assert_eq!(Value::from(None::<u32>), Value::Nil);
        assert_eq!(Value::from(Some(3u32)), Value::Number(3));
    }

    #[test]
    fn timestamp_keeps_instant() {
        let now = Utc::now();
        let Value::Timestamp(t) = Value::from(now) else {
            panic!("Expected Timestamp variant");
        };
        assert_eq!(t, now);
    }
}
