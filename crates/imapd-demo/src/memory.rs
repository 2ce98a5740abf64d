//! In-memory mail store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use imapd::types::flag_strings;
use imapd::{
    Backend, BackendError, Flag, Mailbox, MailboxAttribute, MailboxInfo, MailboxListing,
    MessageDataItem, MessageDataItemName, Range, Value,
};

/// A stored message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Unique identifier within the mailbox.
    pub uid: u32,
    /// Flags set on the message.
    pub flags: Vec<Flag>,
    /// Arrival time.
    pub internal_date: DateTime<FixedOffset>,
    /// Full RFC 5322 text with CRLF line endings.
    pub raw: Vec<u8>,
}

impl Message {
    fn header(&self) -> &[u8] {
        self.raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map_or(&self.raw[..], |pos| &self.raw[..pos + 4])
    }

    fn text(&self) -> &[u8] {
        &self.raw[self.header().len()..]
    }

    /// Header lines whose field name is in `fields`, plus the blank line.
    fn header_fields(&self, fields: &[String]) -> Vec<u8> {
        let header = String::from_utf8_lossy(self.header());
        let mut out = String::new();
        let mut keep = false;
        for line in header.split_inclusive("\r\n") {
            if line == "\r\n" {
                break;
            }
            if !line.starts_with([' ', '\t']) {
                let name = line.split(':').next().unwrap_or_default();
                keep = fields.iter().any(|f| f.eq_ignore_ascii_case(name));
            }
            if keep {
                out.push_str(line);
            }
        }
        out.push_str("\r\n");
        out.into_bytes()
    }

    fn value(&self, item: &MessageDataItemName) -> Value {
        match item.name.as_str() {
            "UID" => Value::from(self.uid),
            "FLAGS" => Value::List(flag_strings(&self.flags)),
            "INTERNALDATE" => Value::from(self.internal_date),
            "RFC822.SIZE" => Value::from(self.raw.len() as u64),
            "RFC822" => Value::from(self.raw.clone()),
            "RFC822.HEADER" => Value::from(self.header().to_vec()),
            "RFC822.TEXT" => Value::from(self.text().to_vec()),
            "BODY[]" | "BODY.PEEK[]" => {
                let section = match item.section.as_str() {
                    "" => self.raw.clone(),
                    "HEADER" => self.header().to_vec(),
                    "TEXT" => self.text().to_vec(),
                    "HEADER.FIELDS" => {
                        self.header_fields(item.field_names.as_deref().unwrap_or(&[]))
                    }
                    _ => return Value::Nil,
                };
                Value::from(partial(section, item.partial))
            }
            // ENVELOPE, BODY and BODYSTRUCTURE need a MIME parser.
            _ => Value::Nil,
        }
    }
}

fn partial(data: Vec<u8>, range: Option<(u32, u32)>) -> Vec<u8> {
    let Some((start, count)) = range else {
        return data;
    };
    let start = (start as usize).min(data.len());
    let end = start.saturating_add(count as usize).min(data.len());
    data[start..end].to_vec()
}

/// One mailbox's messages, in sequence order.
#[derive(Debug, Clone)]
pub struct MemoryMailbox {
    uid_validity: u32,
    messages: Arc<Vec<Message>>,
}

#[async_trait]
impl Mailbox for MemoryMailbox {
    async fn info(&self) -> Result<MailboxInfo, BackendError> {
        let count = |pred: fn(&Message) -> bool| {
            u32::try_from(self.messages.iter().filter(|m| pred(m)).count())
                .map_err(BackendError::internal)
        };
        Ok(MailboxInfo {
            next_uid: self.messages.last().map_or(1, |m| m.uid.saturating_add(1)),
            uid_validity: self.uid_validity,
            exists: count(|_| true)?,
            recent: count(|m| m.flags.contains(&Flag::Recent))?,
            unseen: count(|m| !m.flags.contains(&Flag::Seen))?,
        })
    }

    async fn fetch_messages_by_uid(
        &self,
        ranges: &[Range],
        items: &[MessageDataItemName],
    ) -> Result<BTreeMap<u32, Vec<MessageDataItem>>, BackendError> {
        let mut result = BTreeMap::new();
        for (seq, message) in (1u32..).zip(self.messages.iter()) {
            if !ranges.iter().any(|r| r.contains(message.uid)) {
                continue;
            }
            let data = items
                .iter()
                .map(|item| MessageDataItem::new(item.clone(), message.value(item)))
                .collect();
            result.insert(seq, data);
        }
        Ok(result)
    }
}

/// A single-user store holding a fixed set of mailboxes.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    username: String,
    password: String,
    mailboxes: HashMap<String, MemoryMailbox>,
}

impl MemoryBackend {
    /// Creates a store with INBOX holding a couple of sample messages and an
    /// empty Archive.
    pub fn with_sample_data(username: impl Into<String>, password: impl Into<String>) -> Self {
        let received = Utc
            .with_ymd_and_hms(2012, 6, 12, 12, 9, 48)
            .single()
            .unwrap_or_default()
            .fixed_offset();
        let inbox = vec![
            Message {
                uid: 1,
                flags: vec![Flag::Seen],
                internal_date: received,
                raw: sample("blah@blah.com", "Some email", "Hello there.").into_bytes(),
            },
            Message {
                uid: 2,
                flags: vec![Flag::Recent],
                internal_date: received,
                raw: sample("test@example.com", "Another one", "Still here?").into_bytes(),
            },
        ];

        let mut mailboxes = HashMap::new();
        mailboxes.insert(
            "INBOX".to_string(),
            MemoryMailbox {
                uid_validity: 3,
                messages: Arc::new(inbox),
            },
        );
        mailboxes.insert(
            "Archive".to_string(),
            MemoryMailbox {
                uid_validity: 7,
                messages: Arc::new(Vec::new()),
            },
        );

        Self {
            username: username.into(),
            password: password.into(),
            mailboxes,
        }
    }

    fn find(&self, name: &str) -> Option<&MemoryMailbox> {
        if name.eq_ignore_ascii_case("INBOX") {
            return self.mailboxes.get("INBOX");
        }
        self.mailboxes.get(name)
    }
}

fn sample(from: &str, subject: &str, body: &str) -> String {
    format!(
        "Date: Tue, 12 Jun 2012 08:09:48 -0400\r\n\
         From: {from}\r\n\
         To: demo@example.com\r\n\
         Subject: {subject}\r\n\
         \r\n\
         {body}\r\n"
    )
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn mailbox(&self, name: &str) -> Result<Box<dyn Mailbox>, BackendError> {
        self.find(name)
            .cloned()
            .map(|mailbox| Box::new(mailbox) as Box<dyn Mailbox>)
            .ok_or(BackendError::NotFound)
    }

    async fn login(&self, username: &str, password: &str) -> Result<bool, BackendError> {
        Ok(username == self.username && password == self.password)
    }

    async fn list_mailboxes(
        &self,
        reference: &str,
        pattern: &str,
    ) -> Result<Vec<MailboxListing>, BackendError> {
        let pattern = format!("{reference}{pattern}");
        let mut names: Vec<_> = self
            .mailboxes
            .keys()
            .filter(|name| wildcard_match(pattern.as_bytes(), name.as_bytes()))
            .collect();
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| {
                MailboxListing::new(name.as_str()).with_attribute(MailboxAttribute::HasNoChildren)
            })
            .collect())
    }
}

/// LIST pattern matching: `*` matches anything, `%` anything but `/`.
fn wildcard_match(pattern: &[u8], name: &[u8]) -> bool {
    // reachable[i]: the pattern consumed so far matches name[..i]
    let mut reachable = vec![false; name.len() + 1];
    reachable[0] = true;
    for &p in pattern {
        let mut next = vec![false; name.len() + 1];
        match p {
            b'*' | b'%' => {
                let mut open = false;
                for (i, &r) in reachable.iter().enumerate() {
                    if p == b'%' && i > 0 && name[i - 1] == b'/' {
                        open = false;
                    }
                    open |= r;
                    next[i] = open;
                }
            }
            c => {
                for (i, &n) in name.iter().enumerate() {
                    next[i + 1] = reachable[i] && n == c;
                }
            }
        }
        reachable = next;
    }
    reachable[name.len()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn backend() -> MemoryBackend {
        MemoryBackend::with_sample_data("demo", "secret")
    }

    #[test]
    fn wildcards() {
        assert!(wildcard_match(b"*", b"INBOX"));
        assert!(wildcard_match(b"IN*", b"INBOX"));
        assert!(wildcard_match(b"%", b"Archive"));
        assert!(!wildcard_match(b"%", b"Archive/2020"));
        assert!(wildcard_match(b"*", b"Archive/2020"));
        assert!(!wildcard_match(b"Arch", b"Archive"));
        assert!(wildcard_match(b"%/%", b"Archive/2020"));
        assert!(wildcard_match(b"A*e/2*0", b"Archive/2020"));
        assert!(!wildcard_match(b"", b"INBOX"));
    }

    #[test]
    fn many_wildcards_stay_fast() {
        let pattern = "*".repeat(200) + "x";
        let name = "a".repeat(200);
        assert!(!wildcard_match(pattern.as_bytes(), name.as_bytes()));
        assert!(wildcard_match(b"****", name.as_bytes()));
    }

    #[tokio::test]
    async fn next_uid_saturates() {
        let mailbox = MemoryMailbox {
            uid_validity: 1,
            messages: Arc::new(vec![Message {
                uid: u32::MAX,
                flags: Vec::new(),
                internal_date: DateTime::default(),
                raw: Vec::new(),
            }]),
        };
        assert_eq!(mailbox.info().await.unwrap().next_uid, u32::MAX);
    }

    #[tokio::test]
    async fn login() {
        let backend = backend();
        assert!(backend.login("demo", "secret").await.unwrap());
        assert!(!backend.login("demo", "nope").await.unwrap());
    }

    #[tokio::test]
    async fn inbox_info() {
        let inbox = backend().mailbox("inbox").await.unwrap();
        let info = inbox.info().await.unwrap();
        assert_eq!(info.exists, 2);
        assert_eq!(info.recent, 1);
        assert_eq!(info.unseen, 1);
        assert_eq!(info.next_uid, 3);
        assert!(matches!(
            backend().mailbox("Spam").await,
            Err(BackendError::NotFound)
        ));
    }

    #[tokio::test]
    async fn fetch_header_fields_and_partial() {
        let inbox = backend().mailbox("INBOX").await.unwrap();
        let items = imapd::parse_message_data_item_names(
            "(UID BODY.PEEK[HEADER.FIELDS (SUBJECT)] BODY[TEXT]<0.5>)",
        )
        .unwrap();
        let result = inbox
            .fetch_messages_by_uid(&[Range::single(2)], &items)
            .await
            .unwrap();

        assert_eq!(result.keys().copied().collect::<Vec<_>>(), [2]);
        let data = &result[&2];
        assert_eq!(data[0].data, Value::Number(2));
        assert_eq!(
            data[1].data,
            Value::Literal(b"Subject: Another one\r\n\r\n".to_vec())
        );
        assert_eq!(data[2].data, Value::Literal(b"Still".to_vec()));
    }

    #[tokio::test]
    async fn list_sorted() {
        let listings = backend().list_mailboxes("", "*").await.unwrap();
        let names: Vec<_> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Archive", "INBOX"]);
    }
}
