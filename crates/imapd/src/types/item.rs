//! FETCH data item names.

/// A message data item requested by FETCH.
///
/// Structured `BODY[...]` and `BODY.PEEK[...]` items are normalized so that
/// `name` is always exactly `"BODY[]"` or `"BODY.PEEK[]"`; the section, header
/// field list and partial range are carried in the other fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MessageDataItemName {
    /// Upper-cased item name, e.g. `UID`, `RFC822.SIZE`, `BODY.PEEK[]`.
    pub name: String,
    /// Upper-cased section keyword (`HEADER`, `HEADER.FIELDS`, `TEXT`, `1.2`),
    /// empty when none was given.
    pub section: String,
    /// Header field names from `HEADER.FIELDS (...)`, as sent by the client.
    pub field_names: Option<Vec<String>>,
    /// Partial fetch as `(start, count)` from a `<start.count>` suffix.
    pub partial: Option<(u32, u32)>,
}

impl MessageDataItemName {
    /// Creates an item with no section, fields or partial range.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true for `BODY[]`/`BODY.PEEK[]` style items.
    #[must_use]
    pub fn is_body_section(&self) -> bool {
        self.name.ends_with("[]")
    }

    /// Returns true for `BODY.PEEK[]`, which must not set `\Seen`.
    #[must_use]
    pub fn is_peek(&self) -> bool {
        self.name == "BODY.PEEK[]"
    }

    /// Item name without the trailing `[]`, e.g. `BODY.PEEK`.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix("[]").unwrap_or(&self.name)
    }

    /// The bracketed section part: `[HEADER.FIELDS (DATE FROM)]`.
    pub(crate) fn section_spec(&self) -> String {
        match &self.field_names {
            Some(fields) => format!("[{} ({})]", self.section, fields.join(" ")),
            None => format!("[{}]", self.section),
        }
    }
}

impl std::fmt::Display for MessageDataItemName {
    /// Formats the item the way a client requests it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_body_section() {
            return f.write_str(&self.name);
        }
        f.write_str(self.base_name())?;
        f.write_str(&self.section_spec())?;
        if let Some((start, count)) = self.partial {
            write!(f, "<{start}.{count}>")?;
        }
        Ok(())
    }
}
