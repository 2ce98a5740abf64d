//! FETCH data item grammar.
//!
//! Accepts either a macro (`FAST`, `ALL`, `FULL`) or a parenthesized list of
//! items. `BODY[...]` and `BODY.PEEK[...]` items may carry a section keyword,
//! a header field list and a `<start.count>` partial range:
//!
//! ```text
//! (UID BODY.PEEK[HEADER.FIELDS (DATE FROM)]<0.1024>)
//! ```

use super::ParseError;
use crate::types::MessageDataItemName;

/// Data item names a client may request.
pub const VALID_DATA_ITEM_NAMES: [&str; 12] = [
    "BODY",
    "BODY[]",
    "BODY.PEEK[]",
    "BODYSTRUCTURE",
    "ENVELOPE",
    "FLAGS",
    "INTERNALDATE",
    "RFC822",
    "RFC822.HEADER",
    "RFC822.SIZE",
    "RFC822.TEXT",
    "UID",
];

/// Expansion of the `FAST` macro.
pub const FAST: &[&str] = &["FLAGS", "INTERNALDATE", "RFC822.SIZE"];
/// Expansion of the `ALL` macro.
pub const ALL: &[&str] = &["FLAGS", "INTERNALDATE", "RFC822.SIZE", "ENVELOPE"];
/// Expansion of the `FULL` macro.
pub const FULL: &[&str] = &["FLAGS", "INTERNALDATE", "RFC822.SIZE", "ENVELOPE", "BODY"];

/// Parses and validates the data item argument of a FETCH command.
///
/// The first item that is malformed or not in [`VALID_DATA_ITEM_NAMES`]
/// rejects the whole list.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDataItem`] carrying the offending raw token.
pub fn parse_message_data_item_names(
    input: &str,
) -> Result<Vec<MessageDataItemName>, ParseError> {
    let input = input.trim();

    let body = if let Some(list) = input.strip_prefix('(') {
        list.strip_suffix(')')
            .ok_or_else(|| ParseError::InvalidDataItem(input.to_string()))?
    } else {
        if let Some(items) = expand_macro(input) {
            return Ok(items);
        }
        input
    };

    let items = ItemTokens::new(body)
        .map(parse_item)
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err(ParseError::InvalidDataItem(input.to_string()));
    }
    Ok(items)
}

fn expand_macro(token: &str) -> Option<Vec<MessageDataItemName>> {
    let names = match token.to_ascii_uppercase().as_str() {
        "FAST" => FAST,
        "ALL" => ALL,
        "FULL" => FULL,
        _ => return None,
    };
    Some(names.iter().map(|n| MessageDataItemName::simple(*n)).collect())
}

fn parse_item(raw: &str) -> Result<MessageDataItemName, ParseError> {
    let invalid = || ParseError::InvalidDataItem(raw.to_string());

    let item = match raw.find('[') {
        Some(open) => parse_body_section(raw, open).ok_or_else(invalid)?,
        None => MessageDataItemName::simple(raw.to_ascii_uppercase()),
    };

    if VALID_DATA_ITEM_NAMES.contains(&item.name.as_str()) {
        Ok(item)
    } else {
        Err(invalid())
    }
}

/// Parses `BODY[section (fields)]<start.count>` with the `[` at `open`.
fn parse_body_section(raw: &str, open: usize) -> Option<MessageDataItemName> {
    let prefix = raw[..open].to_ascii_uppercase();
    if prefix != "BODY" && prefix != "BODY.PEEK" {
        return None;
    }

    let close = raw.rfind(']').filter(|&close| close > open)?;
    let inner = &raw[open + 1..close];
    let rest = &raw[close + 1..];

    let (section, field_names) = match inner.split_once(' ') {
        None => (inner, None),
        Some((section, fields)) => {
            let fields = fields.trim().strip_prefix('(')?.strip_suffix(')')?;
            let names: Vec<String> = fields
                .split(' ')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if section.is_empty() || names.is_empty() || !names.iter().all(|n| is_field_name(n))
            {
                return None;
            }
            (section, Some(names))
        }
    };

    if !section
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.')
    {
        return None;
    }

    let partial = if rest.is_empty() {
        None
    } else {
        Some(parse_partial(rest)?)
    };

    Some(MessageDataItemName {
        name: format!("{prefix}[]"),
        section: section.to_ascii_uppercase(),
        field_names,
        partial,
    })
}

/// Parses `<start.count>`.
fn parse_partial(s: &str) -> Option<(u32, u32)> {
    let (start, count) = s.strip_prefix('<')?.strip_suffix('>')?.split_once('.')?;
    Some((parse_number(start)?, parse_number(count)?))
}

fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Header field names are printable ASCII without colon, brackets or
/// parentheses.
fn is_field_name(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b':' | b'(' | b')' | b'[' | b']'))
}

/// Splits a data item list on spaces that are outside brackets.
struct ItemTokens<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ItemTokens<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for ItemTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.input.as_bytes();
        while bytes.get(self.pos) == Some(&b' ') {
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        let mut depth = 0usize;
        while let Some(&b) = bytes.get(self.pos) {
            match b {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b' ' if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn names(items: &[MessageDataItemName]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn bare_item() {
        assert_eq!(
            parse_message_data_item_names("UID").unwrap(),
            [MessageDataItemName::simple("UID")]
        );
    }

    #[test]
    fn list_of_simple_items() {
        assert_eq!(
            parse_message_data_item_names("(BODY[] RFC822.TEXT)").unwrap(),
            [
                MessageDataItemName::simple("BODY[]"),
                MessageDataItemName::simple("RFC822.TEXT")
            ]
        );
    }

    #[test]
    fn structured_peek_with_fields_and_partial() {
        let items =
            parse_message_data_item_names("(BODY.PEEK[HEADER.FIELDS (DATE FROM)]<5.20>)").unwrap();
        assert_eq!(
            items,
            [MessageDataItemName {
                name: "BODY.PEEK[]".to_string(),
                section: "HEADER.FIELDS".to_string(),
                field_names: Some(vec!["DATE".to_string(), "FROM".to_string()]),
                partial: Some((5, 20)),
            }]
        );
    }

    #[test]
    fn structured_items_are_case_insensitive() {
        let items = parse_message_data_item_names("(body[header] uid)").unwrap();
        assert_eq!(names(&items), ["BODY[]", "UID"]);
        assert_eq!(items[0].section, "HEADER");
    }

    #[test]
    fn section_without_fields() {
        let items = parse_message_data_item_names("(BODY[TEXT]<0.100> FLAGS)").unwrap();
        assert_eq!(items[0].name, "BODY[]");
        assert_eq!(items[0].section, "TEXT");
        assert_eq!(items[0].field_names, None);
        assert_eq!(items[0].partial, Some((0, 100)));
        assert_eq!(items[1].name, "FLAGS");
    }

    #[test]
    fn invalid_item_names_the_token() {
        assert_eq!(
            parse_message_data_item_names("(UID INVALID)"),
            Err(ParseError::InvalidDataItem("INVALID".to_string()))
        );
    }

    #[test]
    fn malformed_sections_are_rejected() {
        for input in [
            "(BINARY[1])",
            "(BODY[HEADER.FIELDS DATE])",
            "(BODY[ (DATE)])",
            "(BODY[HEADER.FIELDS ()])",
            "(BODY[TEXT]<5>)",
            "(BODY[TEXT]<a.b>)",
            "(BODY[TEXT]x)",
            "(BODY[HE@DER])",
        ] {
            assert!(
                matches!(
                    parse_message_data_item_names(input),
                    Err(ParseError::InvalidDataItem(_))
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn unbalanced_or_empty_lists_are_rejected() {
        assert!(parse_message_data_item_names("(UID").is_err());
        assert!(parse_message_data_item_names("()").is_err());
        assert!(parse_message_data_item_names("").is_err());
    }

    #[test]
    fn macros_expand_in_order() {
        assert_eq!(
            names(&parse_message_data_item_names("FAST").unwrap()),
            ["FLAGS", "INTERNALDATE", "RFC822.SIZE"]
        );
        assert_eq!(
            names(&parse_message_data_item_names("ALL").unwrap()),
            ["FLAGS", "INTERNALDATE", "RFC822.SIZE", "ENVELOPE"]
        );
        assert_eq!(
            names(&parse_message_data_item_names("FULL").unwrap()),
            ["FLAGS", "INTERNALDATE", "RFC822.SIZE", "ENVELOPE", "BODY"]
        );
    }

    #[test]
    fn macros_are_case_insensitive() {
        assert_eq!(
            parse_message_data_item_names("fast").unwrap(),
            parse_message_data_item_names("FAST").unwrap()
        );
        assert_eq!(
            parse_message_data_item_names("Full").unwrap(),
            parse_message_data_item_names("FULL").unwrap()
        );
    }

    #[test]
    fn macros_are_not_items() {
        assert_eq!(
            parse_message_data_item_names("(FAST)"),
            Err(ParseError::InvalidDataItem("FAST".to_string()))
        );
    }

    #[test]
    fn tokens_split_outside_brackets_only() {
        let tokens: Vec<_> = ItemTokens::new("UID  BODY[HEADER.FIELDS (A B)] FLAGS").collect();
        assert_eq!(tokens, ["UID", "BODY[HEADER.FIELDS (A B)]", "FLAGS"]);
    }

    proptest! {
        #[test]
        fn never_panics(input in "\\PC*") {
            let _ = parse_message_data_item_names(&input);
        }

        #[test]
        fn valid_names_always_parse(index in 0usize..VALID_DATA_ITEM_NAMES.len()) {
            let name = VALID_DATA_ITEM_NAMES[index];
            let items =
                parse_message_data_item_names(&format!("({})", name.to_ascii_lowercase()))
                    .unwrap();
            prop_assert_eq!(items.len(), 1);
            prop_assert_eq!(items[0].name.as_str(), name);
        }
    }
}
