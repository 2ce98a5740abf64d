//! Request line tokenizing.

/// A request line split into its parts.
///
/// Lines are split on single spaces, so arguments never contain spaces
/// except inside the raw text joined back by commands that need it (STATUS
/// item lists, FETCH item lists).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// Client-chosen tag echoed in the completion response.
    pub tag: &'a str,
    /// Command name as sent (match it case-insensitively).
    pub name: &'a str,
    /// Remaining space-separated arguments.
    pub args: Vec<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// Splits a request line into tag, command name and arguments.
    ///
    /// Surrounding whitespace (including the line terminator) is ignored.
    /// Returns `None` when the line has fewer than two tokens, which cannot
    /// be answered because there is no tag to answer with.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut parts = line.trim().split(' ');
        let tag = parts.next()?;
        let name = parts.next()?;
        Some(Self {
            tag,
            name,
            args: parts.collect(),
        })
    }

    /// Returns true if the command name matches `name`, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Removes the double quotes around a quoted string argument and resolves
/// its `\"` and `\\` escapes. Atoms are returned unchanged.
#[must_use]
pub fn unquote(arg: &str) -> String {
    let Some(inner) = arg.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return arg.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn splits_tag_name_and_args() {
        let line = CommandLine::parse("a1 SELECT INBOX\r\n").unwrap();
        assert_eq!(line.tag, "a1");
        assert_eq!(line.name, "SELECT");
        assert_eq!(line.args, ["INBOX"]);
        assert!(line.is("select"));
    }

    #[test]
    fn command_without_args() {
        let line = CommandLine::parse("a2 NOOP\n").unwrap();
        assert_eq!(line.name, "NOOP");
        assert!(line.args.is_empty());
    }

    #[test]
    fn too_short_lines() {
        assert_eq!(CommandLine::parse("a1\r\n"), None);
        assert_eq!(CommandLine::parse("\r\n"), None);
        assert_eq!(CommandLine::parse(""), None);
    }

    #[test]
    fn unquote_strings() {
        assert_eq!(unquote("INBOX"), "INBOX");
        assert_eq!(unquote("\"INBOX\""), "INBOX");
        assert_eq!(unquote(r#""a\"b\\c""#), r#"a"b\c"#);
        assert_eq!(unquote("\"\""), "");
        assert_eq!(unquote("\""), "\"");
    }
}
