//! Locating and rewriting the `ticketId` front-matter field.
//!
//! Documents carry a `---` delimited front-matter block:
//! ```markdown
//! ---
//! title: "Some article"
//! ticketId: "CP-12"
//! lang: zh-tw
//! ---
//!
//! Body here.
//! ```
//!
//! The field is found by pattern matching over the raw text of the block
//! rather than by deserializing it, so a rewrite touches only the digits of
//! the identifier and every other byte of the file is preserved.

use std::ops::Range;

use regex::Regex;

use crate::error::{Result, TicketError};
use crate::ticket::TicketId;

/// Byte range of the front-matter body (the text between the `---`
/// delimiters) within `content`.
///
/// A leading byte-order mark and whitespace before the opening delimiter
/// are skipped. Returns `None` if the file does not open with a `---`
/// delimiter or the closing delimiter is missing.
pub fn frontmatter_span(content: &str) -> Option<Range<usize>> {
    let unmarked = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lead = content.len() - unmarked.trim_start().len();
    if !content[lead..].starts_with("---") {
        return None;
    }

    let after_open = lead + 3;
    let rest = &content[after_open..];
    let start = after_open + (rest.len() - rest.trim_start_matches(['\r', '\n']).len());

    // Closing delimiter must sit at the start of a line
    let close = content[start..].find("\n---")?;
    Some(start..start + close)
}

/// A `ticketId` field found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketMatch {
    /// Parsed identifier.
    pub id: TicketId,
    /// Identifier exactly as written, e.g. `CP-07`.
    pub raw: String,
    /// Byte range of the digits within the whole document.
    pub digits: Range<usize>,
    /// The digits exceed `u64`; `id.number` is saturated to `u64::MAX`.
    pub overflow: bool,
}

impl TicketMatch {
    /// Whether the field already spells `id` exactly.
    pub fn is_already(&self, id: &TicketId) -> bool {
        self.raw == id.to_string()
    }

    /// Return `content` with only the identifier digits replaced by `number`.
    ///
    /// `content` must be the text this match was found in.
    pub fn replace_in(&self, content: &str, number: u64) -> String {
        let digits = number.to_string();
        let mut out = String::with_capacity(content.len() + digits.len());
        out.push_str(&content[..self.digits.start]);
        out.push_str(&digits);
        out.push_str(&content[self.digits.end..]);
        out
    }
}

/// Matcher for the `ticketId` field of one identifier prefix.
#[derive(Debug, Clone)]
pub struct TicketField {
    prefix: String,
    pattern: Regex,
}

impl TicketField {
    /// Build a matcher for identifiers of the form `<prefix>-<N>`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::Config`] if the prefix is empty or not ASCII
    /// alphanumeric.
    pub fn new(prefix: &str) -> Result<Self> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TicketError::Config(format!(
                "ticket prefix must be ASCII alphanumeric, got '{prefix}'"
            )));
        }
        let pattern = Regex::new(&format!(
            r#"(?m)^ticketId:\s*["']?(?P<id>{}-(?P<num>[0-9]+))["']?"#,
            regex::escape(prefix)
        ))
        .map_err(|e| TicketError::Config(e.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Find the first `ticketId` field in the document's front matter.
    ///
    /// Returns `None` when there is no front matter or no field with this
    /// prefix; such documents are out of scope for renumbering. Digits too
    /// large for a `u64` still match, sorting after every other identifier,
    /// with [`TicketMatch::overflow`] set.
    pub fn find(&self, content: &str) -> Option<TicketMatch> {
        let span = frontmatter_span(content)?;
        let block = &content[span.clone()];

        let caps = self.pattern.captures(block)?;
        let id = caps.name("id")?;
        let num = caps.name("num")?;
        let (number, overflow) = match num.as_str().parse::<u64>() {
            Ok(number) => (number, false),
            Err(_) => (u64::MAX, true),
        };

        Some(TicketMatch {
            id: TicketId::new(self.prefix.clone(), number),
            raw: id.as_str().to_string(),
            digits: span.start + num.start()..span.start + num.end(),
            overflow,
        })
    }

    /// Rewrite the field to `number`.
    ///
    /// Returns `None` if the document has no field, or if it already spells
    /// the target identifier, so callers never write an unchanged file.
    pub fn rewrite(&self, content: &str, number: u64) -> Option<(TicketMatch, String)> {
        let found = self.find(content)?;
        if found.is_already(&TicketId::new(self.prefix.clone(), number)) {
            return None;
        }
        let updated = found.replace_in(content, number);
        Some((found, updated))
    }
}
