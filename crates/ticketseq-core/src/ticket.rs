//! Ticket identifier type.

use std::fmt;

use serde::Serialize;

/// A `<PREFIX>-<N>` identifier naming one document pair, e.g. `CP-12`.
///
/// Ordering compares the prefix first and then the number numerically, so
/// `CP-9 < CP-10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct TicketId {
    pub prefix: String,
    pub number: u64,
}

impl TicketId {
    pub fn new(prefix: impl Into<String>, number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            number,
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.number)
    }
}

impl From<TicketId> for String {
    fn from(id: TicketId) -> Self {
        id.to_string()
    }
}
