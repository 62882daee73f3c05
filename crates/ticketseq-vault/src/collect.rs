//! Collector: primary documents and their current identifiers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ticketseq_core::{Result, TicketField, TicketMatch};

use crate::store::DocumentSource;

/// A primary document carrying a recognizable identifier.
#[derive(Debug, Clone)]
pub struct Collected {
    pub path: PathBuf,
    pub ticket: TicketMatch,
    pub content: String,
}

impl Collected {
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Scan `source` for primary documents with a `ticketId` field.
///
/// Documents without one (drafts, other series) are skipped. The result is
/// in path order.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a file cannot be
/// read.
pub fn collect(source: &impl DocumentSource, field: &TicketField) -> Result<Vec<Collected>> {
    let mut collected = Vec::new();

    for path in source.primaries()? {
        let Some(content) = source.read(&path)? else {
            continue;
        };
        match field.find(&content) {
            Some(ticket) => {
                if ticket.overflow {
                    tracing::warn!(
                        file = %path.display(),
                        id = %ticket.raw,
                        "identifier too large to compare exactly, ordering it last"
                    );
                }
                collected.push(Collected {
                    path,
                    ticket,
                    content,
                });
            }
            None => {
                tracing::debug!(file = %path.display(), "no {} ticketId, skipping", field.prefix());
            }
        }
    }

    for (number, files) in duplicates(&collected) {
        tracing::warn!(
            id = %format!("{}-{number}", field.prefix()),
            files = ?files,
            "identifier shared by several documents, keeping path order"
        );
    }

    Ok(collected)
}

/// Identifiers used by more than one document, with the files using them.
pub fn duplicates(collected: &[Collected]) -> BTreeMap<u64, Vec<String>> {
    let mut by_number: BTreeMap<u64, Vec<String>> = BTreeMap::new();
    for entry in collected {
        by_number
            .entry(entry.ticket.id.number)
            .or_default()
            .push(entry.file_name());
    }
    by_number.retain(|_, files| files.len() > 1);
    by_number
}

pub(crate) fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
