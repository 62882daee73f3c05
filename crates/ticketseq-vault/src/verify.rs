//! Verifier: re-scan and check the sequence and the pairs.
//!
//! Every check runs to completion and all findings are returned together;
//! nothing stops at the first discrepancy.

use std::collections::BTreeSet;

use serde::Serialize;

use ticketseq_core::{LayoutConfig, Result, TicketField, TicketId};

use crate::collect::{collect, duplicates, file_name};
use crate::store::DocumentSource;

/// A primary and its counterpart carrying different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairMismatch {
    pub file: String,
    pub primary: String,
    pub translated: String,
}

/// An identifier carried by more than one primary document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub id: TicketId,
    pub files: Vec<String>,
}

/// All findings of one verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Number of primary documents with an identifier.
    pub total: usize,
    /// Values in `1..=total` no primary document carries.
    pub gaps: Vec<u64>,
    pub mismatches: Vec<PairMismatch>,
    pub duplicates: Vec<Duplicate>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.gaps.is_empty() && self.mismatches.is_empty() && self.duplicates.is_empty()
    }
}

/// Check that primaries carry exactly `1..=N` and every pair agrees.
///
/// A counterpart without an identifier field is not compared.
///
/// # Errors
///
/// Returns an error only if the directory cannot be listed or read.
pub fn verify(
    source: &impl DocumentSource,
    field: &TicketField,
    config: &LayoutConfig,
) -> Result<Verification> {
    let collected = collect(source, field)?;
    let total = collected.len();

    let in_use: BTreeSet<u64> = collected.iter().map(|c| c.ticket.id.number).collect();
    let gaps: Vec<u64> = (1..=total as u64).filter(|n| !in_use.contains(n)).collect();
    for gap in &gaps {
        tracing::debug!(id = %TicketId::new(field.prefix(), *gap), "missing");
    }

    let duplicates = duplicates(&collected)
        .into_iter()
        .map(|(number, files)| Duplicate {
            id: TicketId::new(field.prefix(), number),
            files,
        })
        .collect();

    let mut mismatches = Vec::new();
    for entry in &collected {
        let Some(counterpart) = config.counterpart_of(&entry.path) else {
            continue;
        };
        let Some(content) = source.read(&counterpart)? else {
            continue;
        };
        let Some(translated) = field.find(&content) else {
            continue;
        };
        if translated.raw != entry.ticket.raw {
            tracing::debug!(file = %entry.path.display(), "pair mismatch");
            mismatches.push(PairMismatch {
                file: file_name(&entry.path),
                primary: entry.ticket.raw.clone(),
                translated: translated.raw,
            });
        }
    }

    Ok(Verification {
        total,
        gaps,
        mismatches,
        duplicates,
    })
}
