//! Renumberer: assign 1..N by current identifier and sync counterparts.
//!
//! Renumbering is split into [`plan`], which computes every new file body
//! in memory, and [`commit`], which writes them. Nothing touches disk until
//! the whole plan (and the counter update) has been computed.

use std::path::PathBuf;

use serde::Serialize;

use ticketseq_core::{LayoutConfig, Result, TicketField, TicketId};

use crate::collect::{file_name, Collected};
use crate::store::{write_atomic, DocumentSource};

/// Which member of a document pair a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Primary,
    Translated,
}

/// One identifier rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub file: String,
    pub variant: Variant,
    /// Identifier as it was written before the run.
    pub old: String,
    pub new: TicketId,
}

/// Everything a renumbering run would write.
#[derive(Debug, Clone, Default)]
pub struct RenumberPlan {
    /// Full new contents, in the order they will be written.
    pub writes: Vec<(PathBuf, String)>,
    pub changes: Vec<Change>,
}

impl RenumberPlan {
    pub fn primary_changes(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| c.variant == Variant::Primary)
            .count()
    }
}

/// Compute the renumbering of `collected`.
///
/// Documents are ordered by current numeric identifier; the sort is stable,
/// so documents sharing an identifier keep path order. Each counterpart is
/// brought in line with its primary's new identifier even when the primary
/// itself is unchanged.
///
/// # Errors
///
/// Returns an error if a counterpart exists but cannot be read.
pub fn plan(
    source: &impl DocumentSource,
    field: &TicketField,
    config: &LayoutConfig,
    mut collected: Vec<Collected>,
) -> Result<RenumberPlan> {
    collected.sort_by_key(|entry| entry.ticket.id.number);

    let mut plan = RenumberPlan::default();
    for (number, entry) in (1u64..).zip(collected) {
        let new = TicketId::new(field.prefix(), number);

        if !entry.ticket.is_already(&new) {
            let updated = entry.ticket.replace_in(&entry.content, number);
            tracing::info!(file = %entry.path.display(), old = %entry.ticket.raw, new = %new, "renumber");
            plan.changes.push(Change {
                file: entry.file_name(),
                variant: Variant::Primary,
                old: entry.ticket.raw.clone(),
                new: new.clone(),
            });
            plan.writes.push((entry.path.clone(), updated));
        }

        let Some(counterpart) = config.counterpart_of(&entry.path) else {
            continue;
        };
        let Some(content) = source.read(&counterpart)? else {
            tracing::debug!(file = %entry.path.display(), "no counterpart");
            continue;
        };
        if let Some((old, updated)) = field.rewrite(&content, number) {
            tracing::info!(file = %counterpart.display(), old = %old.raw, new = %new, "sync counterpart");
            plan.changes.push(Change {
                file: file_name(&counterpart),
                variant: Variant::Translated,
                old: old.raw,
                new,
            });
            plan.writes.push((counterpart, updated));
        }
    }

    Ok(plan)
}

/// Write every planned file.
///
/// Each file is replaced atomically; the plan as a whole is not. If a write
/// fails, files earlier in the plan stay rewritten.
///
/// # Errors
///
/// Returns the first write error.
pub fn commit(plan: &RenumberPlan) -> Result<()> {
    for (path, contents) in &plan.writes {
        write_atomic(path, contents)?;
    }
    Ok(())
}
