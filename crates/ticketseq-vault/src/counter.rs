//! Counter updater: point `<PREFIX>.next` past the last identifier.

use std::path::{Path, PathBuf};

use ticketseq_core::{CounterRecord, Result};

use crate::store::write_atomic;

/// A computed, not yet written, counter record.
#[derive(Debug, Clone)]
pub struct CounterUpdate {
    pub path: PathBuf,
    pub next: u64,
    pub contents: String,
}

/// Load the record at `path` and set `prefix`'s `next` to `total + 1`.
///
/// # Errors
///
/// Fails if the record is missing, unparseable, or its entry for `prefix`
/// is not an object. Callers treat this as fatal.
pub fn plan(path: &Path, prefix: &str, total: usize) -> Result<CounterUpdate> {
    let mut record = CounterRecord::load(path)?;
    let next = total as u64 + 1;
    if let Some(previous) = record.next(prefix) {
        tracing::debug!(prefix, previous, next, "counter update");
    }
    record.set_next(prefix, next)?;

    Ok(CounterUpdate {
        path: path.to_path_buf(),
        next,
        contents: record.render()?,
    })
}

/// Write the record.
///
/// # Errors
///
/// Returns [`ticketseq_core::TicketError::Io`] if the write fails.
pub fn commit(update: &CounterUpdate) -> Result<()> {
    write_atomic(&update.path, &update.contents)
}
