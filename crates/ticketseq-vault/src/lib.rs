//! # ticketseq-vault
//!
//! The renumbering run over a posts directory.
//!
//! A run has four stages: collect primary documents, renumber them to
//! `1..=N` (syncing translated counterparts), set the counter record's
//! `next` to `N + 1`, then re-scan and verify. Renumbering and the counter
//! update are both computed before anything is written, so a bad counter
//! record aborts the run with the documents untouched.

pub mod collect;
pub mod counter;
pub mod renumber;
pub mod store;
pub mod verify;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ticketseq_core::{LayoutConfig, Result};

pub use collect::{collect, Collected};
pub use renumber::{Change, RenumberPlan, Variant};
pub use store::{DocumentSource, PostsDir};
pub use verify::{verify, Duplicate, PairMismatch, Verification};

/// What a run is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Renumber, update the counter, verify.
    Apply,
    /// Plan everything and verify the planned state; write nothing.
    DryRun,
    /// Verify the directory as it is.
    Check,
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub prefix: String,
    pub started_at: DateTime<Utc>,
    pub mode: RunMode,
    /// Primary documents with an identifier, before renumbering.
    pub total: usize,
    pub changes: Vec<Change>,
    pub primary_changes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_next: Option<u64>,
    pub verification: Verification,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.verification.passed()
    }
}

/// Run the tool against the project rooted at `root`.
///
/// # Errors
///
/// Returns an error for fatal conditions only: an unreadable directory or
/// file, or a missing or malformed counter record. Gaps and mismatches are
/// findings in the returned report.
pub fn run(root: &Path, config: &LayoutConfig, mode: RunMode) -> Result<RunReport> {
    config.validate()?;
    let started_at = Utc::now();
    let field = config.ticket_field()?;
    let posts = PostsDir::open(root, config)?;

    if mode == RunMode::Check {
        let verification = verify(&posts, &field, config)?;
        return Ok(RunReport {
            prefix: config.prefix.clone(),
            started_at,
            mode,
            total: verification.total,
            changes: Vec::new(),
            primary_changes: 0,
            counter_next: None,
            verification,
        });
    }

    let collected = collect(&posts, &field)?;
    let total = collected.len();
    tracing::info!(prefix = %config.prefix, total, "collected primary documents");

    let plan = renumber::plan(&posts, &field, config, collected)?;
    let counter = counter::plan(&config.counter_path_in(root), &config.prefix, total)?;

    let verification = match mode {
        RunMode::Apply => {
            renumber::commit(&plan)?;
            counter::commit(&counter)?;
            verify(&posts, &field, config)?
        }
        _ => {
            let staged = posts.staged(plan.writes.iter().cloned());
            verify(&staged, &field, config)?
        }
    };

    if !verification.passed() {
        tracing::warn!(
            gaps = verification.gaps.len(),
            mismatches = verification.mismatches.len(),
            duplicates = verification.duplicates.len(),
            "verification failed"
        );
    }

    Ok(RunReport {
        prefix: config.prefix.clone(),
        started_at,
        mode,
        total,
        primary_changes: plan.primary_changes(),
        changes: plan.changes,
        counter_next: Some(counter.next),
        verification,
    })
}
