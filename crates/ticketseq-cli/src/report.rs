//! Run report rendering: text and JSON.

use ticketseq_vault::{RunMode, RunReport, Variant};

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render `report` in the requested format.
pub fn render(report: &RunReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report),
    }
}

fn render_json(report: &RunReport) -> String {
    let mut out = serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let prefix = &report.prefix;

    if report.mode == RunMode::DryRun {
        out.push_str("Dry run: no files will be written\n");
    }
    out.push_str(&format!("Total {prefix} documents: {}\n", report.total));

    for change in &report.changes {
        let marker = match change.variant {
            Variant::Primary => "",
            Variant::Translated => " [translated]",
        };
        out.push_str(&format!(
            "  {} → {} ({}){marker}\n",
            change.old, change.new, change.file
        ));
    }

    if report.mode != RunMode::Check {
        let translated = report.changes.len() - report.primary_changes;
        out.push_str(&format!(
            "\nChanged: {} primary files, {translated} translated files\n",
            report.primary_changes
        ));
    }
    if let Some(next) = report.counter_next {
        out.push_str(&format!("Counter: {prefix} next = {next}\n"));
    }

    out.push_str("\n=== Verification ===\n");
    out.push_str(&render_findings(report));

    out.push_str(if report.passed() { "\nPASSED\n" } else { "\nFAILED\n" });
    out
}

fn render_findings(report: &RunReport) -> String {
    let prefix = &report.prefix;
    let v = &report.verification;
    let mut lines: Vec<String> = Vec::new();

    lines.extend(v.gaps.iter().map(|gap| format!("  {prefix}-{gap}: MISSING")));
    if v.gaps.is_empty() {
        if v.total == 0 {
            lines.push(format!("  no {prefix} documents found"));
        } else {
            lines.push(format!("  {prefix}-1 through {prefix}-{}, zero gaps", v.total));
        }
    }

    lines.extend(
        v.duplicates
            .iter()
            .map(|dup| format!("  DUPLICATE: {} in {}", dup.id, dup.files.join(", "))),
    );

    lines.extend(v.mismatches.iter().map(|m| {
        format!(
            "  PAIR MISMATCH: {} primary={} translated={}",
            m.file, m.primary, m.translated
        )
    }));
    if v.mismatches.is_empty() {
        lines.push("  all pairs match".to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
