//! End-to-end tests for the ticketseq CLI.
//!
//! Tests invoke the `ticketseq` binary as a subprocess against a temporary
//! project and check stdout, exit status, and the files left behind.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const POSTS: &str = "src/content/posts";
const COUNTER: &str = "scripts/article-counter.json";

fn ticketseq_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ticketseq"));
    cmd.current_dir(dir);
    cmd
}

fn project(docs: &[(&str, String)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(POSTS)).unwrap();
    std::fs::create_dir_all(dir.path().join("scripts")).unwrap();
    std::fs::write(
        dir.path().join(COUNTER),
        "{\n  \"SP\": {\n    \"next\": 150\n  },\n  \"CP\": {\n    \"next\": 10\n  }\n}\n",
    )
    .unwrap();
    for (name, content) in docs {
        std::fs::write(dir.path().join(POSTS).join(name), content).unwrap();
    }
    dir
}

fn post(dir: &Path, name: &str) -> PathBuf {
    dir.join(POSTS).join(name)
}

fn read_post(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(post(dir, name)).unwrap()
}

fn article(id: &str, title: &str) -> String {
    format!(
        "---\ntitle: \"{title}\"\noriginalDate: 2026-02-03\nticketId: \"{id}\"\nsource: x\n---\n\nimport ClawdNote from '../../components/ClawdNote.astro';\n\n{title} body.\n"
    )
}

fn run_json(dir: &Path, args: &[&str]) -> (Output, serde_json::Value) {
    let output = ticketseq_in(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .unwrap();
    let json = serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    });
    (output, json)
}

// === Sequencing ===

#[test]
fn e2e_renumbers_out_of_order_identifiers() {
    let dir = project(&[
        ("clawd-picks-20260201-a.mdx", article("CP-5", "A")),
        ("clawd-picks-20260202-b.mdx", article("CP-2", "B")),
        ("clawd-picks-20260203-c.mdx", article("CP-9", "C")),
    ]);

    let output = ticketseq_in(dir.path()).output().unwrap();
    assert!(
        output.status.success(),
        "run failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total CP documents: 3"));
    assert!(stdout.contains("CP-2 → CP-1 (clawd-picks-20260202-b.mdx)"));
    assert!(stdout.contains("CP-5 → CP-2 (clawd-picks-20260201-a.mdx)"));
    assert!(stdout.contains("CP-9 → CP-3 (clawd-picks-20260203-c.mdx)"));
    assert!(stdout.contains("Counter: CP next = 4"));
    assert!(stdout.contains("CP-1 through CP-3, zero gaps"));

    assert_eq!(read_post(dir.path(), "clawd-picks-20260202-b.mdx"), article("CP-1", "B"));
    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), article("CP-2", "A"));
    assert_eq!(read_post(dir.path(), "clawd-picks-20260203-c.mdx"), article("CP-3", "C"));

    let counter: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(COUNTER)).unwrap()).unwrap();
    assert_eq!(counter["CP"]["next"], 4);
    assert_eq!(counter["SP"]["next"], 150);
}

#[test]
fn e2e_syncs_mismatched_counterpart() {
    let dir = project(&[
        ("clawd-picks-20260201-a.mdx", article("CP-4", "A")),
        ("en-clawd-picks-20260201-a.mdx", article("CP-7", "A en")),
    ]);

    let (output, json) = run_json(dir.path(), &[]);
    assert!(output.status.success());
    assert_eq!(json["verification"]["mismatches"], serde_json::json!([]));

    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), article("CP-1", "A"));
    assert_eq!(
        read_post(dir.path(), "en-clawd-picks-20260201-a.mdx"),
        article("CP-1", "A en")
    );
}

#[test]
fn e2e_excludes_documents_without_identifier() {
    let draft = "---\ntitle: \"Draft\"\n---\n\nNot numbered yet.\n";
    let dir = project(&[
        ("clawd-picks-20260201-a.mdx", article("CP-3", "A")),
        ("clawd-picks-20260202-draft.mdx", draft.to_string()),
    ]);

    let (output, json) = run_json(dir.path(), &[]);
    assert!(output.status.success());
    assert_eq!(json["total"], 1);
    assert_eq!(json["counter_next"], 2);
    assert_eq!(json["verification"]["gaps"], serde_json::json!([]));
    assert_eq!(read_post(dir.path(), "clawd-picks-20260202-draft.mdx"), draft);
}

// === Idempotence and preservation ===

#[test]
fn e2e_second_run_rewrites_nothing() {
    let dir = project(&[
        ("clawd-picks-20260201-a.mdx", article("CP-8", "A")),
        ("en-clawd-picks-20260201-a.mdx", article("CP-5", "A en")),
        ("clawd-picks-20260202-b.mdx", article("CP-3", "B")),
    ]);

    let (first, json) = run_json(dir.path(), &[]);
    assert!(first.status.success());
    assert_eq!(json["changes"].as_array().unwrap().len(), 3);

    let before = std::fs::metadata(post(dir.path(), "clawd-picks-20260201-a.mdx"))
        .unwrap()
        .modified()
        .unwrap();
    let (second, json) = run_json(dir.path(), &[]);
    assert!(second.status.success());
    assert_eq!(json["changes"], serde_json::json!([]));
    assert_eq!(json["primary_changes"], 0);
    let after = std::fs::metadata(post(dir.path(), "clawd-picks-20260201-a.mdx"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(before, after);
}

#[test]
fn e2e_leaves_sequential_documents_byte_identical() {
    let odd = "---\r\ntitle:   'Spacing kept'  \r\nticketId:'CP-1'\r\n---\r\n\r\nticketId: CP-1 mention\r\n";
    let dir = project(&[("clawd-picks-20260201-a.mdx", odd.to_string())]);

    let output = ticketseq_in(dir.path()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), odd);
}

// === Failure handling ===

#[test]
fn e2e_malformed_counter_is_fatal_and_writes_nothing() {
    let dir = project(&[("clawd-picks-20260201-a.mdx", article("CP-5", "A"))]);
    std::fs::write(dir.path().join(COUNTER), "{ \"CP\": { \"next\": ").unwrap();

    let output = ticketseq_in(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("article-counter.json"), "stderr: {stderr}");
    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), article("CP-5", "A"));
}

#[test]
fn e2e_check_reports_all_findings_and_fails() {
    let dir = project(&[
        ("clawd-picks-20260201-a.mdx", article("CP-1", "A")),
        ("en-clawd-picks-20260201-a.mdx", article("CP-6", "A en")),
        ("clawd-picks-20260202-b.mdx", article("CP-4", "B")),
        ("clawd-picks-20260203-c.mdx", article("CP-4", "C")),
    ]);

    let (output, json) = run_json(dir.path(), &["--check"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json["mode"], "check");
    assert_eq!(json["verification"]["gaps"], serde_json::json!([2, 3]));
    assert_eq!(json["verification"]["mismatches"][0]["translated"], "CP-6");
    assert_eq!(json["verification"]["duplicates"][0]["id"], "CP-4");
    assert!(json.get("counter_next").is_none());

    // Nothing was changed
    assert_eq!(read_post(dir.path(), "clawd-picks-20260202-b.mdx"), article("CP-4", "B"));
}

#[test]
fn e2e_dry_run_writes_nothing() {
    let dir = project(&[("clawd-picks-20260201-a.mdx", article("CP-5", "A"))]);
    let counter_before = std::fs::read_to_string(dir.path().join(COUNTER)).unwrap();

    let output = ticketseq_in(dir.path()).arg("--dry-run").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dry run"));
    assert!(stdout.contains("CP-5 → CP-1"));

    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), article("CP-5", "A"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join(COUNTER)).unwrap(),
        counter_before
    );
}

// === Configuration ===

#[test]
fn e2e_config_selects_another_series() {
    let dir = project(&[
        ("shroom-picks-20260201-a.mdx", article("SP-40", "A")),
        ("shroom-picks-20260202-b.mdx", article("SP-12", "B")),
        ("clawd-picks-20260201-c.mdx", article("CP-9", "C")),
    ]);
    std::fs::write(
        dir.path().join("ticketseq.toml"),
        "prefix = \"SP\"\nfile_stem = \"shroom-picks\"\n",
    )
    .unwrap();

    let (output, json) = run_json(dir.path(), &["--config", "ticketseq.toml"]);
    assert!(output.status.success());
    assert_eq!(json["prefix"], "SP");
    assert_eq!(json["counter_next"], 3);

    assert_eq!(read_post(dir.path(), "shroom-picks-20260202-b.mdx"), article("SP-1", "B"));
    assert_eq!(read_post(dir.path(), "shroom-picks-20260201-a.mdx"), article("SP-2", "A"));
    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-c.mdx"), article("CP-9", "C"));

    let counter: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(COUNTER)).unwrap()).unwrap();
    assert_eq!(counter["SP"]["next"], 3);
    assert_eq!(counter["CP"]["next"], 10);
}

#[test]
fn e2e_root_flag_runs_against_another_directory() {
    let dir = project(&[("clawd-picks-20260201-a.mdx", article("CP-3", "A"))]);
    let elsewhere = TempDir::new().unwrap();

    let output = ticketseq_in(elsewhere.path())
        .arg("--root")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(read_post(dir.path(), "clawd-picks-20260201-a.mdx"), article("CP-1", "A"));
}
