//! ticketseq CLI — keep ticket identifiers gap-free across paired documents.
//!
//! With no arguments, renumbers the `CP` series under the current directory,
//! updates the counter record, and verifies the result. Exit status is 0 when
//! verification passes, 1 when it reports findings, 2 on a fatal error.

mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use ticketseq_core::LayoutConfig;
use ticketseq_vault::RunMode;

use crate::report::OutputFormat;

#[derive(Parser)]
#[command(name = "ticketseq")]
#[command(version)]
#[command(about = "Renumber ticket documents into a gap-free sequence")]
struct Cli {
    /// Project root the layout paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// TOML layout file, relative to the root (prefix, posts_dir, file_stem, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plan and verify the result without writing anything
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Only verify the current state
    #[arg(long)]
    check: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> RunMode {
        if self.check {
            RunMode::Check
        } else if self.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Apply
        }
    }

    fn layout(&self) -> anyhow::Result<LayoutConfig> {
        match &self.config {
            Some(path) => {
                let path = self.root.join(path);
                LayoutConfig::load(&path)
                    .with_context(|| format!("loading layout from {}", path.display()))
            }
            None => Ok(LayoutConfig::default()),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute(cli: &Cli) -> anyhow::Result<bool> {
    let config = cli.layout()?;
    let outcome = ticketseq_vault::run(&cli.root, &config, cli.mode())
        .with_context(|| format!("{} run under {}", config.prefix, cli.root.display()))?;
    print!("{}", report::render(&outcome, cli.format));
    Ok(outcome.passed())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
