//! `catalogue sync` — reconcile remote catalogue/ADES state with local
//! record files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use catalogue_core::{Batch, RecordId, Settings};
use catalogue_sync::{
    pipeline, Outcome, OutcomeStatus, RunOptions, RunReport, Stage, UreqTransport,
};

/// Arguments for `catalogue sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Catalogue JSON record files to register or update.
    #[arg(long, num_args = 0.., value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Record IDs to delete (files removed from the catalogue).
    #[arg(long = "deleted-ids", num_args = 0.., value_name = "ID")]
    pub deleted_ids: Vec<RecordId>,

    /// Skip ADES process registration.
    #[arg(long)]
    pub skip_ades: bool,

    /// Skip access-policy publishing.
    #[arg(long)]
    pub skip_publish: bool,

    /// Emit the run report as machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let batch = Batch::from_paths(&self.files, self.deleted_ids);
        if batch.is_empty() {
            println!("Nothing to do.");
            return Ok(());
        }

        let settings = Settings::from_env().context("incomplete EODH configuration")?;
        let transport = UreqTransport::new();
        let options = RunOptions {
            skip_ades: self.skip_ades,
            skip_publish: self.skip_publish,
        };

        let report = pipeline::run(&transport, &settings, &batch, options)
            .context("synchronization aborted")?;

        if self.json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        let failures = report.failures().count();
        if failures > 0 {
            bail!("{failures} item(s) failed");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct StageSummaryRow {
    #[tabled(rename = "stage")]
    stage: &'static str,
    #[tabled(rename = "ok")]
    succeeded: usize,
    #[tabled(rename = "failed")]
    failed: usize,
    #[tabled(rename = "skipped")]
    skipped: usize,
}

#[derive(Serialize)]
struct RunReportJson<'a> {
    success: bool,
    started_at: String,
    finished_at: String,
    degraded: Option<&'a str>,
    outcomes: &'a [Outcome],
}

fn print_report(report: &RunReport) {
    if let Some(reason) = &report.degraded {
        println!("{} {reason}", "!".yellow().bold());
    }

    for outcome in &report.outcomes {
        let glyph = match outcome.status {
            OutcomeStatus::Succeeded => "OK".green().bold(),
            OutcomeStatus::Failed => "FAIL".red().bold(),
            OutcomeStatus::Skipped => "SKIP".yellow(),
        };
        println!(
            "  {glyph} [{}] {}: {}",
            outcome.stage, outcome.key, outcome.message
        );
    }

    println!("{}", summary_table(report));

    let failed: Vec<&Outcome> = report.failures().collect();
    if failed.is_empty() {
        println!(
            "{} all {} item(s) completed successfully",
            "✓".green().bold(),
            report.outcomes.len()
        );
        return;
    }

    println!("{} {} error(s):", "✗".red().bold(), failed.len());
    for outcome in failed {
        println!("  - {}:{}", outcome.stage, outcome.key);
    }
}

fn summary_table(report: &RunReport) -> String {
    let mut rows = Vec::new();
    for stage in [
        Stage::Register,
        Stage::Delete,
        Stage::Ades,
        Stage::PublishPolicy,
        Stage::PublishHarvest,
    ] {
        let of_stage: Vec<&Outcome> = report
            .outcomes
            .iter()
            .filter(|outcome| outcome.stage == stage)
            .collect();
        if of_stage.is_empty() {
            continue;
        }
        let count = |status: OutcomeStatus| of_stage.iter().filter(|o| o.status == status).count();
        rows.push(StageSummaryRow {
            stage: stage.as_str(),
            succeeded: count(OutcomeStatus::Succeeded),
            failed: count(OutcomeStatus::Failed),
            skipped: count(OutcomeStatus::Skipped),
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

fn print_json(report: &RunReport) -> Result<()> {
    let payload = RunReportJson {
        success: report.success(),
        started_at: report.started_at.to_rfc3339(),
        finished_at: report.finished_at.to_rfc3339(),
        degraded: report.degraded.as_deref(),
        outcomes: &report.outcomes,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize run report")?
    );
    Ok(())
}
