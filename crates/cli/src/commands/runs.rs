use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use srcaudit_core::db::{open_audit_db, StoredRun};
use srcaudit_core::model::FailedRecord;

use crate::commands::print_failures;
use crate::to_percentage_string;

#[derive(Debug, Serialize)]
pub struct RunDetail {
    #[serde(flatten)]
    pub run: StoredRun,
    pub score: f64,
    pub failures: Vec<FailedRecord>,
}

/// List all recorded verification passes.
pub fn list_runs_command(db: &str, json: bool) -> Result<()> {
    let audit_db = open_audit_db(Path::new(db))?;
    let runs = audit_db.list_runs().context("Failed to list verification runs")?;

    if json {
        let serialized =
            serde_json::to_string_pretty(&runs).context("Failed to serialize runs to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Verification runs ({}):", runs.len());
    if runs.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for stored in runs {
        println!(
            "  - #{} {} verified {}/{} ({}) at {}",
            stored.id,
            stored.run.source_root,
            stored.run.verified,
            stored.run.analyzed,
            to_percentage_string(stored.run.score()),
            stored.run.finished_at
        );
    }
    Ok(())
}

/// Show one recorded pass with its failures; defaults to the latest run.
pub fn show_run_command(db: &str, id: Option<i64>, json: bool) -> Result<()> {
    let audit_db = open_audit_db(Path::new(db))?;
    let run_id = match id {
        Some(id) => id,
        None => audit_db
            .latest_run_id()
            .context("Failed to look up latest run")?
            .ok_or_else(|| anyhow!("No verification runs recorded in {}", db))?,
    };
    let run = audit_db.get_run(run_id).with_context(|| format!("Failed to load run {}", run_id))?;
    let failures = audit_db
        .load_failures(run_id)
        .with_context(|| format!("Failed to load failures for run {}", run_id))?;
    let detail = RunDetail { score: run.run.score(), run, failures };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("Verification run #{}", detail.run.id);
    println!("Source root: {}", detail.run.run.source_root);
    println!("Records hash: {}", detail.run.run.records_hash);
    println!("Started: {}", detail.run.run.started_at);
    println!("Finished: {}", detail.run.run.finished_at);
    println!("Functions analyzed: {}", detail.run.run.analyzed);
    println!("Functions verified: {}", detail.run.run.verified);
    println!("Skipped: {}", detail.run.run.skipped);
    println!("Verification score: {}", to_percentage_string(detail.score));
    println!();
    print_failures(&detail.failures);
    Ok(())
}
