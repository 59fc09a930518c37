use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use serde::Serialize;
use srcaudit_core::model::VerificationReport;
use srcaudit_core::records::{parse_records_bytes, render_records_json};
use srcaudit_core::services::{record_pass, Verifier};

use crate::commands::{load_verifier_config, print_failures, sha256_bytes};
use crate::{canonicalize_or_current, to_percentage_string};

#[derive(Debug, Serialize)]
pub struct VerifySnapshot {
    pub source_root: String,
    pub records_file: String,
    pub records_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<i64>,
    pub score: f64,
    pub report: VerificationReport,
}

/// Run a verification pass over a records file.
///
/// - `config`: optional JSON/YAML verifier config (defaults otherwise).
/// - `db`: optional audit database; the pass is recorded when given.
/// - `output`: optional path to write the concluded records back as JSON.
pub fn verify_command(
    root: &str,
    records: &str,
    config: Option<&str>,
    db: Option<&str>,
    output: Option<&str>,
    json: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let records_path = Path::new(records);
    let config = load_verifier_config(config)?;

    let records_body = fs::read(records_path).with_context(|| {
        format!("Failed to read function records at {}", records_path.display())
    })?;
    // Hash and parse the same bytes so the stored hash matches what was verified.
    let records_hash = sha256_bytes(&records_body);
    let mut function_records = parse_records_bytes(records_path, &records_body)?;
    info!("Loaded {} records from {}", function_records.len(), records_path.display());

    let started_at = Utc::now();
    let verifier = Verifier::new(config);
    let report = verifier
        .run(&root_path, &mut function_records)
        .with_context(|| format!("Verification pass failed for {}", root_path.display()))?;

    let run_id = match db {
        Some(db_path) => {
            let audit_db = srcaudit_core::db::open_audit_db(Path::new(db_path))?;
            let id = record_pass(&audit_db, &root_path, &records_hash, &report, started_at)
                .context("Failed to record verification pass")?;
            Some(id)
        }
        None => None,
    };

    if let Some(out) = output {
        let body = render_records_json(&function_records)?;
        fs::write(out, body).with_context(|| format!("Failed to write records to {}", out))?;
    }

    if json {
        let snapshot = VerifySnapshot {
            source_root: root_path.display().to_string(),
            records_file: records_path.display().to_string(),
            records_hash,
            run_id,
            score: report.score(),
            report,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Verification pass");
    println!("=================");
    println!("Source root: {}", root_path.display());
    println!("Records: {}", records_path.display());
    println!("Functions analyzed: {}", report.analyzed);
    println!("Functions verified: {}", report.verified);
    println!("Skipped: {}", report.skipped);
    println!("Verification score: {}", to_percentage_string(report.score()));
    if let Some(id) = run_id {
        println!("Recorded as run: {}", id);
    }
    println!();
    print_failures(&report.failures);

    Ok(())
}
