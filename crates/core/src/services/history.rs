use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;

use crate::db::{AuditDb, DbResult, VerificationRunRecord};
use crate::model::VerificationReport;

/// Build the stored summary of a finished pass.
pub fn run_record(
    source_root: &Path,
    records_hash: &str,
    report: &VerificationReport,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> VerificationRunRecord {
    VerificationRunRecord {
        source_root: source_root.display().to_string(),
        records_hash: records_hash.to_string(),
        analyzed: report.analyzed as u64,
        verified: report.verified as u64,
        skipped: report.skipped as u64,
        started_at: started_at.to_rfc3339(),
        finished_at: finished_at.to_rfc3339(),
    }
}

/// Persist a finished pass (totals plus failures) and return its run id.
///
/// `finished_at` is taken at the time of the call.
pub fn record_pass(
    db: &AuditDb,
    source_root: &Path,
    records_hash: &str,
    report: &VerificationReport,
    started_at: DateTime<Utc>,
) -> DbResult<i64> {
    let record = run_record(source_root, records_hash, report, started_at, Utc::now());
    let run_id = db.insert_run(&record, &report.failures)?;
    info!("Recorded pass {} ({} failures)", run_id, report.failures.len());
    Ok(run_id)
}
