use serde::{Deserialize, Serialize};

/// Summary of one verification pass, as stored in the audit database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationRunRecord {
    /// Source root the pass verified against.
    pub source_root: String,
    /// SHA-256 of the records input, so repeated passes over the same input can be grouped.
    pub records_hash: String,
    pub analyzed: u64,
    pub verified: u64,
    pub skipped: u64,
    pub started_at: String,
    pub finished_at: String,
}

impl VerificationRunRecord {
    /// Fraction of analyzed records that verified.
    pub fn score(&self) -> f64 {
        if self.analyzed == 0 {
            0.0
        } else {
            self.verified as f64 / self.analyzed as f64
        }
    }
}

/// A run record together with its row id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRun {
    pub id: i64,
    #[serde(flatten)]
    pub run: VerificationRunRecord,
}
