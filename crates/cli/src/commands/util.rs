use std::path::Path;

use anyhow::Result;
use sha2::Digest;
use srcaudit_core::config::{load_config, VerifierConfig};
use srcaudit_core::model::FailedRecord;

/// Load the verifier config from `path`, or use the built-in defaults.
pub fn load_verifier_config(path: Option<&str>) -> Result<VerifierConfig> {
    match path {
        Some(p) => load_config(Path::new(p)),
        None => Ok(VerifierConfig::default()),
    }
}

pub fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Print failed records as `name [line] path -- reason`.
pub fn print_failures(failures: &[FailedRecord]) {
    println!("Failures ({}):", failures.len());
    if failures.is_empty() {
        println!("  (none)");
        return;
    }
    for failure in failures {
        println!(
            "  - {} [line {}] {} -- {}",
            failure.name, failure.declared_line, failure.declared_path, failure.reason
        );
    }
}
