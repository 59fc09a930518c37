use anyhow::{anyhow, Result};
use srcaudit_core::model::{FunctionRecord, Verdict};
use srcaudit_core::services::Verifier;

use crate::canonicalize_or_current;
use crate::commands::load_verifier_config;

/// Verify a single ad-hoc record and print the outcome.
pub fn check_command(
    root: &str,
    name: &str,
    path: &str,
    line: u32,
    config: Option<&str>,
    json: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    if !root_path.is_dir() {
        return Err(anyhow!("Source root does not exist: {}", root_path.display()));
    }
    let verifier = Verifier::new(load_verifier_config(config)?);
    let record = FunctionRecord::new(name, path, line);
    let outcome = verifier.verify(&root_path, &record);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.skipped {
        println!("{}: skipped (excluded system root: {})", name, path);
        return Ok(());
    }

    let concrete = outcome
        .concrete_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    match outcome.verdict {
        Verdict::Verified => {
            let strategy = outcome.strategy.map(|s| s.as_str()).unwrap_or("-");
            match &outcome.resolved_alias {
                Some(alias) => {
                    println!("{}: verified ({} as {}) in {}", name, strategy, alias, concrete)
                }
                None => println!("{}: verified ({}) in {}", name, strategy, concrete),
            }
        }
        _ => {
            let reason = outcome.reason.map(|r| r.as_str()).unwrap_or("-");
            println!("{}: failed ({}) in {}", name, reason, concrete);
        }
    }

    Ok(())
}
