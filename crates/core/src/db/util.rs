use std::path::Path;

use anyhow::{Context, Result};

use crate::db::AuditDb;

/// Open (or create) the audit database, ensuring its parent directory exists.
pub fn open_audit_db(path: &Path) -> Result<AuditDb> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }
    let db = AuditDb::open(path)
        .with_context(|| format!("Failed to open audit database at {}", path.display()))?;
    Ok(db)
}
