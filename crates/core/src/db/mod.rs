//! Audit database: history of verification passes.
//!
//! Each pass stores its totals plus the failed records (original name, line,
//! path and reason) so external reporting can consume them later. The
//! function metadata itself is not stored here; records come from whatever
//! extracted them.

pub mod audit_db;
pub mod models;
pub mod util;

pub use audit_db::{AuditDb, DbError, DbResult, CURRENT_SCHEMA_VERSION};
pub use models::{StoredRun, VerificationRunRecord};
pub use util::open_audit_db;
