use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::db::{StoredRun, VerificationRunRecord};
use crate::model::FailedRecord;

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for audit database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },

    /// No run with the requested id.
    #[error("No verification run with id {0}")]
    MissingRun(i64),
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed history of verification passes.
///
/// This is a thin wrapper around `rusqlite::Connection` that is responsible for:
/// - Opening/creating the DB file.
/// - Applying schema migrations.
/// - Small helpers for storing and reading passes.
#[derive(Debug)]
pub struct AuditDb {
    conn: Connection,
}

impl AuditDb {
    /// Open (or create) an audit database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, mostly for tests and dry runs.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a run and its failed records in one transaction; returns the run id.
    pub fn insert_run(
        &self,
        record: &VerificationRunRecord,
        failures: &[FailedRecord],
    ) -> DbResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO verification_runs (source_root, records_hash, analyzed, verified, skipped, started_at, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                record.source_root,
                record.records_hash,
                record.analyzed as i64,
                record.verified as i64,
                record.skipped as i64,
                record.started_at,
                record.finished_at
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO verification_failures (run_id, idx, name, declared_path, declared_line, reason)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for (idx, failure) in failures.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    idx as i64,
                    failure.name,
                    failure.declared_path,
                    failure.declared_line as i64,
                    failure.reason
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    /// List all runs (ordered by id).
    pub fn list_runs(&self) -> DbResult<Vec<StoredRun>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, source_root, records_hash, analyzed, verified, skipped, started_at, finished_at
            FROM verification_runs
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], map_run)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Load a single run by id.
    pub fn get_run(&self, run_id: i64) -> DbResult<StoredRun> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, source_root, records_hash, analyzed, verified, skipped, started_at, finished_at
            FROM verification_runs
            WHERE id = ?1
            "#,
        )?;
        let mut rows = stmt.query_map(params![run_id], map_run)?;
        let first = rows.next();
        match first {
            Some(row) => Ok(row?),
            None => Err(DbError::MissingRun(run_id)),
        }
    }

    /// Load the most recent run id, if any pass has been recorded.
    pub fn latest_run_id(&self) -> DbResult<Option<i64>> {
        let mut stmt =
            self.conn.prepare("SELECT id FROM verification_runs ORDER BY id DESC LIMIT 1")?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Failed records of a run, in the order the pass reported them.
    pub fn load_failures(&self, run_id: i64) -> DbResult<Vec<FailedRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, declared_path, declared_line, reason
            FROM verification_failures
            WHERE run_id = ?1
            ORDER BY idx
            "#,
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(FailedRecord {
                name: row.get(0)?,
                declared_path: row.get(1)?,
                declared_line: row.get::<_, i64>(2)? as u32,
                reason: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRun> {
    Ok(StoredRun {
        id: row.get(0)?,
        run: VerificationRunRecord {
            source_root: row.get(1)?,
            records_hash: row.get(2)?,
            analyzed: row.get::<_, i64>(3)? as u64,
            verified: row.get::<_, i64>(4)? as u64,
            skipped: row.get::<_, i64>(5)? as u64,
            started_at: row.get(6)?,
            finished_at: row.get(7)?,
        },
    })
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: verification_runs
/// - 2: verification_failures
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let mut current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS verification_runs (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                source_root  TEXT NOT NULL,
                records_hash TEXT NOT NULL,
                analyzed     INTEGER NOT NULL,
                verified     INTEGER NOT NULL,
                skipped      INTEGER NOT NULL DEFAULT 0,
                started_at   TEXT NOT NULL,
                finished_at  TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS verification_failures (
                run_id        INTEGER NOT NULL,
                idx           INTEGER NOT NULL,
                name          TEXT NOT NULL,
                declared_path TEXT NOT NULL,
                declared_line INTEGER NOT NULL,
                reason        TEXT NOT NULL,
                PRIMARY KEY(run_id, idx)
            );

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
