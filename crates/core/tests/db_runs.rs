use rusqlite::Connection;
use tempfile::tempdir;

use srcaudit_core::db::{open_audit_db, AuditDb, VerificationRunRecord, CURRENT_SCHEMA_VERSION};
use srcaudit_core::model::FailedRecord;

fn sample_run(root: &str, analyzed: u64, verified: u64) -> VerificationRunRecord {
    VerificationRunRecord {
        source_root: root.into(),
        records_hash: "hash".into(),
        analyzed,
        verified,
        skipped: 1,
        started_at: "t0".into(),
        finished_at: "t1".into(),
    }
}

fn failure(name: &str, reason: &str) -> FailedRecord {
    FailedRecord {
        name: name.into(),
        declared_line: 7,
        declared_path: format!("{name}.h"),
        reason: reason.into(),
    }
}

#[test]
fn runs_insert_and_list_round_trip() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("audit.db");
    let db = AuditDb::open(&db_path).expect("open db");

    let first = db.insert_run(&sample_run("/src/a", 4, 3), &[]).expect("insert first");
    let second = db
        .insert_run(
            &sample_run("/src/b", 2, 0),
            &[failure("foo", "no definition found"), failure("bar", "no alias found")],
        )
        .expect("insert second");
    assert!(second > first);

    let runs = db.list_runs().expect("list runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, first);
    assert_eq!(runs[0].run, sample_run("/src/a", 4, 3));
    assert!((runs[0].run.score() - 0.75).abs() < f64::EPSILON);
    assert_eq!(runs[1].run.source_root, "/src/b");
    assert_eq!(runs[1].run.score(), 0.0);

    assert_eq!(db.latest_run_id().expect("latest"), Some(second));
    assert_eq!(db.get_run(first).expect("get first").run.verified, 3);

    let failures = db.load_failures(second).expect("load failures");
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0], failure("foo", "no definition found"));
    assert_eq!(failures[1].name, "bar");
    assert!(db.load_failures(first).expect("no failures").is_empty());
}

#[test]
fn runs_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("audit.db");

    let id = {
        let db = open_audit_db(&db_path).expect("open with parent creation");
        db.insert_run(&sample_run("/src", 1, 1), &[]).expect("insert")
    };

    let reopened = AuditDb::open(&db_path).expect("reopen");
    let stored = reopened.get_run(id).expect("stored run");
    assert_eq!(stored.run.source_root, "/src");

    let version: i32 = reopened
        .connection()
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version");
    assert_eq!(version, CURRENT_SCHEMA_VERSION);
}

#[test]
fn empty_database_has_no_latest_run() {
    let db = AuditDb::open_in_memory().expect("in-memory db");
    assert!(db.list_runs().expect("list").is_empty());
    assert_eq!(db.latest_run_id().expect("latest"), None);
}

#[test]
fn version_one_database_is_migrated() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("audit.db");

    // A database that only has the runs table, as written by schema version 1.
    {
        let conn = Connection::open(&db_path).expect("raw sqlite");
        conn.execute_batch(
            r#"
            CREATE TABLE verification_runs (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                source_root  TEXT NOT NULL,
                records_hash TEXT NOT NULL,
                analyzed     INTEGER NOT NULL,
                verified     INTEGER NOT NULL,
                skipped      INTEGER NOT NULL DEFAULT 0,
                started_at   TEXT NOT NULL,
                finished_at  TEXT NOT NULL
            );
            INSERT INTO verification_runs (source_root, records_hash, analyzed, verified, started_at, finished_at)
            VALUES ('/old', 'h', 2, 2, 't0', 't1');
            PRAGMA user_version = 1;
            "#,
        )
        .expect("seed v1 schema");
    }

    let db = AuditDb::open(&db_path).expect("migrate");
    let runs = db.list_runs().expect("list");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run.source_root, "/old");
    assert_eq!(runs[0].run.skipped, 0);

    let id = db.insert_run(&sample_run("/new", 1, 0), &[failure("foo", "x")]).expect("insert");
    assert_eq!(db.load_failures(id).expect("failures").len(), 1);
}
