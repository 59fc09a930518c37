use std::fs;
use std::path::Path;

use predicates::prelude::*;
use tempfile::tempdir;

const HELLO_C: &str = "#include <stdio.h>\n\nint main(void)\n{\n    return 0;\n}\n";

fn write_tree(root: &Path) {
    fs::write(root.join("hello.c"), HELLO_C).expect("hello.c");
    fs::write(root.join("hello.h"), "__fortify_function int\nhello (void)\n{\n}\n")
        .expect("hello.h");
    fs::write(root.join("foo.h"), "int foo();\n").expect("foo.h");
}

fn write_records(path: &Path) {
    let body = r#"[
  {"name": "main", "declared_path": "hello.c", "declared_line": 3},
  {"name": "hello", "declared_path": "hello.h", "declared_line": 2},
  {"name": "rlp_main", "declared_path": "hello.c", "declared_line": 3},
  {"name": "foo", "declared_path": "foo.h", "declared_line": 1},
  {"name": "printf", "declared_path": "/usr/include/stdio.h", "declared_line": 332}
]"#;
    fs::write(path, body).expect("records");
}

#[test]
fn verify_prints_summary_and_failures() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path().join("src");
    fs::create_dir_all(&root).unwrap();
    write_tree(&root);
    let records = dir.path().join("records.json");
    write_records(&records);

    assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(&root)
        .arg("--records")
        .arg(&records)
        .assert()
        .success()
        .stdout(predicate::str::contains("Functions analyzed: 4"))
        .stdout(predicate::str::contains("Functions verified: 3"))
        .stdout(predicate::str::contains("Skipped: 1"))
        .stdout(predicate::str::contains("Verification score: 75.00 %"))
        .stdout(predicate::str::contains("Failures (1):"))
        .stdout(predicate::str::contains("foo [line 1] foo.h -- no definition found"));
}

#[test]
fn verify_json_reports_outcomes() {
    let dir = tempdir().expect("tempdir");
    write_tree(dir.path());
    let records = dir.path().join("records.json");
    write_records(&records);

    let output = assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(dir.path())
        .arg("--records")
        .arg(&records)
        .arg("--json")
        .output()
        .expect("run verify");
    assert!(output.status.success());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("verify --json should emit JSON");
    assert_eq!(snapshot["report"]["analyzed"], 4);
    assert_eq!(snapshot["report"]["verified"], 3);
    assert_eq!(snapshot["report"]["outcomes"][2]["strategy"], "prefix_strip");
    assert_eq!(snapshot["report"]["outcomes"][2]["resolved_alias"], "main");
    let expected_hash = srcaudit::commands::sha256_bytes(&fs::read(&records).unwrap());
    assert_eq!(snapshot["records_hash"], expected_hash.as_str());
    assert!(snapshot.get("run_id").is_none());
}

#[test]
fn verify_writes_concluded_records() {
    let dir = tempdir().expect("tempdir");
    write_tree(dir.path());
    let records = dir.path().join("records.yaml");
    fs::write(
        &records,
        "records:\n  - name: main\n    declared_path: hello.c\n    declared_line: 3\n  - name: foo\n    declared_path: foo.h\n",
    )
    .unwrap();
    let out = dir.path().join("concluded.json");

    assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(dir.path())
        .arg("--records")
        .arg(&records)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let concluded: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("output written")).unwrap();
    assert_eq!(concluded[0]["verdict"], "verified");
    assert_eq!(concluded[1]["verdict"], "failed");
    assert_eq!(concluded[1]["reason"], "no definition found");
}

#[test]
fn verify_fails_for_missing_root() {
    let dir = tempdir().expect("tempdir");
    let records = dir.path().join("records.json");
    write_records(&records);

    assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(dir.path().join("absent"))
        .arg("--records")
        .arg(&records)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source root not found"));
}

#[test]
fn verify_fails_for_unreadable_records() {
    let dir = tempdir().expect("tempdir");

    assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(dir.path())
        .arg("--records")
        .arg(dir.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read function records"));
}

#[test]
fn verify_uses_config_file() {
    let dir = tempdir().expect("tempdir");
    write_tree(dir.path());
    let records = dir.path().join("records.json");
    write_records(&records);
    let config = dir.path().join("verifier.yaml");
    fs::write(&config, "strip_prefixes: []\n").unwrap();

    assert_cmd::cargo::cargo_bin_cmd!("srcaudit")
        .arg("verify")
        .arg("--root")
        .arg(dir.path())
        .arg("--records")
        .arg(&records)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Functions verified: 2"))
        .stdout(predicate::str::contains("rlp_main [line 3] hello.c -- no alias found"));
}
