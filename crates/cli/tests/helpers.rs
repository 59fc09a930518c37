use std::fs;

use srcaudit::commands::{load_verifier_config, sha256_bytes};
use srcaudit::{canonicalize_or_current, to_percentage_string};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_dot_and_existing_paths() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let dot = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    assert_eq!(dot, tmp.path().canonicalize().expect("canon tmp"));

    let nested = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(nested, subdir.canonicalize().expect("canonicalize subdir"));

    let missing = canonicalize_or_current("not-there").expect("fallback");
    assert!(missing.ends_with("not-there"));
    assert!(missing.is_absolute());

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn sha256_bytes_is_lowercase_hex() {
    assert_eq!(
        sha256_bytes(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(sha256_bytes(b"[]").len(), 64);
}

#[test]
fn percentage_string_has_two_decimals() {
    assert_eq!(to_percentage_string(0.0), "0.00 %");
    assert_eq!(to_percentage_string(0.8), "80.00 %");
    assert_eq!(to_percentage_string(2.0 / 3.0), "66.67 %");
}

#[test]
fn verifier_config_defaults_without_path() {
    let config = load_verifier_config(None).expect("defaults");
    assert_eq!(config.fortify_marker, "__fortify_function");
    assert!(load_verifier_config(Some("nope.toml")).is_err());
}
