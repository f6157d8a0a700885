use assert_fs::prelude::*;
use bumper_fs::{NormalizedPath, io};
use predicates::prelude::*;

#[test]
fn test_write_text_into_nested_child() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.child("chart").child("Chart.yaml");

    io::write_text(&NormalizedPath::new(target.path()), "appVersion: 1.4.0\n").unwrap();

    target.assert(predicate::path::is_file());
    target.assert("appVersion: 1.4.0\n");
}

#[test]
fn test_read_text_opt_distinguishes_missing_from_present() {
    let temp = assert_fs::TempDir::new().unwrap();
    let present = temp.child("VERSION");
    present.write_str("0.9.0\n").unwrap();

    let missing = NormalizedPath::new(temp.child("absent.json").path());
    assert_eq!(io::read_text_opt(&missing).unwrap(), None);
    assert_eq!(
        io::read_text_opt(&NormalizedPath::new(present.path())).unwrap().as_deref(),
        Some("0.9.0\n")
    );
}

#[test]
fn test_overwrite_leaves_only_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.child("package.json");
    target.write_str("{\"version\": \"1.0.0\"}").unwrap();

    io::write_text(&NormalizedPath::new(target.path()), "{\"version\": \"1.0.1\"}").unwrap();

    target.assert(predicate::str::contains("1.0.1").and(predicate::str::contains("1.0.0").not()));
    let entries = std::fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(entries, 1);
}
