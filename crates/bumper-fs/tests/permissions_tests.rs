#![cfg(unix)]

use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};

use bumper_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn mode(path: &std::path::Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[rstest]
#[case(0o644)]
#[case(0o640)]
#[case(0o755)]
fn test_overwrite_keeps_existing_mode(#[case] original: u32) {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");
    fs::write(&file_path, "{\"version\": \"1.0.0\"}").unwrap();
    fs::set_permissions(&file_path, fs::Permissions::from_mode(original)).unwrap();

    io::write_text(&NormalizedPath::new(&file_path), "{\"version\": \"2.0.0\"}").unwrap();

    assert_eq!(mode(&file_path), original);
}

#[test]
fn test_new_file_gets_default_create_mode() {
    let temp = TempDir::new().unwrap();
    let reference = temp.path().join("reference.json");
    fs::write(&reference, "{}").unwrap();

    let created = temp.path().join("new.json");
    io::write_text(&NormalizedPath::new(&created), "{}\n").unwrap();

    assert_eq!(mode(&created), mode(&reference));
}

#[test]
fn test_symlinked_target_is_written_through() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real.txt");
    let link = temp.path().join("VERSION");
    fs::write(&real, "1.0.0\n").unwrap();
    symlink(&real, &link).unwrap();

    io::write_text(&NormalizedPath::new(&link), "2.0.0").unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&real).unwrap(), "2.0.0");
    assert_eq!(fs::read_to_string(&link).unwrap(), "2.0.0");
}

#[test]
fn test_relative_symlink_into_subdirectory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("shared")).unwrap();
    let real = temp.path().join("shared/manifest.json");
    fs::write(&real, "{}").unwrap();
    symlink("shared/manifest.json", temp.path().join("manifest.json")).unwrap();

    io::write_text(&NormalizedPath::new(temp.path().join("manifest.json")), "{\"v\": 1}").unwrap();

    assert_eq!(fs::read_to_string(&real).unwrap(), "{\"v\": 1}");
    let names: Vec<_> = fs::read_dir(temp.path().join("shared"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["manifest.json".to_string()]);
}
