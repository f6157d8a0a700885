//! End-to-end tests for the release hooks

use bumper_core::{Bumper, BumperOptions, Error, ReleaseHooks};
use bumper_test_utils::TestProject;
use bumper_test_utils::fixtures::{self, seed_release_files};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn bumper(project: &TestProject, options: Value) -> Bumper {
    let options = BumperOptions::from_value(options).unwrap();
    Bumper::new(options).with_root(project.root())
}

fn seeded() -> TestProject {
    let project = TestProject::new();
    seed_release_files(&project);
    project
}

#[tokio::test]
async fn test_empty_options_do_not_fail() {
    let project = seeded();
    let bumper = bumper(&project, json!({}));

    assert_eq!(bumper.latest_version().await.unwrap(), None);
    bumper.bump("9.9.9").await.unwrap();
    assert_eq!(project.read("manifest.json"), fixtures::EMPTY_MANIFEST_JSON);
}

#[rstest]
#[case::json(json!("bower.json"), "1.0.0")]
#[case::plain_text(json!({"file": "foo.txt", "type": "text/plain"}), "2.0.0")]
#[case::yaml(json!({"file": "parameters.yml", "type": "application/x-yaml"}), "3.0.0")]
#[case::yaml_dotted_key(
    json!({"file": "app.yml", "type": "text/yaml", "path": "content['app.version']"}),
    "3.0.3"
)]
#[case::xml(
    json!({"file": "pom.xml", "type": "application/xml", "path": "project.version"}),
    "1.0.0"
)]
#[tokio::test]
async fn test_latest_version(#[case] input: Value, #[case] expected: &str) {
    let project = seeded();
    let bumper = bumper(&project, json!({ "in": input }));

    let version = bumper.latest_version().await.unwrap();
    assert_eq!(version.as_deref(), Some(expected));
}

#[tokio::test]
async fn test_latest_version_from_missing_file_fails() {
    let project = TestProject::new();
    let bumper = bumper(&project, json!({"in": "package.json"}));

    let err = bumper.latest_version().await.unwrap_err();
    assert!(matches!(err, Error::Fs(_)));
}

#[tokio::test]
async fn test_write_indented_json() {
    let project = seeded();
    bumper(&project, json!({"out": "manifest.json"}))
        .bump("1.2.3")
        .await
        .unwrap();

    assert_eq!(project.read("manifest.json"), "{\n  \"version\": \"1.2.3\"\n}\n");
}

#[tokio::test]
async fn test_write_keeps_ten_space_yaml_indent() {
    let project = seeded();
    let options = json!({"out": [{
        "file": "app.yml",
        "type": "application/x-yaml",
        "path": "content['app.version']"
    }]});
    bumper(&project, options).bump("2.4.5").await.unwrap();

    assert_eq!(project.read("app.yml"), "content:\n          app.version: 2.4.5\n");
}

#[tokio::test]
async fn test_write_new_json_file() {
    let project = TestProject::new();
    bumper(&project, json!({"out": ["null.json"]}))
        .bump("0.0.0")
        .await
        .unwrap();

    assert_eq!(project.read_trimmed("null.json"), "{\n  \"version\": \"0.0.0\"\n}");
}

#[tokio::test]
async fn test_write_new_yaml_file() {
    let project = TestProject::new();
    let options = json!({"out": [{"file": "new.yml", "type": "application/x-yaml"}]});
    bumper(&project, options).bump("0.0.0").await.unwrap();

    assert_eq!(project.read("new.yml"), "version: 0.0.0\n");
}

#[tokio::test]
async fn test_write_version_at_nested_path() {
    let project = TestProject::new();
    let options = json!({"out": {"file": "deep.json", "path": "deep.sub.version"}});
    bumper(&project, options).bump("1.2.3").await.unwrap();

    let written: Value = serde_json::from_str(&project.read("deep.json")).unwrap();
    assert_eq!(written, json!({"deep": {"sub": {"version": "1.2.3"}}}));
    project.assert_file_contains("deep.json", "\n  \"deep\": {\n    \"sub\": {\n");
}

#[tokio::test]
async fn test_write_plain_text_file() {
    let project = TestProject::new();
    let options = json!({"out": [{"file": "VERSION", "type": "text/plain"}]});
    bumper(&project, options).bump("3.2.1").await.unwrap();

    assert_eq!(project.read("VERSION"), "3.2.1");
}

#[tokio::test]
async fn test_write_xml_keeps_four_space_indent() {
    let project = seeded();
    let options =
        json!({"out": {"file": "pom.xml", "type": "application/xml", "path": "project.version"}});
    bumper(&project, options).bump("1.1.0").await.unwrap();

    assert_eq!(
        project.read_trimmed("pom.xml"),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<project>\n    \
         <modelVersion>4.0.0</modelVersion>\n    <groupId>com.example</groupId>\n    \
         <artifactId>app</artifactId>\n    <version>1.1.0</version>\n</project>"
    );
}

#[tokio::test]
async fn test_bump_writes_every_target() {
    let project = seeded();
    let options = json!({
        "in": "bower.json",
        "out": [
            "bower.json",
            {"file": "foo.txt", "type": "text/plain"},
            {"file": "parameters.yml", "type": "application/yaml"},
            {"file": "pom.xml", "type": "text/xml", "path": "project.version"},
            {"file": "nested/dir/extra.json", "path": "meta.version"}
        ]
    });
    let bumper = bumper(&project, options);

    let report = bumper.write_all("4.0.0").await.unwrap();
    assert_eq!(report.written.len(), 5);
    assert!(report.written[0].as_str().ends_with("bower.json"));
    assert!(report.written[4].as_str().ends_with("nested/dir/extra.json"));

    assert_eq!(bumper.latest_version().await.unwrap().as_deref(), Some("4.0.0"));
    assert_eq!(project.read("foo.txt"), "4.0.0");
    assert_eq!(project.read("parameters.yml"), "version: 4.0.0\n");
    project.assert_file_contains("pom.xml", "<version>4.0.0</version>");
    project.assert_file_contains("nested/dir/extra.json", "\"version\": \"4.0.0\"");
}

#[tokio::test]
async fn test_invalid_descriptor_fails_before_any_write() {
    let project = seeded();
    let options = json!({
        "out": [
            "manifest.json",
            {"file": "settings.ini", "type": "text/x-ini"}
        ]
    });

    let err = bumper(&project, options).bump("5.0.0").await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidDescriptor(bumper_content::Error::UnsupportedMediaType(_))
    ));
    assert_eq!(project.read("manifest.json"), fixtures::EMPTY_MANIFEST_JSON);
    project.assert_file_not_exists("settings.ini");
}

#[tokio::test]
async fn test_one_failing_target_does_not_stop_the_others() {
    let project = seeded();
    project.write("broken.yml", "key: [unclosed\n");
    let options = json!({
        "out": [
            {"file": "broken.yml", "type": "application/x-yaml"},
            "manifest.json"
        ]
    });

    let err = bumper(&project, options).bump("6.0.0").await.unwrap_err();
    match &err {
        Error::TargetsFailed { failures, total } => {
            assert_eq!(*total, 2);
            assert_eq!(failures.len(), 1);
            assert!(matches!(
                failures[0].error.content_error(),
                Some(bumper_content::Error::ParseError { .. })
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("1 of 2 version targets failed"));
    project.assert_file_contains("manifest.json", "\"version\": \"6.0.0\"");
    assert_eq!(project.read("broken.yml"), "key: [unclosed\n");
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let project = seeded();
    bumper(&project, json!({"out": ["manifest.json", "bower.json"]}))
        .bump("7.0.0")
        .await
        .unwrap();

    assert_eq!(
        project.file_names(),
        vec!["app.yml", "bower.json", "foo.txt", "manifest.json", "parameters.yml", "pom.xml"]
    );
}

#[tokio::test]
async fn test_write_helm_chart_keeps_other_fields() {
    let project = TestProject::new();
    let chart = "apiVersion: v2\nname: app\nversion: 0.1.0\nappVersion: \"1.16.0\"\n\
                 kubeVersion: \">=1.22\"\npython: 3.10\n";
    project.write("Chart.yaml", chart);
    let options =
        json!({"out": {"file": "Chart.yaml", "type": "application/yaml", "path": "appVersion"}});
    bumper(&project, options).bump("1.17.0").await.unwrap();

    assert_eq!(project.read("Chart.yaml"), chart.replace("1.16.0", "1.17.0"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_write_keeps_file_mode_and_symlink() {
    use std::os::unix::fs::{PermissionsExt, symlink};

    let project = seeded();
    let real = project.root().join("foo.txt");
    let link = project.root().join("VERSION");
    std::fs::set_permissions(&real, std::fs::Permissions::from_mode(0o644)).unwrap();
    symlink(&real, &link).unwrap();

    let options = json!({"out": {"file": "VERSION", "type": "text/plain"}});
    bumper(&project, options).bump("5.0.0").await.unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(project.read("foo.txt"), "5.0.0");
    let mode = std::fs::metadata(&real).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
