//! Sample files used across test suites.

use crate::TestProject;

/// JSON manifest with a top-level version.
pub const BOWER_JSON: &str = "{\"version\":\"1.0.0\"}";

/// Plain text version file with a trailing newline.
pub const VERSION_TXT: &str = "2.0.0\n";

/// JSON manifest with no version yet.
pub const EMPTY_MANIFEST_JSON: &str = "{}";

/// YAML parameters with a top-level version.
pub const PARAMETERS_YML: &str = "version: 3.0.0\n";

/// YAML indented by ten spaces, with a dotted key.
pub const APP_YML: &str = "content:\n          app.version: 3.0.3\n";

/// Maven project file indented by four spaces.
pub const POM_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project>
    <modelVersion>4.0.0</modelVersion>
    <groupId>com.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0.0</version>
</project>
"#;

/// Write the standard set of release fixtures into `project`.
///
/// | file             | content                              |
/// |------------------|--------------------------------------|
/// | `bower.json`     | [`BOWER_JSON`]                       |
/// | `foo.txt`        | [`VERSION_TXT`]                      |
/// | `manifest.json`  | [`EMPTY_MANIFEST_JSON`]              |
/// | `parameters.yml` | [`PARAMETERS_YML`]                   |
/// | `app.yml`        | [`APP_YML`]                          |
/// | `pom.xml`        | [`POM_XML`]                          |
pub fn seed_release_files(project: &TestProject) {
    project.write("bower.json", BOWER_JSON);
    project.write("foo.txt", VERSION_TXT);
    project.write("manifest.json", EMPTY_MANIFEST_JSON);
    project.write("parameters.yml", PARAMETERS_YML);
    project.write("app.yml", APP_YML);
    project.write("pom.xml", POM_XML);
}
