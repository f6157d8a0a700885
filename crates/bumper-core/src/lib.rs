//! Version bumper hooks for release tooling
//!
//! A host release tool drives two hooks: read the current version from one
//! configured file, and write a new version into every configured target.
//! Targets are JSON, YAML, XML or plain text files; the value is addressed
//! by a path expression and the file's indentation is kept.
//!
//! ```no_run
//! use bumper_core::{Bumper, BumperOptions, ReleaseHooks};
//! use serde_json::json;
//!
//! # async fn run() -> bumper_core::Result<()> {
//! let options = BumperOptions::from_value(json!({
//!     "in": "package.json",
//!     "out": [
//!         "package.json",
//!         {"file": "VERSION", "type": "text/plain"},
//!         {"file": "pom.xml", "type": "application/xml", "path": "project.version"}
//!     ]
//! }))?;
//! let bumper = Bumper::new(options);
//!
//! let current = bumper.latest_version().await?;
//! bumper.bump("2.0.0").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod reader;
pub mod writer;

pub use config::{BumperOptions, Descriptor, DescriptorSpec, DetailedDescriptor, OneOrMany};
pub use error::{Error, Result, TargetFailure};
pub use plugin::{Bumper, ReleaseHooks};
pub use reader::DocumentReader;
pub use writer::{DocumentWriter, WriteReport};

pub use bumper_content::{MediaType, PathExpression};
