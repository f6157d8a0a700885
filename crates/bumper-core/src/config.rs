//! Bumper options and file descriptors
//!
//! Options come from the host release tool, either as an already-parsed
//! value or from a JSON, YAML or TOML file. Each descriptor is a bare file
//! name or a `{file, type, path}` table; missing `type` means JSON and
//! missing `path` means `version`.

use std::fmt;
use std::path::Path;

use bumper_content::{MediaType, PathExpression};
use bumper_fs::{NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A resolved file to read a version from or write one into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub location: NormalizedPath,
    pub media_type: MediaType,
    pub path: PathExpression,
}

impl Descriptor {
    pub fn new(
        location: impl Into<NormalizedPath>,
        media_type: MediaType,
        path: PathExpression,
    ) -> Self {
        Self {
            location: location.into(),
            media_type,
            path,
        }
    }

    /// A JSON file with the version at `version`.
    pub fn json(location: impl Into<NormalizedPath>) -> Self {
        Self::new(location, MediaType::Json, PathExpression::default())
    }

    /// Resolve a relative location against `root`.
    ///
    /// Absolute locations are returned unchanged.
    pub fn rooted(&self, root: &NormalizedPath) -> Self {
        if self.location.to_native().is_absolute() {
            return self.clone();
        }
        Self {
            location: root.join(self.location.as_str()),
            ..self.clone()
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} at {})", self.location, self.media_type, self.path)
    }
}

/// A descriptor as written in the options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorSpec {
    /// Shorthand for a JSON file with the version at `version`
    File(String),
    Detailed(DetailedDescriptor),
}

/// Long form of a descriptor; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl DescriptorSpec {
    /// Resolve defaults and validate the media type and path.
    ///
    /// Returns `None` when no file is named.
    pub fn resolve(&self) -> Result<Option<Descriptor>> {
        let detailed = match self {
            Self::File(file) => {
                return Ok(Some(Descriptor::json(file.as_str())));
            }
            Self::Detailed(detailed) => detailed,
        };

        let Some(file) = detailed.file.as_deref() else {
            return Ok(None);
        };

        let media_type = match detailed.media_type.as_deref() {
            Some(raw) => raw.parse::<MediaType>().map_err(Error::InvalidDescriptor)?,
            None => MediaType::default(),
        };
        let path = match detailed.path.as_deref() {
            Some(raw) => PathExpression::parse(raw).map_err(Error::InvalidDescriptor)?,
            None => PathExpression::default(),
        };

        Ok(Some(Descriptor::new(file, media_type, path)))
    }
}

impl From<&str> for DescriptorSpec {
    fn from(file: &str) -> Self {
        Self::File(file.to_string())
    }
}

/// A single value or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Options handed to the bumper by the host release tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BumperOptions {
    /// Where the current version is read from
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub input: Option<DescriptorSpec>,

    /// Where a new version is written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<OneOrMany<DescriptorSpec>>,
}

impl BumperOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version source.
    pub fn with_input(mut self, input: impl Into<DescriptorSpec>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Add a version target.
    pub fn with_output(mut self, output: impl Into<DescriptorSpec>) -> Self {
        let mut targets = match self.out.take() {
            Some(OneOrMany::One(item)) => vec![item],
            Some(OneOrMany::Many(items)) => items,
            None => Vec::new(),
        };
        targets.push(output.into());
        self.out = Some(OneOrMany::Many(targets));
        self
    }

    /// Build options from a value the host has already parsed.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::ConfigParse {
            path: Path::new("<options>").to_path_buf(),
            format: "JSON".into(),
            message: e.to_string(),
        })
    }

    /// Load options from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedConfigFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// The resolved version source, if one is configured.
    pub fn source(&self) -> Result<Option<Descriptor>> {
        match &self.input {
            Some(spec) => spec.resolve(),
            None => Ok(None),
        }
    }

    /// Every resolved version target, in configuration order.
    ///
    /// A target without a file is an error; nothing can be written for it.
    pub fn targets(&self) -> Result<Vec<Descriptor>> {
        let Some(out) = &self.out else {
            return Ok(Vec::new());
        };

        out.as_slice()
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.resolve()?.ok_or(Error::MissingLocation { index }))
            .collect()
    }
}
