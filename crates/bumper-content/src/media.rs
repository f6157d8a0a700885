//! Media types a version descriptor can declare

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The format of a file holding a version.
///
/// Configured with a MIME-style string; `application/json` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaType {
    PlainText,
    #[default]
    Json,
    Yaml,
    Xml,
}

impl MediaType {
    /// Every supported media type
    pub const ALL: [MediaType; 4] = [Self::PlainText, Self::Json, Self::Yaml, Self::Xml];

    /// Canonical MIME string
    pub fn mime(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Json => "application/json",
            Self::Yaml => "application/x-yaml",
            Self::Xml => "application/xml",
        }
    }

    /// Human-readable format name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlainText => "plain text",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Xml => "XML",
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text/plain" => Ok(Self::PlainText),
            "application/json" => Ok(Self::Json),
            "application/x-yaml" | "application/yaml" | "text/yaml" | "text/x-yaml" => {
                Ok(Self::Yaml)
            }
            "application/xml" | "text/xml" => Ok(Self::Xml),
            _ => Err(Error::UnsupportedMediaType(s.to_string())),
        }
    }
}

impl TryFrom<String> for MediaType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.mime().to_string()
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_json() {
        assert_eq!(MediaType::default(), MediaType::Json);
    }

    #[test]
    fn test_canonical_round_trip() {
        for media_type in MediaType::ALL {
            assert_eq!(media_type.mime().parse::<MediaType>().unwrap(), media_type);
        }
    }

    #[test]
    fn test_unknown_is_rejected() {
        let err = "application/toml".parse::<MediaType>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(ref t) if t == "application/toml"));
    }

    #[test]
    fn test_serde_uses_mime_strings() {
        let parsed: MediaType = serde_json::from_str("\"text/xml\"").unwrap();
        assert_eq!(parsed, MediaType::Xml);
        assert_eq!(
            serde_json::to_string(&MediaType::Yaml).unwrap(),
            "\"application/x-yaml\""
        );
        assert!(serde_json::from_str::<MediaType>("\"image/png\"").is_err());
    }
}
