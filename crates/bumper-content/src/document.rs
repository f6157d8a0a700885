//! Unified Document type

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::handlers::{
    FormatHandler, JsonHandler, PlainTextHandler, SourceScalars, XmlHandler, YamlHandler,
};
use crate::indent::StyleInfo;
use crate::media::MediaType;
use crate::path::{ArrayMode, PathExpression, Tree};

/// Line terminator appended after rendered XML
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// A parsed document, one variant per supported media type
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// The whole (trimmed) file content
    PlainText(String),
    Json(JsonValue),
    /// The tree plus the original spelling of its scalars
    Yaml(YamlValue, SourceScalars),
    /// Element tree in the `$`/`_` convention described in the XML handler
    Xml(JsonValue),
}

impl Document {
    /// Parse `source` as `media_type`.
    ///
    /// Content that does not match the declared media type is a
    /// `ParseError`; nothing is coerced.
    pub fn parse(media_type: MediaType, source: &str) -> Result<Self> {
        Ok(match media_type {
            MediaType::PlainText => Self::PlainText(PlainTextHandler.parse(source)?),
            MediaType::Json => Self::Json(JsonHandler.parse(source)?),
            MediaType::Yaml => Self::Yaml(YamlHandler.parse(source)?, SourceScalars::scan(source)),
            MediaType::Xml => Self::Xml(XmlHandler.parse(source)?),
        })
    }

    /// The document a missing target file stands for.
    pub fn empty(media_type: MediaType) -> Self {
        match media_type {
            MediaType::PlainText => Self::PlainText(PlainTextHandler.empty()),
            MediaType::Json => Self::Json(JsonHandler.empty()),
            MediaType::Yaml => Self::Yaml(YamlHandler.empty(), SourceScalars::default()),
            MediaType::Xml => Self::Xml(XmlHandler.empty()),
        }
    }

    /// Parse existing target content, or start empty when there is none.
    ///
    /// Blank content counts as missing.
    pub fn parse_or_empty(media_type: MediaType, existing: Option<&str>) -> Result<Self> {
        match existing {
            Some(source) if !source.trim().is_empty() => Self::parse(media_type, source),
            _ => Ok(Self::empty(media_type)),
        }
    }

    /// Indentation of an existing `media_type` file, or the fallback.
    pub fn detect_style(media_type: MediaType, existing: Option<&str>) -> StyleInfo {
        let Some(source) = existing else {
            return StyleInfo::fallback();
        };
        match media_type {
            MediaType::PlainText => PlainTextHandler.detect_style(source),
            MediaType::Json => JsonHandler.detect_style(source),
            MediaType::Yaml => YamlHandler.detect_style(source),
            MediaType::Xml => XmlHandler.detect_style(source),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::PlainText(_) => MediaType::PlainText,
            Self::Json(_) => MediaType::Json,
            Self::Yaml(..) => MediaType::Yaml,
            Self::Xml(_) => MediaType::Xml,
        }
    }

    /// Read the value at `path` as text.
    ///
    /// Plain text ignores the path. A missing step, or a path ending on a
    /// mapping, sequence or null, yields `None`.
    pub fn get(&self, path: &PathExpression) -> Option<String> {
        let found = match self {
            Self::PlainText(text) => return Some(text.clone()),
            Self::Json(tree) => lookup(tree, path, ArrayMode::Strict),
            Self::Yaml(tree, _) => lookup(tree, path, ArrayMode::Strict),
            Self::Xml(tree) => lookup(tree, path, ArrayMode::UnwrapSingle),
        };
        if found.is_none() {
            tracing::debug!(path = %path, media_type = %self.media_type(), "no scalar at path");
        }
        found
    }

    /// Write `value` at `path`, creating intermediate mappings.
    ///
    /// Plain text replaces the whole document. Returns `self` for chaining.
    pub fn set(&mut self, path: &PathExpression, value: &str) -> Result<&mut Self> {
        let media_type = self.media_type();
        let outcome = match self {
            Self::PlainText(text) => {
                *text = value.to_string();
                Ok(())
            }
            Self::Json(tree) => path.set_in(tree, JsonValue::from_text(value), ArrayMode::Strict),
            Self::Yaml(tree, _) => {
                path.set_in(tree, YamlValue::from_text(value), ArrayMode::Strict)
            }
            Self::Xml(tree) => {
                path.set_in(tree, JsonValue::from_text(value), ArrayMode::UnwrapSingle)
            }
        };

        outcome.map_err(|reason| Error::PathSetFailed {
            format: media_type.label().to_string(),
            path: path.to_string(),
            reason,
        })?;
        Ok(self)
    }

    /// Render the document as the exact text to write to disk.
    ///
    /// JSON ends with one `\n`, YAML with the emitter's final newline, XML
    /// with the platform line terminator, plain text with nothing.
    pub fn render(&self, style: &StyleInfo) -> Result<String> {
        match self {
            Self::PlainText(text) => PlainTextHandler.render(text, style),
            Self::Json(tree) => JsonHandler.render(tree, style),
            Self::Yaml(tree, originals) => YamlHandler.render_preserving(tree, style, originals),
            Self::Xml(tree) => {
                let mut out = XmlHandler.render(tree, style)?;
                out.push_str(LINE_ENDING);
                Ok(out)
            }
        }
    }
}

fn lookup<T: Tree>(tree: &T, path: &PathExpression, mode: ArrayMode) -> Option<String> {
    path.get_in(tree, mode).and_then(Tree::scalar_text)
}
