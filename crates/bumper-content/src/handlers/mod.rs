//! Format handlers

mod json;
mod plaintext;
mod xml;
mod yaml;
mod yaml_source;

pub use self::json::JsonHandler;
pub use self::xml::XmlHandler;
pub use self::yaml::{SourceScalars, YamlHandler};
pub use plaintext::PlainTextHandler;

use crate::error::Result;
use crate::indent::StyleInfo;

/// Trait for format-specific handlers
pub trait FormatHandler {
    /// In-memory representation produced by `parse`
    type Tree;

    /// Parse source into a tree
    fn parse(&self, source: &str) -> Result<Self::Tree>;

    /// Tree standing in for a target file that does not exist yet
    fn empty(&self) -> Self::Tree;

    /// Indentation used by an existing file of this format
    fn detect_style(&self, source: &str) -> StyleInfo {
        StyleInfo::detect(source)
    }

    /// Render a tree back to text using the given style
    fn render(&self, tree: &Self::Tree, style: &StyleInfo) -> Result<String>;
}
