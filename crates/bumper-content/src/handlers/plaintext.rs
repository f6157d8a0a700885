//! Plain text format handler

use crate::error::Result;
use crate::handlers::FormatHandler;
use crate::indent::StyleInfo;

/// Handler for files whose entire content is the version
#[derive(Debug, Default)]
pub struct PlainTextHandler;

impl PlainTextHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FormatHandler for PlainTextHandler {
    type Tree = String;

    fn parse(&self, source: &str) -> Result<String> {
        Ok(source.trim().to_string())
    }

    fn empty(&self) -> String {
        String::new()
    }

    /// The content is replaced whole, so there is no style to keep.
    fn detect_style(&self, _source: &str) -> StyleInfo {
        StyleInfo::fallback()
    }

    /// Written verbatim, without a trailing newline.
    fn render(&self, tree: &String, _style: &StyleInfo) -> Result<String> {
        Ok(tree.clone())
    }
}
