//! Reading the current version from a source file

use bumper_content::Document;
use bumper_fs::io;
use tracing::debug;

use crate::config::Descriptor;
use crate::{Error, Result};

/// Reads a version string out of a single descriptor
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentReader;

impl DocumentReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the version at the descriptor's path.
    ///
    /// A missing or unreadable file is an error. A file that parses but has
    /// no scalar at the path yields `None`.
    pub fn read_version(&self, source: &Descriptor) -> Result<Option<String>> {
        let content = io::read_text(&source.location)?;
        let document = Document::parse(source.media_type, &content)
            .map_err(|e| Error::document(&source.location, e))?;

        let version = document.get(&source.path);
        debug!(descriptor = %source, version = ?version, "read version");
        Ok(version)
    }
}
