//! Error types for bumper-core

use std::fmt;
use std::path::PathBuf;

use bumper_fs::NormalizedPath;

/// Result type for bumper-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or bumping versions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fs(#[from] bumper_fs::Error),

    #[error("{location}: {source}")]
    Document {
        location: NormalizedPath,
        #[source]
        source: bumper_content::Error,
    },

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(#[source] bumper_content::Error),

    #[error("Output descriptor #{index} has no file")]
    MissingLocation { index: usize },

    #[error("Failed to parse {format} options at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported options format: {extension}")]
    UnsupportedConfigFormat { extension: String },

    #[error("{} of {total} version targets failed: {}", .failures.len(), summarize(.failures))]
    TargetsFailed {
        failures: Vec<TargetFailure>,
        total: usize,
    },

    #[error("Version target task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn document(location: &NormalizedPath, source: bumper_content::Error) -> Self {
        Self::Document {
            location: location.clone(),
            source,
        }
    }

    /// The content error underneath, if this failure came from a document.
    pub fn content_error(&self) -> Option<&bumper_content::Error> {
        match self {
            Self::Document { source, .. } | Self::InvalidDescriptor(source) => Some(source),
            _ => None,
        }
    }
}

/// One target that could not be written during a bump
#[derive(Debug)]
pub struct TargetFailure {
    pub location: NormalizedPath,
    pub error: Box<Error>,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.error)
    }
}

fn summarize(failures: &[TargetFailure]) -> String {
    failures
        .iter()
        .map(TargetFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
