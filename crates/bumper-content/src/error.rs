//! Error types for bumper-content

/// Result type for bumper-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, patching or rendering documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Failed to render {format} content: {message}")]
    Serialize { format: String, message: String },

    #[error("Invalid path expression `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Cannot set path `{path}` in {format} document: {reason}")]
    PathSetFailed {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn serialize(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialize {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
