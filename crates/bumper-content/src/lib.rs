//! Structured-document patch engine for version bumping
//!
//! Reads a value at a path inside a JSON, YAML, XML or plain text document
//! and writes a new value back while keeping the document's indentation.
//!
//! ```
//! use bumper_content::{Document, MediaType, PathExpression, StyleInfo};
//!
//! let source = "{\n    \"name\": \"app\",\n    \"version\": \"1.0.0\"\n}\n";
//! let path: PathExpression = "version".parse().unwrap();
//!
//! let mut doc = Document::parse(MediaType::Json, source).unwrap();
//! assert_eq!(doc.get(&path).as_deref(), Some("1.0.0"));
//!
//! doc.set(&path, "1.1.0").unwrap();
//! let rendered = doc.render(&StyleInfo::detect(source)).unwrap();
//! assert_eq!(rendered, "{\n    \"name\": \"app\",\n    \"version\": \"1.1.0\"\n}\n");
//! ```

pub mod document;
pub mod error;
pub mod handlers;
pub mod indent;
pub mod media;
pub mod path;

pub use document::Document;
pub use error::{Error, Result};
pub use handlers::{
    FormatHandler, JsonHandler, PlainTextHandler, SourceScalars, XmlHandler, YamlHandler,
};
pub use indent::{Indent, StyleInfo};
pub use media::MediaType;
pub use path::{ArrayMode, PathExpression, Step, Tree};
