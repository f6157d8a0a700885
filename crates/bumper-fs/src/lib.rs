//! Filesystem helpers for version bumper
//!
//! Provides normalized path handling, "missing is fine" reads and
//! atomic create-or-overwrite writes.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::NormalizedPath;
