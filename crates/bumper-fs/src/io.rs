//! Atomic I/O operations with file locking

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a reader never observes a partially
/// written target. The temp file lives next to the target (same
/// filesystem) and holds an advisory lock while it is being filled.
///
/// A symlinked target is resolved first so the link itself survives. An
/// existing target keeps its permissions; a new one gets the same mode a
/// plain create would give it.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = resolve_target(path.to_native());
    let parent = match native_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;

    let existing_permissions = match fs::metadata(&native_path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(Error::io(&native_path, e)),
    };

    let prefix = format!(
        ".{}.",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // the umask applies to the mode requested at creation
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp_file = builder
        .tempfile_in(&parent)
        .map_err(|e| Error::io(&parent, e))?;

    if let Some(permissions) = existing_permissions {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::io(temp_file.path(), e))?;
    }

    temp_file
        .as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_file.path(), e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| Error::io(temp_file.path(), e))?;

    temp_file
        .as_file()
        .unlock()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp_file
        .persist(&native_path)
        .map_err(|e| Error::io(&native_path, e.error))?;

    tracing::trace!(
        path = %path,
        resolved = %native_path.display(),
        bytes = content.len(),
        "wrote file atomically"
    );
    Ok(())
}

/// Follow symlinks to the file that actually holds the content.
///
/// A path that does not exist yet (or a dangling link) is used as given.
fn resolve_target(native_path: PathBuf) -> PathBuf {
    match fs::symlink_metadata(&native_path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::canonicalize(&native_path).unwrap_or(native_path)
        }
        _ => native_path,
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file that may not exist yet.
///
/// Returns `Ok(None)` when the file is absent. Every other failure
/// (permissions, not a file, invalid UTF-8) is an error.
pub fn read_text_opt(path: &NormalizedPath) -> Result<Option<String>> {
    let native_path = path.to_native();
    match fs::read_to_string(&native_path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(&native_path, e)),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}
