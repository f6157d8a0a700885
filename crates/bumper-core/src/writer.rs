//! Writing a new version into every target file

use std::sync::Arc;

use bumper_content::Document;
use bumper_fs::{NormalizedPath, io};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Descriptor;
use crate::error::TargetFailure;
use crate::{Error, Result};

/// Locations written by a successful bump, in descriptor order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<NormalizedPath>,
}

/// Rewrites version targets, keeping each file's indentation
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentWriter;

impl DocumentWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `version` into one target.
    ///
    /// A missing file starts from an empty document of the target's type.
    /// The result replaces the file atomically.
    pub fn write_target(&self, version: &str, target: &Descriptor) -> Result<()> {
        let existing = io::read_text_opt(&target.location)?;
        let style = Document::detect_style(target.media_type, existing.as_deref());
        debug!(
            descriptor = %target,
            exists = existing.is_some(),
            indent = ?style.indent,
            detected = style.detected,
            "prepared target"
        );

        let as_document_error = |e| Error::document(&target.location, e);
        let mut document = Document::parse_or_empty(target.media_type, existing.as_deref())
            .map_err(as_document_error)?;
        document
            .set(&target.path, version)
            .map_err(as_document_error)?;
        let rendered = document.render(&style).map_err(as_document_error)?;

        io::write_text(&target.location, &rendered)?;
        info!(file = %target.location, version, "wrote version");
        Ok(())
    }

    /// Write `version` into every target concurrently.
    ///
    /// Every target is attempted even when others fail. Failures are
    /// reported together, in descriptor order, once all writes settle.
    pub async fn write_version(
        &self,
        version: &str,
        targets: Vec<Descriptor>,
    ) -> Result<WriteReport> {
        let total = targets.len();
        let version: Arc<str> = Arc::from(version);
        let mut tasks = JoinSet::new();

        for (index, target) in targets.into_iter().enumerate() {
            let writer = *self;
            let version = Arc::clone(&version);
            tasks.spawn(async move {
                let location = target.location.clone();
                let result =
                    tokio::task::spawn_blocking(move || writer.write_target(&version, &target))
                        .await
                        .map_err(Error::from)
                        .and_then(|written| written);
                (index, location, result)
            });
        }

        let mut settled = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            settled.push(joined?);
        }
        settled.sort_by_key(|(index, _, _)| *index);

        let mut report = WriteReport::default();
        let mut failures = Vec::new();
        for (_, location, result) in settled {
            match result {
                Ok(()) => report.written.push(location),
                Err(error) => {
                    warn!(file = %location, error = %error, "failed to write version");
                    failures.push(TargetFailure {
                        location,
                        error: Box::new(error),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(Error::TargetsFailed { failures, total })
        }
    }
}
