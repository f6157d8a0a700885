//! Release hooks exposed to the host tool

use async_trait::async_trait;
use bumper_fs::NormalizedPath;
use tracing::{debug, info};

use crate::config::{BumperOptions, Descriptor};
use crate::reader::DocumentReader;
use crate::writer::{DocumentWriter, WriteReport};
use crate::Result;

/// Hooks a release tool calls during a release
#[async_trait]
pub trait ReleaseHooks: Send + Sync {
    /// The version currently recorded in the project, if any.
    async fn latest_version(&self) -> Result<Option<String>>;

    /// Record `version` everywhere it is configured to go.
    async fn bump(&self, version: &str) -> Result<()>;
}

/// Reads a version from one file and writes it into many
#[derive(Debug, Clone, Default)]
pub struct Bumper {
    options: BumperOptions,
    root: Option<NormalizedPath>,
    reader: DocumentReader,
    writer: DocumentWriter,
}

impl Bumper {
    pub fn new(options: BumperOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Resolve relative descriptor locations against `root` instead of the
    /// working directory.
    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn locate(&self, descriptor: Descriptor) -> Descriptor {
        match &self.root {
            Some(root) => descriptor.rooted(root),
            None => descriptor,
        }
    }

    /// Write `version` into every target and report what was written.
    ///
    /// All descriptors are resolved before any file is touched, so a bad
    /// media type or path fails the bump without partial writes.
    pub async fn write_all(&self, version: &str) -> Result<WriteReport> {
        let targets: Vec<Descriptor> = self
            .options
            .targets()?
            .into_iter()
            .map(|target| self.locate(target))
            .collect();

        if targets.is_empty() {
            debug!("no version targets configured");
            return Ok(WriteReport::default());
        }

        let report = self.writer.write_version(version, targets).await?;
        info!(version, targets = report.written.len(), "bumped version");
        Ok(report)
    }
}

#[async_trait]
impl ReleaseHooks for Bumper {
    async fn latest_version(&self) -> Result<Option<String>> {
        let Some(source) = self.options.source()? else {
            debug!("no version source configured");
            return Ok(None);
        };
        let source = self.locate(source);
        let reader = self.reader;

        tokio::task::spawn_blocking(move || reader.read_version(&source)).await?
    }

    async fn bump(&self, version: &str) -> Result<()> {
        self.write_all(version).await.map(|_| ())
    }
}
