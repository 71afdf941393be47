use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::ArchiveConfig;

use super::domain::RoutingDecision;
use super::metadata::{ExifMetadataReader, MetadataReader};
use super::pipeline::ClassificationPipeline;
use super::store::{FileStore, LocalFileStore, StoreError};
use super::summary::RunSummary;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("source directory unavailable: {0}")]
    Source(#[from] StoreError),
    #[error("unable to write plan: {0}")]
    Plan(#[from] csv::Error),
}

/// Walks every configured source directory, one file at a time, and copies
/// each file to the folder its classification picks.
#[derive(Debug)]
pub struct ArchiveBatch<R, S> {
    pipeline: ClassificationPipeline<R>,
    store: S,
    source_dirs: Vec<PathBuf>,
}

impl ArchiveBatch<ExifMetadataReader, LocalFileStore> {
    pub fn local(config: &ArchiveConfig) -> Self {
        Self::new(config, ExifMetadataReader, LocalFileStore)
    }
}

impl<R, S> ArchiveBatch<R, S>
where
    R: MetadataReader,
    S: FileStore,
{
    pub fn new(config: &ArchiveConfig, reader: R, store: S) -> Self {
        Self {
            pipeline: ClassificationPipeline::new(config, reader),
            store,
            source_dirs: config.source_dirs.clone(),
        }
    }

    /// Runs the batch. Only an unlistable source directory aborts the run;
    /// a file that fails to copy is logged and counted as a failure.
    pub async fn run(&self) -> Result<RunSummary, ArchiveError> {
        let mut summary = RunSummary::new();

        for source_dir in &self.source_dirs {
            let names = self.store.list(source_dir).await?;
            let total = names.len();
            info!(source = %source_dir.display(), files = total, "sorting source directory");

            for (index, file_name) in names.iter().enumerate() {
                let decision = self.pipeline.classify(file_name, source_dir).await;
                let name = file_name.to_string_lossy();

                match self
                    .store
                    .copy(&decision.source_file, &decision.destination_file)
                    .await
                {
                    Ok(outcome) => {
                        info!(
                            reason = decision.reason.label(),
                            outcome = ?outcome,
                            destination = %decision.destination_file.display(),
                            "[{}/{}] {}",
                            index + 1,
                            total,
                            name
                        );
                        summary.record(decision.reason, outcome);
                    }
                    Err(err) => {
                        warn!(error = %err, "[{}/{}] {} failed", index + 1, total, name);
                        summary.record_failure();
                    }
                }
            }
        }

        info!(
            by_file_name = summary.success_by_file_name,
            by_metadata = summary.success_by_metadata,
            failure = summary.failure,
            skipped = summary.skipped,
            "archive run complete"
        );
        Ok(summary)
    }

    /// Classifies every file without copying anything.
    pub async fn plan(&self) -> Result<Vec<RoutingDecision>, ArchiveError> {
        let mut decisions = Vec::new();
        for source_dir in &self.source_dirs {
            for name in self.store.list(source_dir).await? {
                decisions.push(self.pipeline.classify(&name, source_dir).await);
            }
        }
        Ok(decisions)
    }
}
