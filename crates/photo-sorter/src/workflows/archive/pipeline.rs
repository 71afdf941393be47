use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::ArchiveConfig;

use super::domain::{month_folder_name, RoutingDecision, RoutingReason};
use super::filename::FilenameDateParser;
use super::metadata::{MetadataDateParser, MetadataReader};
use super::validator::DateValidator;

/// Decides where a single file belongs. Performs no filesystem writes.
#[derive(Debug, Clone)]
pub struct ClassificationPipeline<R> {
    filename: FilenameDateParser,
    metadata: MetadataDateParser<R>,
    archive_root: PathBuf,
    unknown_dir: String,
}

impl<R: MetadataReader> ClassificationPipeline<R> {
    pub fn new(config: &ArchiveConfig, reader: R) -> Self {
        let filename = FilenameDateParser::new(DateValidator::new(config.earliest_year));
        Self {
            filename,
            metadata: MetadataDateParser::new(reader, filename),
            archive_root: config.archive_root.clone(),
            unknown_dir: config.unknown_dir.clone(),
        }
    }

    /// Paths are built from the raw `file_name`; only date inference sees the
    /// lossy UTF-8 form.
    pub async fn classify(&self, file_name: &OsStr, source_dir: &Path) -> RoutingDecision {
        let source_file = source_dir.join(file_name);

        let parsed = self.filename.parse(&file_name.to_string_lossy());
        let (reason, capture_date) = match parsed.accepted() {
            Some(date) => (RoutingReason::ByFilename, Some(date)),
            None => match self.metadata.parse(&source_file).await.accepted() {
                Some(date) => (RoutingReason::ByMetadata, Some(date)),
                None => (RoutingReason::Unknown, None),
            },
        };

        let folder = capture_date
            .as_ref()
            .map(month_folder_name)
            .unwrap_or_else(|| self.unknown_dir.clone());

        RoutingDecision {
            destination_file: self.archive_root.join(folder).join(file_name),
            source_file,
            reason,
            capture_date,
        }
    }
}
