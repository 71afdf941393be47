//! Capture-date inference and routing of photos into a month-per-folder archive.
//!
//! A file is dated from its name first, then from its embedded metadata, and
//! lands in the Unknown bucket when neither yields a plausible date.

mod batch;
pub mod domain;
mod filename;
pub mod metadata;
mod pipeline;
pub mod report;
pub mod store;
mod summary;
mod validator;

pub use batch::{ArchiveBatch, ArchiveError};
pub use domain::{month_folder_name, DateCandidate, RoutingDecision, RoutingReason};
pub use filename::FilenameDateParser;
pub use metadata::{
    ExifMetadataReader, MetadataDateParser, MetadataError, MetadataReader, MetadataTag,
    MetadataTagSet, TagValue,
};
pub use pipeline::ClassificationPipeline;
pub use report::write_plan;
pub use store::{CopyOutcome, FileStore, LocalFileStore, StoreError};
pub use summary::RunSummary;
pub use validator::DateValidator;
