use chrono::{DateTime, Datelike, Local};
use std::path::PathBuf;

/// Outcome of a single date-inference attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCandidate {
    pub is_correct: bool,
    pub date: Option<DateTime<Local>>,
}

impl DateCandidate {
    pub fn invalid() -> Self {
        Self {
            is_correct: false,
            date: None,
        }
    }

    /// The date, only when it passed validation.
    pub fn accepted(&self) -> Option<DateTime<Local>> {
        if self.is_correct {
            self.date
        } else {
            None
        }
    }
}

/// Which strategy settled the destination of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingReason {
    ByFilename,
    ByMetadata,
    Unknown,
}

impl RoutingReason {
    pub fn label(&self) -> &'static str {
        match self {
            RoutingReason::ByFilename => "by_filename",
            RoutingReason::ByMetadata => "by_metadata",
            RoutingReason::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub source_file: PathBuf,
    pub destination_file: PathBuf,
    pub reason: RoutingReason,
    pub capture_date: Option<DateTime<Local>>,
}

/// Folder grouping photos by calendar month, e.g. `2023. 04`.
pub fn month_folder_name(date: &DateTime<Local>) -> String {
    format!("{:04}. {:02}", date.year(), date.month())
}
