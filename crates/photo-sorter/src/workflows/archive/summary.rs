use serde::Serialize;

use super::domain::RoutingReason;
use super::store::CopyOutcome;

/// Tally of a batch run, reported once every source has been processed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub success_by_file_name: usize,
    pub success_by_metadata: usize,
    pub failure: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a file that reached the copy step.
    pub fn record(&mut self, reason: RoutingReason, outcome: CopyOutcome) {
        if outcome == CopyOutcome::Skipped {
            self.skipped += 1;
            return;
        }

        match reason {
            RoutingReason::ByFilename => self.success_by_file_name += 1,
            RoutingReason::ByMetadata => self.success_by_metadata += 1,
            RoutingReason::Unknown => self.failure += 1,
        }
    }

    /// Counts a file whose processing errored.
    pub fn record_failure(&mut self) {
        self.failure += 1;
    }

    pub fn processed(&self) -> usize {
        self.success_by_file_name + self.success_by_metadata + self.failure + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_file_moves_exactly_one_counter() {
        let mut summary = RunSummary::new();
        summary.record(RoutingReason::ByFilename, CopyOutcome::Copied);
        summary.record(RoutingReason::ByMetadata, CopyOutcome::Copied);
        summary.record(RoutingReason::ByMetadata, CopyOutcome::Copied);
        summary.record(RoutingReason::Unknown, CopyOutcome::Copied);
        summary.record(RoutingReason::ByFilename, CopyOutcome::Skipped);
        summary.record_failure();

        assert_eq!(
            summary,
            RunSummary {
                success_by_file_name: 1,
                success_by_metadata: 2,
                failure: 2,
                skipped: 1,
            }
        );
        assert_eq!(summary.processed(), 6);
    }

    #[test]
    fn serializes_with_report_field_names() {
        let summary = RunSummary {
            success_by_file_name: 3,
            success_by_metadata: 1,
            failure: 0,
            skipped: 2,
        };
        let json = serde_json::to_value(summary).expect("serialize");
        assert_eq!(json["successByFileName"], 3);
        assert_eq!(json["successByMetadata"], 1);
        assert_eq!(json["failure"], 0);
        assert_eq!(json["skipped"], 2);
    }
}
