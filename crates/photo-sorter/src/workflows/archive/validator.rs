use chrono::{DateTime, Datelike, Local};

use crate::config::DEFAULT_EARLIEST_YEAR;

/// Range check applied to every inferred capture date.
///
/// Out-of-range values are what the numeric heuristics produce when they
/// misread a token, so anything before `earliest_year` or after "now" is
/// treated as a parse miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValidator {
    earliest_year: i32,
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EARLIEST_YEAR)
    }
}

impl DateValidator {
    pub fn new(earliest_year: i32) -> Self {
        Self { earliest_year }
    }

    pub fn is_valid(&self, candidate: Option<DateTime<Local>>) -> bool {
        self.is_valid_at(candidate, Local::now())
    }

    pub fn is_valid_at(&self, candidate: Option<DateTime<Local>>, now: DateTime<Local>) -> bool {
        let Some(date) = candidate else {
            return false;
        };

        if date.year() < self.earliest_year {
            return false;
        }

        date <= now
    }
}
