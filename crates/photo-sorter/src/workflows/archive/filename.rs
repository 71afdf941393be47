use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use super::domain::DateCandidate;
use super::validator::DateValidator;

/// Numeric encodings recognised in a filename token, in priority order.
///
/// Every rule whose predicate matches is considered and the last one wins.
/// The predicates are keyed on token length and never overlap today, so the
/// order only matters if a new rule is added with an overlapping length.
const RULES: [DateRule; 3] = [
    DateRule::Epoch,
    DateRule::FourDigitYear,
    DateRule::TwoDigitYear,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateRule {
    /// 10 digits of epoch seconds or 13 digits of epoch milliseconds.
    Epoch,
    /// `YYYYMMDDHHMMSS`, local time. Trailing digits are ignored.
    FourDigitYear,
    /// `YYMMDDHHMMSS`, local time, read as `20YY`.
    TwoDigitYear,
}

impl DateRule {
    fn applies(&self, token: &str) -> bool {
        match self {
            DateRule::Epoch => token.len() == 10 || token.len() == 13,
            DateRule::FourDigitYear => token.len() >= 14 && token.starts_with("20"),
            DateRule::TwoDigitYear => token.len() == 12,
        }
    }

    fn decode(&self, token: &str) -> Option<DateTime<Local>> {
        match self {
            DateRule::Epoch => {
                let value: i64 = digits(token)?.parse().ok()?;
                let instant = if token.len() == 13 {
                    Utc.timestamp_millis_opt(value).single()?
                } else {
                    Utc.timestamp_opt(value, 0).single()?
                };
                Some(instant.with_timezone(&Local))
            }
            DateRule::FourDigitYear => {
                let head = digits(token.get(..14)?)?;
                let year = field(head, 0, 4)?;
                calendar_timestamp(year, &head[4..])
            }
            DateRule::TwoDigitYear => {
                let token = digits(token)?;
                let year = 2000 + field(token, 0, 2)?;
                calendar_timestamp(year, &token[2..])
            }
        }
    }
}

fn digits(token: &str) -> Option<&str> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        Some(token)
    } else {
        None
    }
}

fn field(token: &str, start: usize, len: usize) -> Option<i32> {
    token.get(start..start + len)?.parse().ok()
}

/// Decodes `MMDDHHMMSS` following an already-read year.
fn calendar_timestamp(year: i32, rest: &str) -> Option<DateTime<Local>> {
    let month = field(rest, 0, 2)?;
    let day = field(rest, 2, 2)?;
    let hour = field(rest, 4, 2)?;
    let minute = field(rest, 6, 2)?;
    let second = field(rest, 8, 2)?;

    let naive = NaiveDate::from_ymd_opt(year, month as u32, day as u32)?.and_hms_opt(
        hour as u32,
        minute as u32,
        second as u32,
    )?;

    Local.from_local_datetime(&naive).earliest()
}

/// Pulls the digit run a date is decoded from.
///
/// Names with a hyphen keep only the text before the first hyphen, which is
/// where some export tools put their id. Everything else has all of its digit
/// runs joined together, so `IMG_20230405_123045.jpg` yields `20230405123045`.
pub(crate) fn extract_token(name: &str) -> Option<String> {
    let token = match name.split_once('-') {
        // Kept verbatim: `IMG_20230405_123045-edited.jpg` yields a token no rule decodes.
        Some((prefix, _)) => prefix.to_string(),
        None => name.chars().filter(char::is_ascii_digit).collect(),
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub(crate) fn decode_token(token: &str) -> Option<DateTime<Local>> {
    RULES
        .iter()
        .rev()
        .find(|rule| rule.applies(token))
        .and_then(|rule| rule.decode(token))
}

/// Infers a capture date from a filename, or from any digit-bearing string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameDateParser {
    validator: DateValidator,
}

impl FilenameDateParser {
    pub fn new(validator: DateValidator) -> Self {
        Self { validator }
    }

    pub fn parse(&self, name: &str) -> DateCandidate {
        self.parse_at(name, Local::now())
    }

    pub fn parse_at(&self, name: &str, now: DateTime<Local>) -> DateCandidate {
        let Some(token) = extract_token(name) else {
            return DateCandidate::invalid();
        };

        let date = decode_token(&token);
        DateCandidate {
            is_correct: self.validator.is_valid_at(date, now),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Timelike};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn extract_token_joins_digit_runs() {
        assert_eq!(
            extract_token("IMG_20230405_123045.jpg").as_deref(),
            Some("20230405123045")
        );
        assert_eq!(extract_token("photo.jpg"), None);
    }

    #[test]
    fn extract_token_keeps_prefix_before_hyphen() {
        assert_eq!(
            extract_token("1680000000-edited-2.jpg").as_deref(),
            Some("1680000000")
        );
        assert_eq!(extract_token("-leading.jpg"), None);
    }

    #[test]
    fn decodes_four_digit_year_timestamp() {
        let candidate = FilenameDateParser::default().parse("20230405123045_IMG.jpg");
        assert!(candidate.is_correct);
        assert_eq!(candidate.date, Some(local(2023, 4, 5, 12, 30, 45)));
    }

    #[test]
    fn four_digit_year_ignores_trailing_digits() {
        let candidate = FilenameDateParser::default().parse("Screenshot_20190102030405_1.png");
        assert_eq!(candidate.date, Some(local(2019, 1, 2, 3, 4, 5)));
        assert!(candidate.is_correct);
    }

    #[test]
    fn long_token_without_20_prefix_is_not_decoded() {
        let candidate = FilenameDateParser::default().parse("19990102030405.jpg");
        assert_eq!(candidate.date, None);
        assert!(!candidate.is_correct);
    }

    #[test]
    fn decodes_epoch_seconds_and_millis() {
        let parser = FilenameDateParser::default();

        let seconds = parser.parse("1680000000.jpg");
        assert!(seconds.is_correct);
        assert_eq!(
            seconds.date.map(|d| d.timestamp()),
            Some(1_680_000_000)
        );

        let millis = parser.parse("received_1680000000123.jpeg");
        assert!(millis.is_correct);
        assert_eq!(
            millis.date.map(|d| d.timestamp_millis()),
            Some(1_680_000_000_123)
        );
    }

    #[test]
    fn small_epoch_values_fall_outside_range() {
        let candidate = FilenameDateParser::default().parse("0000000042.jpg");
        assert!(candidate.date.is_some());
        assert!(!candidate.is_correct);
    }

    #[test]
    fn epoch_in_the_future_is_rejected() {
        let now = local(2024, 1, 1, 0, 0, 0);
        let future = (now + Duration::days(30)).timestamp();
        let candidate =
            FilenameDateParser::default().parse_at(&format!("{future}.jpg"), now);
        assert!(candidate.date.is_some());
        assert!(!candidate.is_correct);
    }

    #[test]
    fn decodes_two_digit_year_in_this_century() {
        let candidate = FilenameDateParser::default().parse("KakaoTalk_180704_101112.jpg");
        assert!(candidate.is_correct);
        let date = candidate.date.expect("decoded");
        assert_eq!((date.year(), date.month(), date.day()), (2018, 7, 4));
        assert_eq!((date.hour(), date.minute(), date.second()), (10, 11, 12));
    }

    #[test]
    fn impossible_calendar_values_are_invalid() {
        let candidate = FilenameDateParser::default().parse("20231345123045.jpg");
        assert_eq!(candidate.date, None);
        assert!(!candidate.is_correct);
    }

    #[test]
    fn names_without_digits_are_invalid() {
        let candidate = FilenameDateParser::default().parse("photo.jpg");
        assert_eq!(candidate, DateCandidate::invalid());
    }

    #[test]
    fn non_numeric_hyphen_prefix_is_invalid() {
        let candidate = FilenameDateParser::default().parse("IMG-20230405-WA0001.jpg");
        assert!(!candidate.is_correct);
        assert_eq!(candidate.date, None);
    }

    #[test]
    fn hyphen_suffix_hides_digits_before_it() {
        assert_eq!(
            extract_token("IMG_20230405_123045-edited.jpg").as_deref(),
            Some("IMG_20230405_123045")
        );
        let candidate = FilenameDateParser::default().parse("IMG_20230405_123045-edited.jpg");
        assert_eq!(candidate, DateCandidate::invalid());
    }

    #[test]
    fn unrecognised_lengths_are_invalid() {
        let candidate = FilenameDateParser::default().parse("DSC_0042.JPG");
        assert_eq!(candidate.date, None);
        assert!(!candidate.is_correct);
    }

    #[test]
    fn parses_exif_style_strings() {
        let candidate = FilenameDateParser::default().parse("2019:06:01 08:00:00");
        assert!(candidate.is_correct);
        assert_eq!(candidate.date, Some(local(2019, 6, 1, 8, 0, 0)));
    }
}
