use std::io::Write;

use serde::Serialize;

use super::domain::RoutingDecision;

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    source: String,
    destination: String,
    reason: &'a str,
    capture_date: Option<String>,
}

impl<'a> From<&'a RoutingDecision> for PlanRow<'a> {
    fn from(decision: &'a RoutingDecision) -> Self {
        Self {
            source: decision.source_file.display().to_string(),
            destination: decision.destination_file.display().to_string(),
            reason: decision.reason.label(),
            capture_date: decision
                .capture_date
                .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Writes routing decisions as CSV with a header row.
pub fn write_plan<W: Write>(decisions: &[RoutingDecision], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for decision in decisions {
        csv_writer.serialize(PlanRow::from(decision))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::archive::domain::RoutingReason;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    #[test]
    fn writes_header_and_rows() {
        let date = Local
            .with_ymd_and_hms(2019, 6, 1, 8, 0, 0)
            .single()
            .expect("unambiguous local time");
        let decisions = vec![
            RoutingDecision {
                source_file: PathBuf::from("dept/holiday.jpg"),
                destination_file: PathBuf::from("ariv/2019. 06/holiday.jpg"),
                reason: RoutingReason::ByMetadata,
                capture_date: Some(date),
            },
            RoutingDecision {
                source_file: PathBuf::from("dept/anim.gif"),
                destination_file: PathBuf::from("ariv/Unknown/anim.gif"),
                reason: RoutingReason::Unknown,
                capture_date: None,
            },
        ];

        let mut buffer = Vec::new();
        write_plan(&decisions, &mut buffer).expect("write plan");
        let output = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "source,destination,reason,capture_date");
        assert_eq!(
            lines[1],
            "dept/holiday.jpg,ariv/2019. 06/holiday.jpg,by_metadata,2019-06-01 08:00:00"
        );
        assert_eq!(lines[2], "dept/anim.gif,ariv/Unknown/anim.gif,unknown,");
    }
}
