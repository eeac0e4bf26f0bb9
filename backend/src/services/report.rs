//! CSV export of stored proposals.
//!
//! One row per proposal, with one boolean column per weekday and the covered
//! student ids joined by `;`:
//!
//! ```text
//! subject,catalog,classstarttime,classendtime,mondays,tuesdays,...,sundays,studyids
//! COEN,243,09:00:00,12:00:00,false,true,false,false,false,false,false,1;2;3
//! ```

use super::proposal_store::StoredProposals;
use crate::models::time::weekday_index;

pub const CSV_HEADER: [&str; 12] = [
    "subject",
    "catalog",
    "classstarttime",
    "classendtime",
    "mondays",
    "tuesdays",
    "wednesdays",
    "thursdays",
    "fridays",
    "saturdays",
    "sundays",
    "studyids",
];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Render stored proposals as CSV text, header included.
pub fn proposals_to_csv(stored: &StoredProposals) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for proposal in &stored.proposals {
        let slot = &proposal.slot;
        let mut row = Vec::with_capacity(CSV_HEADER.len());
        row.push(stored.course.subject.clone());
        row.push(stored.course.catalog.clone());
        row.push(slot.start().format("%H:%M:%S").to_string());
        row.push(slot.end().format("%H:%M:%S").to_string());
        let day = weekday_index(slot.weekday());
        for column in 0..7u8 {
            row.push((column == day).to_string());
        }
        row.push(
            proposal
                .students
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Buffer(e.to_string()))
}

/// Suggested download file name, e.g. `COEN_243_proposals.csv`.
pub fn report_file_name(stored: &StoredProposals) -> String {
    format!(
        "{}_{}_proposals.csv",
        stored.course.subject, stored.course.catalog
    )
    .replace(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '.', "_")
}
