//! Core domain types, field extraction, and vote classification for
//! roadmap delivery confidence reports.

pub mod confidence;
pub mod error;
pub mod extract;
pub mod summary;
pub mod types;

pub use confidence::{classify, tally_votes, OverallConfidence, VoteCounts};
pub use error::{Error, Result};
pub use extract::{
    extract_last_numeric, parse_release_parts, solution_name_from_filename, ReleaseParts,
};
pub use summary::{bullet_line, ReleaseSummary, ReportData};
pub use types::{Release, SurveyRow, SurveyTable};
