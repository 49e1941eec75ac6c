//! Per-release summary derivation: metadata, vote tally, classification,
//! and the bullet lists shown on the factor slides.

use crate::confidence::{classify, tally_votes, OverallConfidence, VoteCounts};
use crate::extract::{extract_last_numeric, parse_release_parts, solution_name_from_filename};
use crate::types::{Release, SurveyTable};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Build one bullet line of the form `"<factor> — <respondent>"`.
///
/// A missing factor renders as an empty left side with the separator kept,
/// never as an error.
pub fn bullet_line(factor: &str, respondent: &str) -> String {
    format!("{} — {}", factor, respondent)
}

/// Everything derived from the survey for one release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSummary {
    /// Version string from the composite release-info field.
    pub version: String,

    /// Committed release date.
    pub due_date: String,

    /// Release summary text.
    pub summary: String,

    /// Last numeric run in the release-info field, used as the `<KEY>` token.
    pub key: String,

    /// Vote tally over the release's confidence column.
    pub counts: VoteCounts,

    /// Overall classification of the tally.
    pub overall: OverallConfidence,

    /// One "factor — respondent" line per response, row order.
    pub lowering_points: Vec<String>,

    /// One "support — respondent" line per response, row order.
    pub increasing_points: Vec<String>,
}

impl ReleaseSummary {
    /// Derive the summary for one release from the loaded survey table.
    ///
    /// The first row is the canonical source for release-level metadata;
    /// all rows are assumed to share it.
    pub fn derive(table: &SurveyTable, release: Release) -> Result<Self> {
        let first = table.first_row()?;
        let info = first.release_info(release);

        let parts = parse_release_parts(info);
        let key = extract_last_numeric(info);

        let counts = tally_votes(table.rows.iter().map(|row| row.confidence(release)));
        let overall = classify(&counts);

        let lowering_points = table
            .rows
            .iter()
            .map(|row| bullet_line(row.lowering(release), &row.respondent))
            .collect();
        let increasing_points = table
            .rows
            .iter()
            .map(|row| bullet_line(row.increasing(release), &row.respondent))
            .collect();

        Ok(Self {
            version: parts.version,
            due_date: parts.due_date,
            summary: parts.summary,
            key,
            counts,
            overall,
            lowering_points,
            increasing_points,
        })
    }
}

/// The complete set of values injected into the template in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    /// Solution name parsed from the workbook filename.
    pub solution_name: String,

    /// Total number of survey responses.
    pub total_rows: usize,

    /// Derived values for the first release.
    pub release_1: ReleaseSummary,

    /// Derived values for the second release.
    pub release_2: ReleaseSummary,
}

impl ReportData {
    /// Derive the full report from the survey table and the workbook
    /// filename (which carries the solution name).
    pub fn derive(table: &SurveyTable, workbook_filename: &str) -> Result<Self> {
        Ok(Self {
            solution_name: solution_name_from_filename(workbook_filename),
            total_rows: table.len(),
            release_1: ReleaseSummary::derive(table, Release::First)?,
            release_2: ReleaseSummary::derive(table, Release::Second)?,
        })
    }
}
