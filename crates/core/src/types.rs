//! Domain types for survey responses and derived report values.

use serde::{Deserialize, Serialize};

/// One survey response, populated by explicit column-to-field mapping at
/// load time. Missing cell values are loaded as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyRow {
    /// Composite release-info field for the first release
    /// ("version, due date, ..., summary, key").
    pub release_info_1: String,

    /// Composite release-info field for the second release.
    pub release_info_2: String,

    /// Confidence rating for the first release (expected "high"/"medium"/"low").
    pub confidence_1: String,

    /// Confidence rating for the second release.
    pub confidence_2: String,

    /// Factors lowering confidence in the first release.
    pub lowering_1: String,

    /// Resources or support that would increase confidence in the first release.
    pub increasing_1: String,

    /// Factors lowering confidence in the second release.
    pub lowering_2: String,

    /// Resources or support that would increase confidence in the second release.
    pub increasing_2: String,

    /// Respondent name.
    pub respondent: String,
}

impl SurveyRow {
    /// Composite release-info field for the given release.
    pub fn release_info(&self, release: Release) -> &str {
        match release {
            Release::First => &self.release_info_1,
            Release::Second => &self.release_info_2,
        }
    }

    /// Confidence rating for the given release.
    pub fn confidence(&self, release: Release) -> &str {
        match release {
            Release::First => &self.confidence_1,
            Release::Second => &self.confidence_2,
        }
    }

    /// Confidence-lowering factors for the given release.
    pub fn lowering(&self, release: Release) -> &str {
        match release {
            Release::First => &self.lowering_1,
            Release::Second => &self.lowering_2,
        }
    }

    /// Confidence-increasing factors for the given release.
    pub fn increasing(&self, release: Release) -> &str {
        match release {
            Release::First => &self.increasing_1,
            Release::Second => &self.increasing_2,
        }
    }
}

/// Which of the two surveyed releases a derivation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Release {
    /// The first release column set.
    First,
    /// The second release column set.
    Second,
}

/// All survey responses, in workbook row order. Immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyTable {
    /// Responses in row order.
    pub rows: Vec<SurveyRow>,
}

impl SurveyTable {
    /// Create a table from already-mapped rows.
    pub fn new(rows: Vec<SurveyRow>) -> Self {
        Self { rows }
    }

    /// Number of responses.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no responses.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first response, which carries the release-level metadata shared
    /// by all rows.
    pub fn first_row(&self) -> crate::Result<&SurveyRow> {
        self.rows.first().ok_or(crate::Error::EmptyTable)
    }
}
