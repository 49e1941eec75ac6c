//! Vote tallying and overall confidence classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tally of confidence votes across all responses for one release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    /// Number of "high" votes.
    pub high: usize,
    /// Number of "medium" votes.
    pub medium: usize,
    /// Number of "low" votes.
    pub low: usize,
}

impl VoteCounts {
    /// Construct counts directly.
    pub fn new(high: usize, medium: usize, low: usize) -> Self {
        Self { high, medium, low }
    }
}

/// Overall confidence classification for a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallConfidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for OverallConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(s)
    }
}

/// Count case-insensitive, whitespace-trimmed occurrences of the three
/// confidence categories. Unrecognized values are excluded from all counts.
pub fn tally_votes<'a, I>(values: I) -> VoteCounts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = VoteCounts::default();
    for value in values {
        match value.trim().to_lowercase().as_str() {
            "high" => counts.high += 1,
            "medium" => counts.medium += 1,
            "low" => counts.low += 1,
            other => {
                if !other.is_empty() {
                    log::debug!("Ignoring unrecognized confidence value {:?}", other);
                }
            }
        }
    }
    counts
}

/// Classify a vote tally into an overall confidence level.
///
/// The rules are evaluated strictly in order; the tie-breaking cases must
/// come before the final HIGH fallthrough. For example a clear "high"
/// majority only wins by failing every earlier rule.
pub fn classify(counts: &VoteCounts) -> OverallConfidence {
    let VoteCounts { high, medium, low } = *counts;

    if high == medium && medium == low {
        OverallConfidence::Medium
    } else if medium > high && medium > low {
        OverallConfidence::Medium
    } else if low > high && low > medium {
        OverallConfidence::Low
    } else if low == high && medium == 0 {
        OverallConfidence::Medium
    } else if low == medium && high == 0 {
        OverallConfidence::Medium
    } else {
        OverallConfidence::High
    }
}
