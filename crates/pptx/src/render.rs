//! Report orchestration: applies the derived survey values to the six
//! fixed slide positions of the assessment template.

use crate::replace::Replacements;
use crate::template::Template;
use confidence_core::{ReleaseSummary, ReportData, Result};

/// Marker phrase of the lowering-factors bullet list shape.
pub const LOWERING_PLACEHOLDER: &str = "<<What factors lower your confidence level?>>";

/// Marker phrase of the increasing-factors bullet list shape.
pub const INCREASING_PLACEHOLDER: &str =
    "<<What resources, support, or actions would help increase your confidence level?>>";

// Fixed slide positions of the template layout.
const TITLE_SLIDE: usize = 0;
const RELEASE_1_OVERVIEW: usize = 1;
const RELEASE_1_FACTORS: usize = 2;
const RELEASE_2_OVERVIEW: usize = 3;
const RELEASE_2_FACTORS: usize = 4;
const SUMMARY_SLIDE: usize = 5;

/// Fill the template with the derived report values.
///
/// The template is mutated in place; call [`Template::save`] afterwards
/// to write the filled deck.
pub fn render_report(template: &mut Template, report: &ReportData) -> Result<()> {
    let total = report.total_rows;

    let title = Replacements::new()
        .with("<SOLUTION>", &report.solution_name)
        .with("<Release>", &report.release_1.version);
    template.replace_tokens(TITLE_SLIDE, &title)?;

    // The overview and factor slides of one release share a replacement
    // map; both present the same release metadata.
    let release_1 = release_replacements(report, &report.release_1);
    template.replace_tokens(RELEASE_1_OVERVIEW, &release_1)?;
    template.update_counts(RELEASE_1_OVERVIEW, &report.release_1.counts, total)?;

    template.replace_tokens(RELEASE_1_FACTORS, &release_1)?;
    template.fill_bullets(
        RELEASE_1_FACTORS,
        LOWERING_PLACEHOLDER,
        &report.release_1.lowering_points,
    )?;
    template.fill_bullets(
        RELEASE_1_FACTORS,
        INCREASING_PLACEHOLDER,
        &report.release_1.increasing_points,
    )?;

    let release_2 = release_replacements(report, &report.release_2);
    template.replace_tokens(RELEASE_2_OVERVIEW, &release_2)?;
    template.update_counts(RELEASE_2_OVERVIEW, &report.release_2.counts, total)?;

    template.replace_tokens(RELEASE_2_FACTORS, &release_2)?;
    template.fill_bullets(
        RELEASE_2_FACTORS,
        LOWERING_PLACEHOLDER,
        &report.release_2.lowering_points,
    )?;
    template.fill_bullets(
        RELEASE_2_FACTORS,
        INCREASING_PLACEHOLDER,
        &report.release_2.increasing_points,
    )?;

    let summary = Replacements::new()
        .with("<#>", total.to_string())
        .with("<SOLUTION>", &report.solution_name)
        .with(
            "<PRODDELs>",
            format!("{},{}", report.release_1.key, report.release_2.key),
        );
    template.replace_tokens(SUMMARY_SLIDE, &summary)?;

    Ok(())
}

/// The per-release token map used by both slides presenting a release.
///
/// `<#>` is applied before the bare `#`, so the bare-hash pass finds no
/// leftover hash from an already-replaced `<#>`.
fn release_replacements(report: &ReportData, release: &ReleaseSummary) -> Replacements {
    Replacements::new()
        .with("<SOLUTION>", &report.solution_name)
        .with("<Release>", &release.version)
        .with("<Due Date>", &release.due_date)
        .with("<PRODEL Summary>", &release.summary)
        .with("<Overall Confidence>", release.overall.to_string())
        .with("<<VALUE>>", release.overall.to_string())
        .with("<#>", report.total_rows.to_string())
        .with("#", report.total_rows.to_string())
        .with("<Key>", &release.key)
        .with("<KEY>", &release.key)
}
