//! Survey workbook loading.
//!
//! Maps the workbook's named columns onto the strongly-typed [`SurveyRow`]
//! once at load time, failing fast if a required column is absent.

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use confidence_core::{Error, Result, SurveyRow, SurveyTable};
use std::io::{Read, Seek};
use std::path::Path;

/// Composite release-info column for the first release.
pub const COL_RELEASE_INFO_1: &str = "The Release is of which version?";
/// Composite release-info column for the second release.
pub const COL_RELEASE_INFO_2: &str = "The Release is of which version?2";
/// Confidence-rating column for the first release.
pub const COL_CONFIDENCE_1: &str =
    "How would you rate your confidence in meeting the committed release date of v1?";
/// Confidence-rating column for the second release.
pub const COL_CONFIDENCE_2: &str =
    "How would you rate your confidence in meeting the committed release date?";
/// Lowering-factors column for the first release.
pub const COL_LOWERING_1: &str = "What factors lower your confidence level?";
/// Lowering-factors column for the second release.
pub const COL_LOWERING_2: &str = "What factors lower your confidence level?2";
/// Increasing-factors column for the first release.
pub const COL_INCREASING_1: &str =
    "What resources, support, or actions would help increase your confidence level?";
/// Increasing-factors column for the second release.
pub const COL_INCREASING_2: &str =
    "What resources, support, or actions would help increase your confidence level?2";
/// Respondent name column.
pub const COL_NAME: &str = "Name";

/// Load the survey table from a workbook on disk.
pub fn load_survey<P: AsRef<Path>>(path: P) -> Result<SurveyTable> {
    let mut workbook: Xlsx<_> =
        open_workbook(path.as_ref()).map_err(|e: calamine::XlsxError| Error::Spreadsheet(e.to_string()))?;
    table_from_workbook(&mut workbook)
}

/// Load the survey table from any seekable reader holding XLSX bytes.
pub fn load_survey_from_reader<R: Read + Seek>(reader: R) -> Result<SurveyTable> {
    let mut workbook = Xlsx::new(reader).map_err(|e| Error::Spreadsheet(e.to_string()))?;
    table_from_workbook(&mut workbook)
}

fn table_from_workbook<R: Read + Seek>(workbook: &mut Xlsx<R>) -> Result<SurveyTable> {
    // Responses live on the first worksheet.
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Spreadsheet("workbook has no worksheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| Error::Spreadsheet(e.to_string()))?;
    table_from_range(&range)
}

/// Build the typed table from a cell range whose first row is the header.
pub fn table_from_range(range: &Range<Data>) -> Result<SurveyTable> {
    let mut rows = range.rows();
    let header = rows.next().ok_or(Error::EmptyTable)?;
    let columns = ColumnIndex::resolve(header)?;

    let table = SurveyTable::new(rows.map(|row| columns.map_row(row)).collect());
    log::debug!("Loaded {} survey responses", table.len());
    Ok(table)
}

/// Resolved 0-based index of every required column.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    release_info_1: usize,
    release_info_2: usize,
    confidence_1: usize,
    confidence_2: usize,
    lowering_1: usize,
    lowering_2: usize,
    increasing_1: usize,
    increasing_2: usize,
    name: usize,
}

impl ColumnIndex {
    /// Locate every required column in the header row, or fail with the
    /// name of the first one missing.
    fn resolve(header: &[Data]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|cell| cell_text(cell).trim() == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            release_info_1: find(COL_RELEASE_INFO_1)?,
            release_info_2: find(COL_RELEASE_INFO_2)?,
            confidence_1: find(COL_CONFIDENCE_1)?,
            confidence_2: find(COL_CONFIDENCE_2)?,
            lowering_1: find(COL_LOWERING_1)?,
            lowering_2: find(COL_LOWERING_2)?,
            increasing_1: find(COL_INCREASING_1)?,
            increasing_2: find(COL_INCREASING_2)?,
            name: find(COL_NAME)?,
        })
    }

    fn map_row(&self, row: &[Data]) -> SurveyRow {
        let cell = |idx: usize| row.get(idx).map(cell_text).unwrap_or_default();

        SurveyRow {
            release_info_1: cell(self.release_info_1),
            release_info_2: cell(self.release_info_2),
            confidence_1: cell(self.confidence_1),
            confidence_2: cell(self.confidence_2),
            lowering_1: cell(self.lowering_1),
            lowering_2: cell(self.lowering_2),
            increasing_1: cell(self.increasing_1),
            increasing_2: cell(self.increasing_2),
            respondent: cell(self.name),
        }
    }
}

/// Render a cell as text. Empty cells become empty strings; whole-number
/// floats drop the trailing `.0` Excel would otherwise leak into the report.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_COLUMNS: [&str; 9] = [
        COL_RELEASE_INFO_1,
        COL_RELEASE_INFO_2,
        COL_CONFIDENCE_1,
        COL_CONFIDENCE_2,
        COL_LOWERING_1,
        COL_LOWERING_2,
        COL_INCREASING_1,
        COL_INCREASING_2,
        COL_NAME,
    ];

    fn survey_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (3, 8));
        for (col, name) in ALL_COLUMNS.iter().enumerate() {
            range.set_value((0, col as u32), Data::String((*name).to_string()));
        }
        for (row, (conf, name)) in [("high", "Avery"), ("High ", "Blake"), ("low", "Carol")]
            .iter()
            .enumerate()
        {
            let r = (row + 1) as u32;
            range.set_value(
                (r, 0),
                Data::String("v1.2, 2025-08-01, extra, Summary 45".to_string()),
            );
            range.set_value((r, 1), Data::String("v2.0, 2025-12-01, Next 7".to_string()));
            range.set_value((r, 2), Data::String((*conf).to_string()));
            range.set_value((r, 3), Data::String("medium".to_string()));
            range.set_value((r, 8), Data::String((*name).to_string()));
        }
        range
    }

    #[test]
    fn loads_rows_with_typed_fields() {
        let table = table_from_range(&survey_range()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].respondent, "Avery");
        assert_eq!(table.rows[2].confidence_1, "low");
        // Unset cells come back as empty strings, not errors.
        assert_eq!(table.rows[0].lowering_1, "");
    }

    #[test]
    fn missing_column_fails_with_its_name() {
        let mut range = Range::new((0, 0), (1, 7));
        for (col, name) in ALL_COLUMNS.iter().take(8).enumerate() {
            range.set_value((0, col as u32), Data::String((*name).to_string()));
        }

        match table_from_range(&range) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, COL_NAME),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn header_matching_ignores_surrounding_whitespace() {
        let mut range = Range::new((0, 0), (1, 8));
        for (col, name) in ALL_COLUMNS.iter().enumerate() {
            range.set_value((0, col as u32), Data::String(format!(" {} ", name)));
        }
        range.set_value((1, 8), Data::String("Avery".to_string()));

        let table = table_from_range(&range).unwrap();
        assert_eq!(table.rows[0].respondent, "Avery");
    }

    #[test]
    fn numeric_cells_render_without_trailing_zero() {
        assert_eq!(cell_text(&Data::Float(45.0)), "45");
        assert_eq!(cell_text(&Data::Float(4.5)), "4.5");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
