//! Error types for confidence report generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading survey data or filling the template.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// A required survey column is absent from the workbook header row.
    #[error("Required column not found in workbook: {0:?}")]
    MissingColumn(String),

    /// The survey workbook contains no data rows.
    #[error("Survey workbook contains no responses")]
    EmptyTable,

    /// Failed to read the spreadsheet structure.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// A slide index beyond the template's slide count was requested.
    #[error("Slide index {index} out of range (template has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },

    /// A part (inner file) is missing from the template archive.
    #[error("Part not found in template archive: {0}")]
    PartNotFound(String),

    /// ZIP archive error (for the PPTX container).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing or rewriting error.
    #[error("XML error: {0}")]
    Xml(String),
}
