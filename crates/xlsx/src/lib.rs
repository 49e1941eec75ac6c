//! XLSX survey workbook loader.
//!
//! Reads the survey responses with calamine and maps the named columns
//! onto the core's strongly-typed rows.

pub mod loader;

pub use loader::{load_survey, load_survey_from_reader, table_from_range};
