use calamine::XlsxError;
/// Spreadsheet parsing error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExcelParseError {
    #[error("Failed to open Excel file: {0}")]
    FileError(#[from] XlsxError),
    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),
}

/// Result type alias for spreadsheet parsing operations
pub type ExcelResult<T> = Result<T, ExcelParseError>;
