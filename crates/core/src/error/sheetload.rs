/// Unified error type for sheetload
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetloadError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel parsing error: {0}")]
    Excel(#[from] crate::error::ExcelParseError),

    // Configuration errors
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Column '{column}' not found in record set ({context})")]
    MissingColumn { column: String, context: String },

    #[error("Unexpected data type for context key '{0}'")]
    UnexpectedContextType(String),

    // Store errors
    #[error("Store unreachable: {0}")]
    StoreUnreachable(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias using SheetloadError
pub type Result<T> = std::result::Result<T, SheetloadError>;

impl SheetloadError {
    /// Create a missing input error
    pub fn missing_input(name: impl Into<String>) -> Self {
        Self::MissingInput(name.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn missing_column(column: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            context: context.into(),
        }
    }

    pub fn unexpected_context_type(key: impl Into<String>) -> Self {
        Self::UnexpectedContextType(key.into())
    }

    pub fn store_unreachable(msg: impl Into<String>) -> Self {
        Self::StoreUnreachable(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
