/// Centralized error handling for sheetload
pub mod excel;
pub mod sheetload;

pub use excel::{ExcelParseError, ExcelResult};
pub use sheetload::{Result, SheetloadError};
