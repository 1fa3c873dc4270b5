//! Constants for sheetload

use std::path::PathBuf;
use std::sync::OnceLock;

/// Full path of the executable file
pub static EXECUTABLE_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Column the project classification is derived from
pub const BUSINESS_UNIT_COLUMN: &str = "Unidad de negocio";

/// Derived project classification column
pub const PROYECTO_COLUMN: &str = "proyecto";

/// Prefix for project codes derived from a numeric business unit
pub const PROYECTO_PREFIX: &str = "PY_00";

/// Number of leading characters inspected by the project rule
pub const PROYECTO_HEAD_LEN: usize = 4;

/// Supported spreadsheet extensions
pub const EXCEL_EXTENSIONS: &[&str] = &["xlsx"];

/// Record the executable location; later calls keep the first value.
pub fn init_constants() {
    if let Ok(exe_path) = std::env::current_exe() {
        let _ = EXECUTABLE_PATH.set(exe_path);
    }
}
