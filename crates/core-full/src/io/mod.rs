pub mod collector;
pub mod filters;

pub use collector::FileCollector;
pub use filters::{ExtensionFilter, FileFilter};

use sheetload_core::config::constants::EXCEL_EXTENSIONS;
use sheetload_core::error::Result;
use sheetload_core::excel::ExcelParser;
use sheetload_core::store::RecordSource;
use sheetload_core::RecordSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Reads every `.xlsx` file of a directory and stacks the rows of one
/// named sheet.
#[derive(Debug, Clone)]
pub struct ExcelDirectorySource {
    base_path: PathBuf,
    sheet_name: String,
}

impl ExcelDirectorySource {
    pub fn new(base_path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Spreadsheet files that would be read, in read order.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.base_path.is_dir() {
            return Ok(Vec::new());
        }
        FileCollector::new(ExtensionFilter::new(EXCEL_EXTENSIONS)).collect(&self.base_path)
    }
}

impl RecordSource for ExcelDirectorySource {
    fn fetch_combined_records(&self) -> Result<RecordSet> {
        let files = self.files()?;
        if files.is_empty() {
            warn!(
                "No spreadsheet files found in {}",
                self.base_path.display()
            );
            return Ok(RecordSet::new());
        }

        let mut combined = RecordSet::new();
        for path in &files {
            debug!("Reading sheet '{}' from {}", self.sheet_name, path.display());
            let bytes = std::fs::read(path)?;
            let records = ExcelParser::parse_from_bytes(bytes, &self.sheet_name)?;
            info!("{}: {} rows", path.display(), records.len());
            combined = combined.concat(records);
        }

        info!(
            "Extracted {} rows from {} file(s)",
            combined.len(),
            files.len()
        );
        Ok(combined)
    }
}
