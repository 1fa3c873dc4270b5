use super::Transformed;
use crate::config::constants::{
    BUSINESS_UNIT_COLUMN, PROYECTO_COLUMN, PROYECTO_HEAD_LEN, PROYECTO_PREFIX,
};
use crate::record::{RecordSet, ScalarValue};

/// Source and destination columns of the project rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveConfig {
    pub source_column: String,
    pub target_column: String,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            source_column: BUSINESS_UNIT_COLUMN.to_string(),
            target_column: PROYECTO_COLUMN.to_string(),
        }
    }
}

/// Project code for a business unit text.
///
/// A non-empty, all-digit head (up to the first four characters) becomes
/// `PY_00<head>`; anything else is returned unchanged.
pub fn derive_proyecto(text: &str) -> String {
    let head: String = text.chars().take(PROYECTO_HEAD_LEN).collect();
    if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
        format!("{PROYECTO_PREFIX}{head}")
    } else {
        text.to_string()
    }
}

/// Apply [`derive_proyecto`] to every row of `records`.
pub fn derive_proyecto_column(records: RecordSet, config: &DeriveConfig) -> Transformed {
    if !records.has_column(&config.source_column) {
        return Transformed::skipped(records, "proyecto derivation", &config.source_column);
    }

    let derived = records.with_column(&config.target_column, |row| {
        let text = RecordSet::cell(row, &config.source_column).to_text();
        ScalarValue::Text(derive_proyecto(&text))
    });
    Transformed::applied(derived)
}
