//! Pure record-set transforms: lookup enrichment and the project rule.

pub mod lookup;
pub mod proyecto;

pub use lookup::{LookupTable, enrich};
pub use proyecto::{DeriveConfig, derive_proyecto, derive_proyecto_column};

use crate::record::RecordSet;
use std::fmt;

/// Non-fatal configuration problem found while transforming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformWarning {
    /// An expected column is absent; the transform was skipped.
    MissingColumn {
        transform: &'static str,
        column: String,
    },
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformWarning::MissingColumn { transform, column } => {
                write!(f, "{transform}: column '{column}' not found, transform skipped")
            }
        }
    }
}

/// Output of a transform: the resulting set plus an optional warning.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub records: RecordSet,
    pub warning: Option<TransformWarning>,
}

impl Transformed {
    pub fn applied(records: RecordSet) -> Self {
        Self {
            records,
            warning: None,
        }
    }

    pub fn skipped(records: RecordSet, transform: &'static str, column: &str) -> Self {
        Self {
            records,
            warning: Some(TransformWarning::MissingColumn {
                transform,
                column: column.to_string(),
            }),
        }
    }

    /// Log the warning, if any, and hand back the records.
    pub fn into_records(self) -> RecordSet {
        if let Some(warning) = &self.warning {
            tracing::warn!("{}", warning);
        }
        self.records
    }
}
