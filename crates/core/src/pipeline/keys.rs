use crate::load::LoadReport;
use crate::record::RecordSet;
/// Type-safe keys for PipelineContext
use std::marker::PhantomData;

/// A type-safe key for PipelineContext that enforces compile-time type checking
pub struct TypedKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> TypedKey<T> {
    /// Create a new typed key with a static name
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// Get the key name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> {}

impl<T> std::fmt::Debug for TypedKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypedKey({})", self.name)
    }
}

/// Prepared spreadsheet records, ready to load
pub const EXCEL_RECORDS: TypedKey<RecordSet> = TypedKey::new("excel_records");

/// Structured (JSON) payload under the same key, accepted by load steps
/// configured to convert it
pub const EXCEL_RECORDS_JSON: TypedKey<serde_json::Value> = TypedKey::new("excel_records");

/// Report of the last load step
pub const LOAD_REPORT: TypedKey<LoadReport> = TypedKey::new("load_report");
