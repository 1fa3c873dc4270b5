use super::Transformed;
use crate::record::{RecordSet, ScalarValue};
use std::collections::HashMap;

/// Fully materialised key → value mapping fetched from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: HashMap<String, ScalarValue>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates overwrite earlier ones, keeping keys unique.
    pub fn insert(&mut self, key: impl Into<String>, value: ScalarValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ScalarValue)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, ScalarValue)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

/// Add `destination` to every row as `lookup[row[source]]`, `Null` when the
/// key is unknown or the source cell is empty.
pub fn enrich(
    records: RecordSet,
    lookup: &LookupTable,
    source: &str,
    destination: &str,
) -> Transformed {
    if !records.has_column(source) {
        return Transformed::skipped(records, "lookup enrichment", source);
    }

    let enriched = records.with_column(destination, |row| {
        RecordSet::cell(row, source)
            .key_text()
            .and_then(|key| lookup.get(&key).cloned())
            .unwrap_or(ScalarValue::Null)
    });
    Transformed::applied(enriched)
}
