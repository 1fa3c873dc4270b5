//! Collaborator contracts the pipeline relies on.
//!
//! The core never touches files or databases directly: extraction, lookup
//! tables and the target store are reached through these traits.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::Result;
use crate::record::RecordSet;
use crate::transform::LookupTable;
use std::collections::HashSet;

/// How rows reach the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Add rows to the table, creating it if needed.
    Append,
    /// Drop and recreate the table from the given rows.
    Replace,
}

/// Source of the combined spreadsheet records.
pub trait RecordSource: Send + Sync {
    /// All source rows concatenated. An empty set when nothing was found.
    fn fetch_combined_records(&self) -> Result<RecordSet>;
}

/// Source of key → value lookup tables.
pub trait LookupSource: Send + Sync {
    fn fetch_lookup(&self, table: &str, key_column: &str, value_column: &str)
    -> Result<LookupTable>;
}

/// Operations available inside one store transaction.
pub trait StoreTransaction {
    /// Canonical key text (see `ScalarValue::key_text`) of every stored key.
    /// A table that does not exist yet has no keys.
    fn fetch_existing_keys(&mut self, table: &str, key_column: &str) -> Result<HashSet<String>>;

    fn insert_rows(&mut self, table: &str, records: &RecordSet, mode: InsertMode) -> Result<()>;

    /// Declare `column` as the primary key of an existing `table`. Fails when
    /// the stored values are null or not unique.
    fn set_primary_key(&mut self, table: &str, column: &str) -> Result<()>;
}

/// Unit of work run inside a transaction; returns the number of rows written.
pub type TransactionWork<'a> = dyn FnMut(&mut dyn StoreTransaction) -> Result<usize> + 'a;

/// Target relational store.
pub trait RecordStore: Send + Sync {
    /// Trivial liveness probe.
    fn check_connection(&self) -> bool;

    /// Run `work` in one transaction: committed on `Ok`, rolled back on `Err`.
    fn in_transaction(&self, work: &mut TransactionWork<'_>) -> Result<usize>;

    /// Single insert in its own transaction.
    fn insert_rows(&self, table: &str, records: &RecordSet, mode: InsertMode) -> Result<()> {
        self.in_transaction(&mut |tx| {
            tx.insert_rows(table, records, mode)?;
            Ok(records.len())
        })
        .map(|_| ())
    }

    /// Primary key declaration in its own transaction.
    fn set_primary_key(&self, table: &str, column: &str) -> Result<()> {
        self.in_transaction(&mut |tx| {
            tx.set_primary_key(table, column)?;
            Ok(0)
        })
        .map(|_| ())
    }
}
