//! Loading record sets into the target store.
//!
//! The incremental strategy is a snapshot-read, filter, insert sequence run
//! inside one store transaction. It is not an atomic upsert: another writer
//! can still insert the same key between the read and the insert.

use crate::error::{Result, SheetloadError};
use crate::record::RecordSet;
use crate::store::{InsertMode, RecordStore};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of one load call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub table: String,
    pub candidates: usize,
    pub inserted: usize,
    pub skipped_existing: usize,
    pub skipped_null_keys: usize,
}

impl LoadReport {
    fn empty(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }
}

/// Insert only the rows whose `primary_key` is not already in `table`.
///
/// Existing keys are read fresh on every call. Rows with a `Null` key are
/// skipped. Duplicates within `records` itself are left to the store.
pub fn load_incremental(
    store: &dyn RecordStore,
    table: &str,
    records: &RecordSet,
    primary_key: &str,
) -> Result<LoadReport> {
    if records.is_empty() {
        info!("No records to insert into {}", table);
        return Ok(LoadReport::empty(table));
    }
    if !records.has_column(primary_key) {
        return Err(SheetloadError::missing_column(
            primary_key,
            format!("primary key for {table}"),
        ));
    }

    let mut report = LoadReport {
        table: table.to_string(),
        candidates: records.len(),
        ..LoadReport::default()
    };

    let inserted = store.in_transaction(&mut |tx| {
        let existing = tx.fetch_existing_keys(table, primary_key)?;
        debug!("{} existing keys in {}", existing.len(), table);

        let mut null_keys = 0;
        let fresh = records.clone().retain(|row| {
            match RecordSet::cell(row, primary_key).key_text() {
                Some(key) => !existing.contains(&key),
                None => {
                    null_keys += 1;
                    false
                }
            }
        });
        report.skipped_null_keys = null_keys;

        if fresh.is_empty() {
            return Ok(0);
        }
        tx.insert_rows(table, &fresh, InsertMode::Append)?;
        Ok(fresh.len())
    })?;

    report.inserted = inserted;
    report.skipped_existing = report.candidates - inserted - report.skipped_null_keys;

    if report.skipped_null_keys > 0 {
        warn!(
            "Skipped {} rows with empty primary key '{}'",
            report.skipped_null_keys, primary_key
        );
    }
    if inserted > 0 {
        info!("Inserted {} new rows into {}", inserted, table);
    } else {
        info!("No new rows for {}", table);
    }
    Ok(report)
}

/// Insert every row with no existence check.
pub fn load_append(store: &dyn RecordStore, table: &str, records: &RecordSet) -> Result<LoadReport> {
    if records.is_empty() {
        info!("No records to insert into {}", table);
        return Ok(LoadReport::empty(table));
    }
    store.insert_rows(table, records, InsertMode::Append)?;
    info!("Appended {} rows to {}", records.len(), table);
    Ok(LoadReport {
        table: table.to_string(),
        candidates: records.len(),
        inserted: records.len(),
        ..LoadReport::default()
    })
}

/// Recreate `table` from `records`, optionally declaring a primary key.
///
/// Drop, create, insert and key declaration commit together. An empty
/// `records` leaves the table untouched.
pub fn load_replace(
    store: &dyn RecordStore,
    table: &str,
    records: &RecordSet,
    primary_key: Option<&str>,
) -> Result<LoadReport> {
    if records.is_empty() {
        warn!("No records to replace {} with, table left unchanged", table);
        return Ok(LoadReport::empty(table));
    }
    if let Some(pk) = primary_key {
        if !records.has_column(pk) {
            return Err(SheetloadError::missing_column(
                pk,
                format!("primary key for {table}"),
            ));
        }
    }

    let inserted = store.in_transaction(&mut |tx| {
        tx.insert_rows(table, records, InsertMode::Replace)?;
        if let Some(pk) = primary_key {
            tx.set_primary_key(table, pk)?;
        }
        Ok(records.len())
    })?;

    info!("Replaced {} with {} rows", table, inserted);
    Ok(LoadReport {
        table: table.to_string(),
        candidates: records.len(),
        inserted,
        ..LoadReport::default()
    })
}
