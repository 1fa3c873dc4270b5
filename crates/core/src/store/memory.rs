use super::{InsertMode, LookupSource, RecordStore, StoreTransaction, TransactionWork};
use crate::error::{Result, SheetloadError};
use crate::record::RecordSet;
use crate::transform::LookupTable;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    records: RecordSet,
    primary_key: Option<String>,
}

/// In-process store with transactional semantics.
///
/// Work runs against a copy of the tables, published only when it
/// succeeds. `set_online(false)` makes every call fail as unreachable.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, MemoryTable>>,
    online: AtomicBool,
    inserts: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Store pre-populated with `table`.
    pub fn with_table(self, table: &str, records: RecordSet) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(
                table.to_string(),
                MemoryTable {
                    records,
                    primary_key: None,
                },
            );
        }
        self
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Snapshot of a table's rows.
    pub fn table(&self, table: &str) -> Option<RecordSet> {
        self.lock().ok()?.get(table).map(|t| t.records.clone())
    }

    pub fn primary_key(&self, table: &str) -> Option<String> {
        self.lock().ok()?.get(table).and_then(|t| t.primary_key.clone())
    }

    /// Number of insert calls that reached the store.
    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, MemoryTable>>> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(SheetloadError::store_unreachable("memory store is offline"));
        }
        self.tables
            .lock()
            .map_err(|_| SheetloadError::store("memory store lock poisoned"))
    }
}

struct MemoryTransaction<'a> {
    tables: HashMap<String, MemoryTable>,
    inserts: &'a AtomicUsize,
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn fetch_existing_keys(&mut self, table: &str, key_column: &str) -> Result<HashSet<String>> {
        let Some(existing) = self.tables.get(table) else {
            return Ok(HashSet::new());
        };
        if !existing.records.has_column(key_column) && !existing.records.is_empty() {
            return Err(SheetloadError::store(format!(
                "column \"{key_column}\" does not exist in \"{table}\""
            )));
        }
        Ok(existing
            .records
            .iter()
            .filter_map(|row| RecordSet::cell(row, key_column).key_text())
            .collect())
    }

    fn insert_rows(&mut self, table: &str, records: &RecordSet, mode: InsertMode) -> Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        match mode {
            InsertMode::Replace => {
                self.tables.insert(
                    table.to_string(),
                    MemoryTable {
                        records: records.clone(),
                        primary_key: None,
                    },
                );
            }
            InsertMode::Append => {
                let entry = self.tables.entry(table.to_string()).or_default();
                if let Some(pk) = &entry.primary_key {
                    let mut seen: HashSet<String> = entry
                        .records
                        .iter()
                        .filter_map(|row| RecordSet::cell(row, pk).key_text())
                        .collect();
                    for row in records {
                        let key = RecordSet::cell(row, pk).key_text().ok_or_else(|| {
                            SheetloadError::store(format!("null value in primary key \"{pk}\""))
                        })?;
                        if !seen.insert(key.clone()) {
                            return Err(SheetloadError::store(format!(
                                "duplicate key value violates primary key \"{pk}\": {key}"
                            )));
                        }
                    }
                }
                let current = std::mem::take(&mut entry.records);
                entry.records = current.concat(records.clone());
            }
        }
        Ok(())
    }

    fn set_primary_key(&mut self, table: &str, column: &str) -> Result<()> {
        let entry = self
            .tables
            .get_mut(table)
            .ok_or_else(|| SheetloadError::store(format!("relation \"{table}\" does not exist")))?;

        let mut seen = HashSet::new();
        for row in &entry.records {
            let key = RecordSet::cell(row, column).key_text().ok_or_else(|| {
                SheetloadError::store(format!("column \"{column}\" contains null values"))
            })?;
            if !seen.insert(key.clone()) {
                return Err(SheetloadError::store(format!(
                    "could not create primary key \"{column}\": duplicate value {key}"
                )));
            }
        }
        entry.primary_key = Some(column.to_string());
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn check_connection(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn in_transaction(&self, work: &mut TransactionWork<'_>) -> Result<usize> {
        let mut tables = self.lock()?;
        let mut tx = MemoryTransaction {
            tables: tables.clone(),
            inserts: &self.inserts,
        };
        let written = work(&mut tx as &mut dyn StoreTransaction)?;
        *tables = tx.tables;
        Ok(written)
    }
}

impl LookupSource for MemoryStore {
    fn fetch_lookup(
        &self,
        table: &str,
        key_column: &str,
        value_column: &str,
    ) -> Result<LookupTable> {
        let tables = self.lock()?;
        let Some(source) = tables.get(table) else {
            return Err(SheetloadError::store(format!(
                "relation \"{table}\" does not exist"
            )));
        };
        Ok(source
            .records
            .iter()
            .filter_map(|row| {
                let key = RecordSet::cell(row, key_column).key_text()?;
                Some((key, RecordSet::cell(row, value_column).clone()))
            })
            .collect())
    }
}
