//! PostgreSQL store backed by a sqlx pool.
//!
//! The pipeline is synchronous, so the store owns a small tokio runtime and
//! blocks on every query. Transactions map one-to-one onto
//! [`RecordStore::in_transaction`].

use super::sql;
use crate::context::PgSettings;
use sheetload_core::error::Result;
use sheetload_core::store::{
    InsertMode, LookupSource, RecordStore, StoreTransaction, TransactionWork,
};
use sheetload_core::transform::LookupTable;
use sheetload_core::{RecordSet, ScalarValue, SheetloadError};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::collections::HashSet;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

const MAX_CONNECTIONS: u32 = 4;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct PgStore {
    runtime: Runtime,
    pool: PgPool,
}

impl PgStore {
    /// Create the store without opening a connection; the first query does.
    pub fn connect_lazy(settings: &PgSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password);

        let pool = {
            let _guard = runtime.enter();
            PgPoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .connect_lazy_with(options)
        };

        debug!("PostgreSQL pool created for {}", settings.display_url());
        Ok(Self { runtime, pool })
    }

    /// Close every pooled connection.
    pub fn close(&self) {
        self.runtime.block_on(self.pool.close());
        debug!("PostgreSQL pool closed");
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

/// Connection-level failures are reported as an unreachable store.
fn store_error(err: sqlx::Error) -> SheetloadError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => SheetloadError::store_unreachable(err.to_string()),
        other => SheetloadError::store(other.to_string()),
    }
}

impl RecordStore for PgStore {
    fn check_connection(&self) -> bool {
        match self
            .runtime
            .block_on(sqlx::query("SELECT 1").execute(&self.pool))
        {
            Ok(_) => {
                info!("Connection to PostgreSQL OK");
                true
            }
            Err(err) => {
                error!("Connection to PostgreSQL failed: {}", err);
                false
            }
        }
    }

    fn in_transaction(&self, work: &mut TransactionWork<'_>) -> Result<usize> {
        let tx = self
            .runtime
            .block_on(self.pool.begin())
            .map_err(store_error)?;
        let mut pg_tx = PgTransaction {
            runtime: &self.runtime,
            tx,
        };

        match work(&mut pg_tx as &mut dyn StoreTransaction) {
            Ok(written) => {
                self.runtime
                    .block_on(pg_tx.tx.commit())
                    .map_err(store_error)?;
                Ok(written)
            }
            Err(err) => {
                if let Err(rollback) = self.runtime.block_on(pg_tx.tx.rollback()) {
                    error!("Rollback failed: {}", rollback);
                }
                Err(err)
            }
        }
    }
}

impl LookupSource for PgStore {
    fn fetch_lookup(
        &self,
        table: &str,
        key_column: &str,
        value_column: &str,
    ) -> Result<LookupTable> {
        let query = sql::select_lookup(table, key_column, value_column);
        let rows: Vec<(Option<String>, Option<serde_json::Value>)> = self
            .runtime
            .block_on(sqlx::query_as(&query).fetch_all(&self.pool))
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(key, value)| {
                key.map(|key| (key, value.as_ref().map(ScalarValue::from).unwrap_or_default()))
            })
            .collect())
    }
}

struct PgTransaction<'a> {
    runtime: &'a Runtime,
    tx: Transaction<'static, Postgres>,
}

impl PgTransaction<'_> {
    fn execute(&mut self, statement: &str) -> Result<()> {
        self.runtime
            .block_on(sqlx::query(statement).execute(&mut *self.tx))
            .map_err(store_error)?;
        Ok(())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let found: Option<String> = self
            .runtime
            .block_on(
                sqlx::query_scalar("SELECT to_regclass($1)::text")
                    .bind(sql::quote_ident(table))
                    .fetch_one(&mut *self.tx),
            )
            .map_err(store_error)?;
        Ok(found.is_some())
    }
}

impl StoreTransaction for PgTransaction<'_> {
    fn fetch_existing_keys(&mut self, table: &str, key_column: &str) -> Result<HashSet<String>> {
        if !self.table_exists(table)? {
            debug!("Table {} does not exist yet", table);
            return Ok(HashSet::new());
        }

        let query = sql::select_keys(table, key_column);
        let keys: Vec<Option<String>> = self
            .runtime
            .block_on(sqlx::query_scalar(&query).fetch_all(&mut *self.tx))
            .map_err(store_error)?;

        Ok(keys.into_iter().flatten().collect())
    }

    fn insert_rows(&mut self, table: &str, records: &RecordSet, mode: InsertMode) -> Result<()> {
        if mode == InsertMode::Replace {
            self.execute(&sql::drop_table(table))?;
        }
        if records.columns().next().is_none() {
            return Ok(());
        }

        self.execute(&sql::create_table(table, records))?;
        if records.is_empty() {
            return Ok(());
        }

        let statement = sql::insert_from_json(table, records);
        let result = self
            .runtime
            .block_on(
                sqlx::query(&statement)
                    .bind(sqlx::types::Json(records.to_json()))
                    .execute(&mut *self.tx),
            )
            .map_err(store_error)?;

        debug!("{} rows written to {}", result.rows_affected(), table);
        Ok(())
    }

    fn set_primary_key(&mut self, table: &str, column: &str) -> Result<()> {
        self.execute(&sql::add_primary_key(table, column))?;
        info!("Primary key {}({}) added", table, column);
        Ok(())
    }
}
