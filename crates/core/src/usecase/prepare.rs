//! "Prepare records for load": extraction, lookup enrichment and the
//! project classification column, in that order.

use crate::error::Result;
use crate::record::RecordSet;
use crate::store::{LookupSource, RecordSource};
use crate::transform::{DeriveConfig, derive_proyecto_column, enrich};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the foreign-key lookup comes from and which columns it joins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LookupConfig {
    /// Lookup table in the store
    pub table: String,
    /// Column of the lookup table matched against the records
    #[serde(alias = "key_col")]
    pub key_column: String,
    /// Column of the lookup table copied into the records
    #[serde(alias = "value_col")]
    pub value_column: String,
    /// Record column holding the lookup key
    #[serde(alias = "source_key_col")]
    pub source_column: String,
    /// Record column receiving the looked-up value
    #[serde(alias = "new_col")]
    pub destination_column: String,
}

pub struct PrepareRecords {
    source: Arc<dyn RecordSource>,
    lookup_source: Arc<dyn LookupSource>,
    lookup: Option<LookupConfig>,
    derive: DeriveConfig,
}

impl PrepareRecords {
    pub fn new(source: Arc<dyn RecordSource>, lookup_source: Arc<dyn LookupSource>) -> Self {
        Self {
            source,
            lookup_source,
            lookup: None,
            derive: DeriveConfig::default(),
        }
    }

    /// Enable lookup enrichment. `None` leaves it disabled.
    pub fn with_lookup(mut self, lookup: Option<LookupConfig>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_derive(mut self, derive: DeriveConfig) -> Self {
        self.derive = derive;
        self
    }

    /// Combined records, enriched and classified, ready to load.
    pub fn prepare(&self) -> Result<RecordSet> {
        let records = self.source.fetch_combined_records()?;
        info!("{} rows extracted", records.len());

        if records.is_empty() {
            warn!("Combined record set is empty, skipping enrichment");
            return Ok(records);
        }

        let records = self.enrich_with_lookup(records)?;
        let mut records = derive_proyecto_column(records, &self.derive).into_records();
        records.normalize();
        Ok(records)
    }

    fn enrich_with_lookup(&self, records: RecordSet) -> Result<RecordSet> {
        let Some(cfg) = &self.lookup else {
            debug!("No lookup configured");
            return Ok(records);
        };

        let lookup =
            self.lookup_source
                .fetch_lookup(&cfg.table, &cfg.key_column, &cfg.value_column)?;
        debug!("Lookup {} loaded with {} entries", cfg.table, lookup.len());

        Ok(enrich(records, &lookup, &cfg.source_column, &cfg.destination_column).into_records())
    }
}
