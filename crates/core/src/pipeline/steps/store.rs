use crate::error::{Result, SheetloadError};
use crate::load::{LoadReport, load_append, load_incremental, load_replace};
use crate::pipeline::{EXCEL_RECORDS, LOAD_REPORT, PipelineContext, Step, TypedKey};
use crate::record::RecordSet;
use crate::store::RecordStore;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::warn;

/// How the store step writes its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Insert only rows whose key is not stored yet
    Incremental { primary_key: String },
    /// Insert every row
    Append,
    /// Recreate the table, optionally declaring a primary key
    Replace { primary_key: Option<String> },
}

impl LoadStrategy {
    /// Incremental when a primary key is configured, plain append otherwise.
    pub fn from_primary_key(primary_key: Option<String>) -> Self {
        match primary_key {
            Some(primary_key) => LoadStrategy::Incremental { primary_key },
            None => LoadStrategy::Append,
        }
    }
}

/// Load node - writes the record set found under its context key
pub struct StoreRecordsStep {
    store: Arc<dyn RecordStore>,
    input: TypedKey<RecordSet>,
    table: String,
    strategy: LoadStrategy,
    convert_structured: bool,
}

impl StoreRecordsStep {
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>, strategy: LoadStrategy) -> Self {
        Self {
            store,
            input: EXCEL_RECORDS,
            table: table.into(),
            strategy,
            convert_structured: false,
        }
    }

    pub fn with_input(mut self, input: TypedKey<RecordSet>) -> Self {
        self.input = input;
        self
    }

    /// Accept a JSON value under the input key and convert it to records
    pub fn convert_structured(mut self, enabled: bool) -> Self {
        self.convert_structured = enabled;
        self
    }

    fn records<'a>(&self, context: &'a PipelineContext) -> Result<Cow<'a, RecordSet>> {
        let key = self.input.name();
        if let Some(records) = context.get_typed(self.input) {
            return Ok(Cow::Borrowed(records));
        }
        if self.convert_structured {
            let json_key = TypedKey::<serde_json::Value>::new(key);
            if let Some(value) = context.get_typed(json_key) {
                return RecordSet::from_json(value).map(Cow::Owned);
            }
        }
        Err(SheetloadError::unexpected_context_type(key))
    }

    fn load(&self, records: &RecordSet) -> Result<LoadReport> {
        let store = self.store.as_ref();
        match &self.strategy {
            LoadStrategy::Incremental { primary_key } => {
                load_incremental(store, &self.table, records, primary_key)
            }
            LoadStrategy::Append => load_append(store, &self.table, records),
            LoadStrategy::Replace { primary_key } => {
                load_replace(store, &self.table, records, primary_key.as_deref())
            }
        }
    }
}

impl Step for StoreRecordsStep {
    fn name(&self) -> String {
        format!("StoreRecords({})", self.table)
    }

    fn inputs(&self) -> Vec<String> {
        vec![self.input.name().to_string()]
    }

    fn outputs(&self) -> Vec<String> {
        vec![LOAD_REPORT.name().to_string()]
    }

    fn run(&self, mut context: PipelineContext) -> Result<PipelineContext> {
        if !context.contains(self.input.name()) {
            warn!("Context has no key {}", self.input.name());
            return Ok(context);
        }
        let report = {
            let records = self.records(&context)?;
            self.load(&records)?
        };
        context.insert_typed(LOAD_REPORT, report);
        Ok(context)
    }
}
