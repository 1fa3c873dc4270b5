//! Command entry points shared by the CLI: assemble the ETL pipeline from
//! settings and run it.

use crate::context::Settings;
use crate::io::ExcelDirectorySource;
use crate::store::PgStore;
use sheetload_core::error::{Result, SheetloadError};
use sheetload_core::load::LoadReport;
use sheetload_core::pipeline::steps::{
    CheckConnectionStep, ExtractRecordsStep, LoadStrategy, StoreRecordsStep,
};
use sheetload_core::pipeline::{LOAD_REPORT, Pipeline, PipelineBuilder, PipelineContext};
use sheetload_core::store::{LookupSource, MemoryStore, RecordSource, RecordStore};
use sheetload_core::usecase::PrepareRecords;
use std::sync::Arc;
use tracing::{info, warn};

pub const ETL_PIPELINE_NAME: &str = "excel_to_postgres";

/// Options of the `run` command that are not part of [`Settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Drop and recreate the target table
    pub replace: bool,
    /// Write into an in-memory store instead of the target table
    pub dry_run: bool,
}

/// Collaborators wired into the ETL pipeline.
pub struct EtlComponents {
    pub source: Arc<dyn RecordSource>,
    pub lookups: Arc<dyn LookupSource>,
    /// Store probed by the preflight check
    pub store: Arc<dyn RecordStore>,
    /// Store the records are written to
    pub target: Arc<dyn RecordStore>,
}

pub fn load_strategy(settings: &Settings, replace: bool) -> LoadStrategy {
    if replace {
        LoadStrategy::Replace {
            primary_key: settings.primary_key.clone(),
        }
    } else {
        LoadStrategy::from_primary_key(settings.primary_key.clone())
    }
}

/// Check → extract/prepare → store.
pub fn build_etl_pipeline(
    settings: &Settings,
    components: EtlComponents,
    strategy: LoadStrategy,
) -> Result<Pipeline> {
    let prepare = PrepareRecords::new(components.source, components.lookups)
        .with_lookup(settings.lookup.clone());

    PipelineBuilder::new(ETL_PIPELINE_NAME)
        .add_step(CheckConnectionStep::new(components.store))
        .add_step(ExtractRecordsStep::new(prepare))
        .add_step(StoreRecordsStep::new(
            components.target,
            settings.target_table.clone(),
            strategy,
        ))
        .build()
}

/// Execute a pipeline built by [`build_etl_pipeline`] and return its report.
pub fn execute_etl(pipeline: &Pipeline) -> Result<LoadReport> {
    let mut context = pipeline.execute(PipelineContext::new())?;
    context
        .remove_typed(LOAD_REPORT)
        .ok_or_else(|| SheetloadError::missing_input(LOAD_REPORT.name()))
}

/// Run the full ETL against PostgreSQL.
pub fn run_command(settings: &Settings, options: RunOptions) -> Result<LoadReport> {
    info!(
        "Loading '{}' sheets from {} into {} ({})",
        settings.excel.sheet_name,
        settings.excel.input_path.display(),
        settings.target_table,
        settings.pg.display_url()
    );

    let pg = Arc::new(PgStore::connect_lazy(&settings.pg)?);
    let source = Arc::new(ExcelDirectorySource::new(
        settings.excel.input_path.clone(),
        settings.excel.sheet_name.clone(),
    ));
    let target: Arc<dyn RecordStore> = if options.dry_run {
        warn!("Dry run: records are not written to PostgreSQL");
        Arc::new(MemoryStore::new())
    } else {
        pg.clone()
    };

    let components = EtlComponents {
        source,
        lookups: pg.clone(),
        store: pg.clone(),
        target,
    };
    let pipeline = build_etl_pipeline(
        settings,
        components,
        load_strategy(settings, options.replace),
    )?;

    let result = execute_etl(&pipeline);
    pg.close();

    let report = result?;
    info!(
        "Load finished: {} inserted into {}, {} already present, {} without key ({} candidates)",
        report.inserted,
        report.table,
        report.skipped_existing,
        report.skipped_null_keys,
        report.candidates
    );
    Ok(report)
}

/// Preflight check only.
pub fn check_command(settings: &Settings) -> Result<()> {
    let pg = Arc::new(PgStore::connect_lazy(&settings.pg)?);
    let pipeline = PipelineBuilder::new("check_connection")
        .add_step(CheckConnectionStep::new(pg.clone()))
        .build()?;

    let result = pipeline.execute(PipelineContext::new()).map(|_| ());
    pg.close();
    result
}
