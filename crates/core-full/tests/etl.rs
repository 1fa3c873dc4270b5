// The assembled ETL pipeline over fixture workbooks and the in-memory store
mod common;

use sheetload_core::load::LoadReport;
use sheetload_core::pipeline::steps::LoadStrategy;
use sheetload_core::store::MemoryStore;
use sheetload_core::usecase::LookupConfig;
use sheetload_core::{RecordSet, ScalarValue, SheetloadError, row};
use sheetload_core_full::commands::{
    build_etl_pipeline, execute_etl, load_strategy, EtlComponents, ETL_PIPELINE_NAME,
};
use sheetload_core_full::io::ExcelDirectorySource;
use sheetload_core_full::Settings;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn settings(input: &Path, primary_key: Option<&str>) -> Settings {
    let input = input.to_string_lossy().into_owned();
    let primary_key = primary_key.map(str::to_string);
    Settings::from_vars(
        |name| match name {
            "EXCEL_INPUT_PATH" => Some(input.clone()),
            "ETL_TARGET_TABLE" => Some("facturas".to_string()),
            "ETL_PRIMARY_KEY" => primary_key.clone(),
            _ => None,
        },
        Path::new("does/not/exist.yaml"),
    )
    .unwrap()
}

fn empresas() -> RecordSet {
    RecordSet::from_rows([
        row! { "nombre" => "Acme", "id" => 10 },
        row! { "nombre" => "Globex", "id" => 20 },
    ])
}

fn run(
    settings: &Settings,
    store: &Arc<MemoryStore>,
    strategy: LoadStrategy,
) -> sheetload_core::Result<LoadReport> {
    let components = EtlComponents {
        source: Arc::new(ExcelDirectorySource::new(
            settings.excel.input_path.clone(),
            settings.excel.sheet_name.clone(),
        )),
        lookups: store.clone(),
        store: store.clone(),
        target: store.clone(),
    };
    let pipeline = build_etl_pipeline(settings, components, strategy)?;
    assert_eq!(pipeline.name(), ETL_PIPELINE_NAME);
    execute_etl(&pipeline)
}

fn input() -> TempDir {
    common::input_dir(&["facturas_enero.xlsx", "facturas_febrero.xlsx"])
}

#[test]
fn test_incremental_run_is_idempotent() {
    let dir = input();
    let settings = settings(dir.path(), Some("Factura"));
    let store = Arc::new(MemoryStore::new());

    let first = run(&settings, &store, load_strategy(&settings, false)).unwrap();
    assert_eq!(first.candidates, 4);
    assert_eq!(first.inserted, 4);

    let second = run(&settings, &store, load_strategy(&settings, false)).unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped_existing, 4);

    let stored = store.table("facturas").unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored.value(0, "proyecto"), &ScalarValue::from("PY_002427"));
    assert_eq!(stored.value(1, "proyecto"), &ScalarValue::from("RETAIL"));
    assert_eq!(stored.value(2, "proyecto"), &ScalarValue::from(""));
    assert_eq!(stored.value(3, "proyecto"), &ScalarValue::from("PY_003100"));
}

#[test]
fn test_new_workbook_adds_only_new_rows() {
    let dir = common::input_dir(&["facturas_enero.xlsx"]);
    let settings = settings(dir.path(), Some("Factura"));
    let store = Arc::new(MemoryStore::new());

    let first = run(&settings, &store, load_strategy(&settings, false)).unwrap();
    assert_eq!(first.inserted, 3);

    common::copy_fixture("facturas_febrero.xlsx", dir.path(), "facturas_febrero.xlsx");
    let report = run(&settings, &store, load_strategy(&settings, false)).unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped_existing, 3);
    assert_eq!(store.table("facturas").unwrap().len(), 4);
}

#[test]
fn test_without_primary_key_appends_everything() {
    let dir = input();
    let settings = settings(dir.path(), None);
    let store = Arc::new(MemoryStore::new());

    run(&settings, &store, load_strategy(&settings, false)).unwrap();
    run(&settings, &store, load_strategy(&settings, false)).unwrap();

    assert_eq!(store.table("facturas").unwrap().len(), 8);
}

#[test]
fn test_replace_recreates_table_with_primary_key() {
    let dir = input();
    let settings = settings(dir.path(), Some("Factura"));
    let store = Arc::new(MemoryStore::new());

    run(&settings, &store, load_strategy(&settings, false)).unwrap();
    let report = run(&settings, &store, load_strategy(&settings, true)).unwrap();

    assert_eq!(report.inserted, 4);
    assert_eq!(store.table("facturas").unwrap().len(), 4);
    assert_eq!(store.primary_key("facturas").as_deref(), Some("Factura"));
}

#[test]
fn test_lookup_enrichment_from_store() {
    let dir = input();
    let mut settings = settings(dir.path(), Some("Factura"));
    settings.lookup = Some(LookupConfig {
        table: "empresas".to_string(),
        key_column: "nombre".to_string(),
        value_column: "id".to_string(),
        source_column: "Empresa".to_string(),
        destination_column: "empresa_id".to_string(),
    });
    let store = Arc::new(MemoryStore::new().with_table("empresas", empresas()));

    run(&settings, &store, load_strategy(&settings, false)).unwrap();

    let stored = store.table("facturas").unwrap();
    assert_eq!(stored.value(0, "empresa_id"), &ScalarValue::Integer(10));
    assert_eq!(stored.value(1, "empresa_id"), &ScalarValue::Integer(20));
    // Initech has no entry
    assert_eq!(stored.value(2, "empresa_id"), &ScalarValue::Null);
}

#[test]
fn test_empty_input_directory_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), Some("Factura"));
    let store = Arc::new(MemoryStore::new());

    let report = run(&settings, &store, load_strategy(&settings, false)).unwrap();

    assert_eq!(report.candidates, 0);
    assert_eq!(store.insert_calls(), 0);
    assert!(store.table("facturas").is_none());
}

#[test]
fn test_unreachable_store_stops_before_extraction() {
    let dir = input();
    std::fs::write(dir.path().join("roto.xlsx"), "not a zip").unwrap();
    let settings = settings(dir.path(), Some("Factura"));
    let store = Arc::new(MemoryStore::new());
    store.set_online(false);

    let err = run(&settings, &store, load_strategy(&settings, false)).unwrap_err();

    // the broken workbook is never opened
    assert!(matches!(err, SheetloadError::StoreUnreachable(_)));
}

#[test]
fn test_unknown_primary_key_column_is_fatal() {
    let dir = input();
    let settings = settings(dir.path(), Some("NumeroFactura"));
    let store = Arc::new(MemoryStore::new());

    let err = run(&settings, &store, load_strategy(&settings, false)).unwrap_err();

    assert!(matches!(err, SheetloadError::MissingColumn { .. }));
    assert!(store.table("facturas").is_none());
}
