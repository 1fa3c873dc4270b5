// Lookup enrichment and proyecto derivation over record sets
use sheetload_core::transform::{
    DeriveConfig, LookupTable, TransformWarning, derive_proyecto_column, enrich,
};
use sheetload_core::{RecordSet, ScalarValue, row};

fn invoices() -> RecordSet {
    RecordSet::from_rows(vec![
        row! {"Factura" => 1, "Empresa" => "Acme", "Unidad de negocio" => "2427-INT"},
        row! {"Factura" => 2, "Empresa" => "Globex", "Unidad de negocio" => "RETAIL"},
        row! {"Factura" => 3, "Empresa" => "Unknown", "Unidad de negocio" => ScalarValue::Null},
    ])
}

fn companies() -> LookupTable {
    vec![
        ("Acme", ScalarValue::Integer(10)),
        ("Globex", ScalarValue::Integer(20)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_enrich_adds_destination_column() {
    let result = enrich(invoices(), &companies(), "Empresa", "CompanyId");

    assert!(result.warning.is_none());
    let records = result.records;
    assert_eq!(records.value(0, "CompanyId"), &ScalarValue::Integer(10));
    assert_eq!(records.value(1, "CompanyId"), &ScalarValue::Integer(20));
    assert_eq!(records.value(2, "CompanyId"), &ScalarValue::Null);
}

#[test]
fn test_enrich_preserves_rows_and_other_columns() {
    let input = invoices();
    let records = enrich(input.clone(), &companies(), "Empresa", "CompanyId").records;

    assert_eq!(records.len(), input.len());
    for (before, after) in input.iter().zip(records.iter()) {
        for column in input.columns() {
            assert_eq!(RecordSet::cell(before, column), RecordSet::cell(after, column));
        }
    }
}

#[test]
fn test_enrich_missing_source_column_warns() {
    let input = invoices();
    let result = enrich(input.clone(), &companies(), "Company", "CompanyId");

    assert_eq!(result.records, input);
    assert_eq!(
        result.warning,
        Some(TransformWarning::MissingColumn {
            transform: "lookup enrichment",
            column: "Company".to_string(),
        })
    );
}

#[test]
fn test_enrich_matches_numeric_keys_by_text() {
    let input = RecordSet::from_rows(vec![row! {"code" => 7.0}]);
    let lookup: LookupTable = vec![("7", ScalarValue::from("seven"))].into_iter().collect();

    let records = enrich(input, &lookup, "code", "name").records;
    assert_eq!(records.value(0, "name"), &ScalarValue::from("seven"));
}

#[test]
fn test_proyecto_column() {
    let result = derive_proyecto_column(invoices(), &DeriveConfig::default());

    assert!(result.warning.is_none());
    let records = result.records;
    assert_eq!(records.value(0, "proyecto"), &ScalarValue::from("PY_002427"));
    assert_eq!(records.value(1, "proyecto"), &ScalarValue::from("RETAIL"));
    assert_eq!(records.value(2, "proyecto"), &ScalarValue::from(""));
}

#[test]
fn test_proyecto_coerces_numbers_to_text() {
    let input = RecordSet::from_rows(vec![row! {"Unidad de negocio" => 2427}]);
    let records = derive_proyecto_column(input, &DeriveConfig::default()).records;
    assert_eq!(records.value(0, "proyecto"), &ScalarValue::from("PY_002427"));
}

#[test]
fn test_proyecto_missing_source_column_warns() {
    let input = RecordSet::from_rows(vec![row! {"Factura" => 1}]);
    let result = derive_proyecto_column(input.clone(), &DeriveConfig::default());

    assert_eq!(result.records, input);
    assert!(!result.records.has_column("proyecto"));
    assert!(result.warning.is_some());
}

#[test]
fn test_concat_and_drop_columns() {
    let records = invoices()
        .concat_columns("clave", &["Empresa", "Factura"], "_")
        .drop_columns(&["Unidad de negocio"]);

    assert_eq!(records.value(0, "clave"), &ScalarValue::from("Acme_1"));
    assert!(!records.has_column("Unidad de negocio"));
    assert_eq!(records.columns().collect::<Vec<_>>(), vec!["Factura", "Empresa", "clave"]);
}
