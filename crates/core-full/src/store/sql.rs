//! SQL text for the PostgreSQL store. Identifiers are always quoted; values
//! are always bound, never interpolated.

use sheetload_core::{RecordSet, ScalarValue};

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column type for a new table, from the non-null values of `column`.
pub fn infer_column_type(records: &RecordSet, column: &str) -> &'static str {
    let mut integers = false;
    let mut floats = false;
    let mut bools = false;
    let mut texts = false;

    for row in records {
        match RecordSet::cell(row, column) {
            ScalarValue::Null => {}
            ScalarValue::Integer(_) => integers = true,
            ScalarValue::Float(_) => floats = true,
            ScalarValue::Bool(_) => bools = true,
            ScalarValue::Text(_) => texts = true,
        }
    }

    match (integers, floats, bools, texts) {
        (_, _, _, true) => "TEXT",
        (true, false, false, false) => "BIGINT",
        (_, true, false, false) => "DOUBLE PRECISION",
        (false, false, true, false) => "BOOLEAN",
        _ => "TEXT",
    }
}

pub fn create_table(table: &str, records: &RecordSet) -> String {
    let columns = records
        .columns()
        .map(|column| {
            format!(
                "{} {}",
                quote_ident(column),
                infer_column_type(records, column)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS {} ({})", quote_ident(table), columns)
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// Bulk insert from one JSONB array parameter (`$1`).
pub fn insert_from_json(table: &str, records: &RecordSet) -> String {
    let columns = records
        .columns()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ");
    let table = quote_ident(table);
    format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_recordset(NULL::{table}, $1)"
    )
}

pub fn select_keys(table: &str, key_column: &str) -> String {
    format!(
        "SELECT {}::text FROM {}",
        quote_ident(key_column),
        quote_ident(table)
    )
}

pub fn select_lookup(table: &str, key_column: &str, value_column: &str) -> String {
    format!(
        "SELECT {}::text, to_jsonb({}) FROM {}",
        quote_ident(key_column),
        quote_ident(value_column),
        quote_ident(table)
    )
}

pub fn add_primary_key(table: &str, column: &str) -> String {
    format!(
        "ALTER TABLE {} ADD PRIMARY KEY ({})",
        quote_ident(table),
        quote_ident(column)
    )
}
