use super::value::ScalarValue;
use crate::error::{Result, SheetloadError};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

/// A row maps column names to values, in insertion order.
pub type Row = IndexMap<String, ScalarValue>;

static NULL: ScalarValue = ScalarValue::Null;

/// Ordered collection of rows.
///
/// The column set is the union of every column seen in any row. A row that
/// lacks a column reads as `Null` through [`RecordSet::value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordSet {
    columns: IndexSet<String>,
    rows: Vec<Row>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty record set with a known header.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        let mut set = Self::new();
        for row in rows {
            set.push(row);
        }
        set
    }

    pub fn push(&mut self, row: Row) {
        for column in row.keys() {
            if !self.columns.contains(column) {
                self.columns.insert(column.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Value of `column` in row `index`; absent cells read as `Null`.
    pub fn value(&self, index: usize, column: &str) -> &ScalarValue {
        self.rows
            .get(index)
            .and_then(|row| row.get(column))
            .unwrap_or(&NULL)
    }

    /// Cell lookup on a single row with the same `Null` fallback.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a ScalarValue {
        row.get(column).unwrap_or(&NULL)
    }

    /// Append `other` after `self`; columns become the union of both.
    pub fn concat(mut self, other: RecordSet) -> Self {
        for column in other.columns {
            self.columns.insert(column);
        }
        self.rows.extend(other.rows);
        self
    }

    /// Give every row every column, filling gaps with `Null`.
    pub fn normalize(&mut self) {
        for row in &mut self.rows {
            for column in &self.columns {
                if !row.contains_key(column) {
                    row.insert(column.clone(), ScalarValue::Null);
                }
            }
        }
    }

    /// Add (or replace) `column` with a value computed from each row.
    pub fn with_column<F>(mut self, column: &str, mut f: F) -> Self
    where
        F: FnMut(&Row) -> ScalarValue,
    {
        for row in &mut self.rows {
            let value = f(row);
            row.insert(column.to_string(), value);
        }
        self.columns.insert(column.to_string());
        self
    }

    /// Keep the rows matching `predicate`, preserving their relative order.
    pub fn retain<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(|row| predicate(row));
        self
    }

    pub fn drop_columns(mut self, columns: &[&str]) -> Self {
        for row in &mut self.rows {
            for column in columns {
                row.shift_remove(*column);
            }
        }
        for column in columns {
            self.columns.shift_remove(*column);
        }
        self
    }

    /// Join the text of `sources` with `separator` into a new column.
    pub fn concat_columns(self, column: &str, sources: &[&str], separator: &str) -> Self {
        self.with_column(column, |row| {
            let joined = sources
                .iter()
                .map(|source| Self::cell(row, source).to_text())
                .collect::<Vec<_>>()
                .join(separator);
            ScalarValue::Text(joined)
        })
    }

    /// Build a record set from a JSON array of objects, or an object wrapping
    /// that array under `"value"`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("value") {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(SheetloadError::parse("'value' is not an array of records")),
                None => return Ok(Self::new()),
            },
            _ => return Err(SheetloadError::parse("expected an array of records")),
        };

        let mut set = Self::new();
        for item in items {
            let Value::Object(fields) = item else {
                return Err(SheetloadError::parse(format!(
                    "record is not an object: {}",
                    item
                )));
            };
            let row: Row = fields
                .iter()
                .map(|(k, v)| (k.clone(), ScalarValue::from(v)))
                .collect();
            set.push(row);
        }
        Ok(set)
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    Value::Object(
                        self.columns
                            .iter()
                            .map(|c| (c.clone(), Self::cell(row, c).to_json()))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Build a [`Row`] from `column => value` pairs.
#[macro_export]
macro_rules! row {
    ($($column:expr => $value:expr),* $(,)?) => {{
        let mut row = $crate::record::Row::new();
        $( row.insert(($column).to_string(), $crate::record::ScalarValue::from($value)); )*
        row
    }};
}
