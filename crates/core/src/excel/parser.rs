use crate::error::{ExcelParseError, ExcelResult};
use crate::record::{RecordSet, Row, ScalarValue};
use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::debug;

/// Reads worksheets of an in-memory workbook as record sets.
pub struct ExcelParser {
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl ExcelParser {
    /// Create ExcelParser from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> ExcelResult<Self> {
        let cursor = Cursor::new(bytes);
        let workbook = Xlsx::new(cursor)?;
        Ok(ExcelParser { workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read `sheet_name` with its first row as header.
    ///
    /// Blank header cells are named `Unnamed: <index>` and repeated names get
    /// a `.<n>` suffix. Rows with no value at all are skipped.
    pub fn read_sheet(&mut self, sheet_name: &str) -> ExcelResult<RecordSet> {
        if !self.workbook.sheet_names().iter().any(|s| s == sheet_name) {
            return Err(ExcelParseError::WorksheetNotFound(sheet_name.to_string()));
        }
        let range = self.workbook.worksheet_range(sheet_name)?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(RecordSet::new());
        };
        let header = build_header(header_row);
        let mut records = RecordSet::with_columns(header.iter().cloned());

        for cells in rows {
            if cells.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            let row: Row = header
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = cells.get(i).map(cell_value).unwrap_or(ScalarValue::Null);
                    (name.clone(), value)
                })
                .collect();
            records.push(row);
        }

        debug!("Sheet '{}': {} rows", sheet_name, records.len());
        Ok(records)
    }

    /// Parse workbook bytes and read one sheet
    pub fn parse_from_bytes(bytes: Vec<u8>, sheet_name: &str) -> ExcelResult<RecordSet> {
        ExcelParser::from_bytes(bytes)?.read_sheet(sheet_name)
    }
}

/// Header names, made unique. A repeated name gets the next free `.n`
/// suffix; a suffixed name that is itself taken is suffixed again.
fn build_header(cells: &[Data]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let mut name = match cell {
                Data::Empty => format!("Unnamed: {i}"),
                other => cell_value(other).to_text(),
            };
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> ScalarValue {
    match cell {
        Data::Empty | Data::Error(_) => ScalarValue::Null,
        Data::String(s) => ScalarValue::Text(s.clone()),
        Data::Int(i) => ScalarValue::Integer(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => ScalarValue::Integer(*f as i64),
        Data::Float(f) => ScalarValue::from(*f),
        Data::Bool(b) => ScalarValue::Bool(*b),
        Data::DateTime(dt) => match serial_to_text(dt.as_f64()) {
            Some(text) => ScalarValue::Text(text),
            None => ScalarValue::Text(cell.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => ScalarValue::Text(s.clone()),
    }
}

/// Last serial Excel can represent (9999-12-31)
const MAX_SERIAL: f64 = 2_958_466.0;

/// Excel serial date (days since 1899-12-30) as `YYYY-MM-DD HH:MM:SS`.
fn serial_to_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(0.0..MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let dt = epoch.checked_add_signed(Duration::milliseconds(millis))?;
    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
