// Delimited-text and JSON-records parsing into a Table
use crate::model::{CellValue, ParserError, Row, Table};
use crate::normalizer::{dedupe_columns, normalize_header, unique_column};
use std::collections::HashSet;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

pub trait Parser {
    fn parse(&self, raw: &str) -> Result<Table, ParserError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited(u8),
    JsonRecords,
}

impl TableFormat {
    /// Picks the format from the source extension; unknown extensions are read as CSV.
    pub fn from_location(location: &str) -> Result<Self, ParserError> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("tsv") | Some("tab") => Ok(TableFormat::Delimited(b'\t')),
            Some("ssv") | Some("txt") => Ok(TableFormat::Delimited(b';')),
            Some("json") => Ok(TableFormat::JsonRecords),
            Some(ext @ ("xlsx" | "xls" | "ods")) => Err(ParserError::UnsupportedFormat(ext.to_string())),
            _ => Ok(TableFormat::Delimited(b',')),
        }
    }
}

pub struct TableParser {
    format: TableFormat,
}

impl TableParser {
    pub fn new(format: TableFormat) -> Self {
        Self { format }
    }

    pub fn csv() -> Self {
        Self::new(TableFormat::Delimited(b','))
    }

    fn parse_delimited(&self, raw: &str, delimiter: u8) -> Result<Table, ParserError> {
        let text = raw.trim_start_matches('\u{FEFF}');
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(ParserError::MissingHeader);
        }
        let columns = dedupe_columns(columns);

        let mut table = Table::new(columns);
        for result in reader.records() {
            let record = result?;
            if record.len() > table.columns.len() {
                warn!(
                    "⚠️ Record at line {} has {} fields, header has {}; extra fields dropped",
                    record.position().map(|p| p.line()).unwrap_or(0),
                    record.len(),
                    table.columns.len()
                );
            }
            let mut row = Row::new();
            for (i, column) in table.columns.iter().enumerate() {
                let value = record.get(i).map(CellValue::from_raw).unwrap_or(CellValue::Missing);
                row.insert(column, value);
            }
            table.rows.push(row);
        }
        Ok(table)
    }

    fn parse_json(&self, raw: &str) -> Result<Table, ParserError> {
        let value: Value = serde_json::from_str(raw.trim_start_matches('\u{FEFF}'))?;
        let records = match value {
            Value::Array(items) => items,
            other => return Err(ParserError::NotRecords(json_kind(&other).to_string())),
        };

        let mut table = Table::default();
        for record in records {
            let object = match record {
                Value::Object(map) => map,
                other => return Err(ParserError::NotRecords(format!("array of {}", json_kind(&other)))),
            };
            let mut row = Row::new();
            let mut seen: HashSet<String> = HashSet::new();
            for (key, value) in object {
                // keys that only differ by padding collapse after normalizing
                let column = unique_column(&normalize_header(&key), |c| seen.contains(c));
                seen.insert(column.clone());
                if !table.has_column(&column) {
                    table.columns.push(column.clone());
                }
                row.insert(&column, json_cell(value));
            }
            table.rows.push(row);
        }
        Ok(table)
    }
}

impl Parser for TableParser {
    fn parse(&self, raw: &str) -> Result<Table, ParserError> {
        match self.format {
            TableFormat::Delimited(delimiter) => self.parse_delimited(raw, delimiter),
            TableFormat::JsonRecords => self.parse_json(raw),
        }
    }
}

fn json_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Missing,
        Value::Number(n) => n
            .as_f64()
            .map(|v| CellValue::Number(v, n.to_string()))
            .unwrap_or(CellValue::Missing),
        Value::String(s) => CellValue::from_raw(&s),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
