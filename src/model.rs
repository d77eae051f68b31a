// Core structs: Table, Row, AnnotatedRow and the error enums
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// A single cell as it came out of the loader. Numbers keep the text they were
/// read from, so `007` or `100.50` are written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64, String),
    Text(String),
    Missing,
}

impl CellValue {
    /// Types a raw text cell: empty is `Missing`, anything that parses as f64 is a number.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n, trimmed.to_string()),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    /// A number with its default textual form.
    pub fn number(value: f64) -> Self {
        CellValue::Number(value, value.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n, _) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(_, raw) => write!(f, "{}", raw),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

static MISSING: CellValue = CellValue::Missing;

/// One product line: column name -> value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: CellValue) {
        self.values.insert(column.to_string(), value);
    }

    /// Missing columns read as `CellValue::Missing`.
    pub fn get(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&MISSING)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_number()
    }
}

/// A loaded table. `columns` keeps the header order for rendering and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Three-way row status used for counts and highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Flagged,
    Competitive,
    Neutral,
}

/// A row together with its derived pricing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub row: Row,
    pub min_competitor_price: Option<f64>,
    pub percent_difference: Option<f64>,
    pub is_flagged: bool,
    pub classification: Classification,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no competitor columns selected")]
    NoCompetitorColumns,
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("competitor column '{0}' is also the own price column")]
    OwnPriceAsCompetitor(String),
    #[error("invalid threshold {0}: must be a finite number >= 0")]
    InvalidThreshold(f64),
    #[error("table has no columns")]
    EmptyTable,
    #[error("no numeric column to use as the own price")]
    NoNumericColumns,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of objects, found {0}")]
    NotRecords(String),
    #[error("missing header row")]
    MissingHeader,
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("invalid response status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}
