use crate::analyzer::summary::SummaryMetrics;
use crate::config::AnalysisConfig;
use crate::model::{AnnotatedRow, Classification, ConfigError, Row, Table};

/// Trait defining the interface for a price table analyzer.
pub trait Analyzer {
    fn analyze(&self, table: &Table, cfg: &AnalysisConfig) -> Result<AnnotatedTable, ConfigError>;
    fn summarize(&self, annotated: &AnnotatedTable) -> SummaryMetrics;
}

/// Stateless implementation; every call recomputes the whole table.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// The input rows in input order, each carrying its derived pricing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    pub columns: Vec<String>,
    pub config: AnalysisConfig,
    pub rows: Vec<AnnotatedRow>,
}

impl AnnotatedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, table: &Table, cfg: &AnalysisConfig) -> Result<AnnotatedTable, ConfigError> {
        analyze(table, cfg)
    }

    fn summarize(&self, annotated: &AnnotatedTable) -> SummaryMetrics {
        SummaryMetrics::from_table(annotated)
    }
}

/// Checks the config against the table before any row is touched.
pub fn validate(table: &Table, cfg: &AnalysisConfig) -> Result<(), ConfigError> {
    if cfg.competitor_columns.is_empty() {
        return Err(ConfigError::NoCompetitorColumns);
    }
    if !cfg.threshold_percent.is_finite() || cfg.threshold_percent < 0.0 {
        return Err(ConfigError::InvalidThreshold(cfg.threshold_percent));
    }

    let named = [Some(&cfg.id_column), cfg.name_column.as_ref(), Some(&cfg.own_price_column)];
    for column in named.into_iter().flatten().chain(cfg.competitor_columns.iter()) {
        if !table.has_column(column) {
            return Err(ConfigError::UnknownColumn(column.clone()));
        }
    }

    if cfg.competitor_columns.contains(&cfg.own_price_column) {
        return Err(ConfigError::OwnPriceAsCompetitor(cfg.own_price_column.clone()));
    }
    Ok(())
}

/// Computes min competitor price, percent difference, flag and class for every row.
pub fn analyze(table: &Table, cfg: &AnalysisConfig) -> Result<AnnotatedTable, ConfigError> {
    validate(table, cfg)?;

    let rows = table
        .rows
        .iter()
        .map(|row| annotate_row(row, cfg))
        .collect();

    Ok(AnnotatedTable {
        columns: table.columns.clone(),
        config: cfg.clone(),
        rows,
    })
}

fn annotate_row(row: &Row, cfg: &AnalysisConfig) -> AnnotatedRow {
    let min_competitor_price = min_competitor_price(row, &cfg.competitor_columns);
    let percent_difference = match (row.number(&cfg.own_price_column), min_competitor_price) {
        (Some(own), Some(min)) => Some(percent_difference(own, min)),
        _ => None,
    };
    let is_flagged = is_flagged(percent_difference, cfg.threshold_percent);

    AnnotatedRow {
        row: row.clone(),
        min_competitor_price,
        percent_difference,
        is_flagged,
        classification: classify_values(is_flagged, percent_difference),
    }
}

/// Minimum over the numeric, strictly positive competitor values of a row.
pub fn min_competitor_price(row: &Row, competitor_columns: &[String]) -> Option<f64> {
    competitor_columns
        .iter()
        .filter_map(|column| row.number(column))
        .filter(|price| price.is_finite() && *price > 0.0)
        .reduce(f64::min)
}

/// `(own - min) / min * 100`, rounded to two decimals. `min` must be positive.
pub fn percent_difference(own_price: f64, min_competitor: f64) -> f64 {
    round2((own_price - min_competitor) / min_competitor * 100.0)
}

/// Rounds half away from zero (`f64::round`), so an exact `.xx5` can differ from
/// pandas' half-to-even `round(2)`. Most such values are not exactly representable
/// and land the same either way.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Strictly greater than the threshold; a row without a difference is never flagged.
pub fn is_flagged(percent_difference: Option<f64>, threshold_percent: f64) -> bool {
    percent_difference.is_some_and(|diff| diff > threshold_percent)
}

fn classify_values(is_flagged: bool, percent_difference: Option<f64>) -> Classification {
    if is_flagged {
        Classification::Flagged
    } else if percent_difference.is_some_and(|diff| diff <= 0.0) {
        Classification::Competitive
    } else {
        Classification::Neutral
    }
}

/// Class of an annotated row, derived from the same stored difference used for flagging.
pub fn classify(row: &AnnotatedRow) -> Classification {
    classify_values(row.is_flagged, row.percent_difference)
}
