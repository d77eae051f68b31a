use crate::config::{AnalysisConfig, ReportConfig, DEFAULT_COMPETITOR_COUNT, UI_MAX_THRESHOLD_PERCENT};
use crate::model::{CellValue, ConfigError, Table};
use tracing::{info, warn};

/// Trims header names and drops a leading byte order mark.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{FEFF}').trim().to_string()
}

/// First free name among `name`, `name.1`, `name.2`, ...
pub fn unique_column(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{}.{}", name, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Renames repeated headers so every column keeps its own values.
pub fn dedupe_columns(columns: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(columns.len());
    for column in columns {
        let name = unique_column(&column, |c| unique.iter().any(|u| u == c));
        if name != column {
            warn!("⚠️ Duplicate column '{}' renamed to '{}'", column, name);
        }
        unique.push(name);
    }
    unique
}

/// A column counts as numeric when it holds at least one number and no text.
pub fn is_numeric_column(table: &Table, column: &str) -> bool {
    let mut seen_number = false;
    for row in &table.rows {
        match row.get(column) {
            CellValue::Number(..) => seen_number = true,
            CellValue::Text(_) => return false,
            CellValue::Missing => {}
        }
    }
    seen_number
}

pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| is_numeric_column(table, c))
        .cloned()
        .collect()
}

/// Turns a report's column roles into a validated analysis config, filling omitted
/// roles the way the interactive tool pre-selects them.
pub fn resolve_config(table: &Table, report: &ReportConfig) -> Result<AnalysisConfig, ConfigError> {
    let id_column = match &report.id_column {
        Some(column) => column.clone(),
        None => table.columns.first().cloned().ok_or(ConfigError::EmptyTable)?,
    };

    let name_column = match report.name_column.as_deref() {
        Some("") => None,
        Some(column) => Some(column.to_string()),
        None => table.columns.iter().find(|c| **c != id_column).cloned(),
    };

    let own_price_column = match &report.own_price_column {
        Some(column) => column.clone(),
        None => {
            let detected = numeric_columns(table)
                .into_iter()
                .find(|c| *c != id_column)
                .ok_or(ConfigError::NoNumericColumns)?;
            info!("🔎 [{}] Auto-selected own price column: {}", report.name, detected);
            detected
        }
    };

    let competitor_columns = match &report.competitor_columns {
        Some(columns) => columns.clone(),
        None => {
            let detected: Vec<String> = numeric_columns(table)
                .into_iter()
                .filter(|c| *c != own_price_column && *c != id_column)
                .take(DEFAULT_COMPETITOR_COUNT)
                .collect();
            info!("🔎 [{}] Auto-selected competitor columns: {:?}", report.name, detected);
            detected
        }
    };

    if report.threshold_percent > UI_MAX_THRESHOLD_PERCENT {
        warn!(
            "⚠️ [{}] Threshold {}% is above the usual {}% range",
            report.name, report.threshold_percent, UI_MAX_THRESHOLD_PERCENT
        );
    }

    if !is_numeric_column(table, &own_price_column) && table.has_column(&own_price_column) {
        warn!(
            "⚠️ [{}] Own price column '{}' contains non-numeric values",
            report.name, own_price_column
        );
    }

    let cfg = AnalysisConfig {
        id_column,
        name_column,
        own_price_column,
        competitor_columns,
        threshold_percent: report.threshold_percent,
    };
    crate::analyzer::price_analysis::validate(table, &cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::filter::StatusFilter;
    use crate::model::Row;

    fn table() -> Table {
        let mut table = Table::new(
            ["SKU", "Product", "My_Price", "C1", "C2", "C3", "C4"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        let mut row = Row::new()
            .with("SKU", CellValue::Text("PROD001".into()))
            .with("Product", CellValue::Text("Product A".into()))
            .with("My_Price", CellValue::number(100.0));
        for (i, column) in ["C1", "C2", "C3", "C4"].iter().enumerate() {
            row.insert(column, CellValue::number(90.0 + i as f64));
        }
        table.rows.push(row);
        table
    }

    fn report() -> ReportConfig {
        ReportConfig {
            name: "test".into(),
            source: "prices.csv".into(),
            id_column: None,
            name_column: Some("Product".into()),
            own_price_column: Some("My_Price".into()),
            competitor_columns: None,
            threshold_percent: 5.0,
            status_filter: StatusFilter::All,
            search_text: String::new(),
            export: false,
        }
    }

    #[test]
    fn header_cleanup() {
        assert_eq!(normalize_header("\u{FEFF} SKU "), "SKU");
        assert_eq!(normalize_header("My_Price"), "My_Price");
    }

    #[test]
    fn repeated_headers_get_numbered() {
        let columns = ["SKU", "C", "C", "C.1", "C"].iter().map(|c| c.to_string()).collect();
        assert_eq!(dedupe_columns(columns), vec!["SKU", "C", "C.1", "C.1.1", "C.2"]);
    }

    #[test]
    fn numeric_detection_rejects_text() {
        let table = table();
        assert!(is_numeric_column(&table, "My_Price"));
        assert!(!is_numeric_column(&table, "Product"));
        assert!(!is_numeric_column(&table, "Missing"));
    }

    #[test]
    fn omitted_roles_are_detected() {
        let cfg = resolve_config(&table(), &report()).unwrap();
        assert_eq!(cfg.id_column, "SKU");
        assert_eq!(cfg.competitor_columns, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn omitted_own_price_and_name_are_detected() {
        let mut report = report();
        report.own_price_column = None;
        report.name_column = None;
        let cfg = resolve_config(&table(), &report).unwrap();
        assert_eq!(cfg.own_price_column, "My_Price");
        assert_eq!(cfg.name_column.as_deref(), Some("Product"));
        assert_eq!(cfg.competitor_columns, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn own_price_detection_skips_a_numeric_id() {
        let mut table = Table::new(["Code", "Price", "Rival"].iter().map(|c| c.to_string()).collect());
        table.rows.push(
            Row::new()
                .with("Code", CellValue::from_raw("101"))
                .with("Price", CellValue::number(20.0))
                .with("Rival", CellValue::number(18.0)),
        );
        let mut report = report();
        report.own_price_column = None;
        report.name_column = Some(String::new());

        let cfg = resolve_config(&table, &report).unwrap();
        assert_eq!(cfg.id_column, "Code");
        assert_eq!(cfg.own_price_column, "Price");
        assert_eq!(cfg.competitor_columns, vec!["Rival"]);
        assert_eq!(cfg.name_column, None);
    }

    #[test]
    fn text_only_table_has_no_own_price() {
        let mut table = Table::new(["SKU", "Product"].iter().map(|c| c.to_string()).collect());
        table.rows.push(
            Row::new()
                .with("SKU", CellValue::Text("A".into()))
                .with("Product", CellValue::Text("Item".into())),
        );
        let mut report = report();
        report.own_price_column = None;
        assert_eq!(resolve_config(&table, &report), Err(ConfigError::NoNumericColumns));
    }

    #[test]
    fn explicit_empty_competitors_stay_an_error() {
        let mut report = report();
        report.competitor_columns = Some(vec![]);
        assert_eq!(resolve_config(&table(), &report), Err(ConfigError::NoCompetitorColumns));
    }

    #[test]
    fn unknown_explicit_column_is_rejected() {
        let mut report = report();
        report.id_column = Some("Code".into());
        assert_eq!(resolve_config(&table(), &report), Err(ConfigError::UnknownColumn("Code".into())));
    }

    #[test]
    fn headerless_table_cannot_pick_an_id() {
        assert_eq!(resolve_config(&Table::default(), &report()), Err(ConfigError::EmptyTable));
    }
}
