// Terminal report: metrics, legend and the highlighted product table
use crate::analyzer::{AnnotatedTable, SummaryMetrics};
use crate::model::{AnnotatedRow, CellValue, Classification};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

pub const MIN_PRICE_HEADER: &str = "Min Competitor Price";
pub const DIFFERENCE_HEADER: &str = "Difference %";

/// `$1,235` style: rounded to whole units with thousands separators.
pub fn format_money(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}", sign, grouped)
}

pub fn format_percent(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}%", v)).unwrap_or_else(|| "-".to_string())
}

fn format_price_cell(value: &CellValue) -> String {
    match value {
        CellValue::Number(n, _) => format_money(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Missing => "-".to_string(),
    }
}

pub fn render_summary(metrics: &SummaryMetrics) -> String {
    let average = metrics
        .average_own_price
        .map(format_money)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "📦 Total products: {}\n🔴 Overpriced products: {}\n🟢 Competitive products: {}\n💵 Average price: {}\n",
        metrics.total_products, metrics.flagged_products, metrics.competitive_products, average
    )
}

pub fn render_legend() -> &'static str {
    "🔴 Red: priced above the threshold over the cheapest competitor\n\
     🟢 Green: priced at or below the cheapest competitor\n\
     ⚪ Plain: within the accepted threshold band\n"
}

/// Header plus one line per row; rows are colored by their stored classification.
pub fn render_table(table: &AnnotatedTable, color: bool) -> String {
    let cfg = &table.config;
    let mut headers: Vec<String> = vec![cfg.id_column.clone()];
    if let Some(name) = &cfg.name_column {
        headers.push(name.clone());
    }
    headers.push(cfg.own_price_column.clone());
    headers.push(MIN_PRICE_HEADER.to_string());
    headers.push(DIFFERENCE_HEADER.to_string());
    headers.extend(cfg.competitor_columns.iter().cloned());

    let lines: Vec<Vec<String>> = table.rows.iter().map(|row| row_cells(row, table)).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &lines {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_line = join_padded(&headers, &widths);
    if color {
        out.push_str(&format!("{}{}{}\n", BOLD, header_line, RESET));
    } else {
        out.push_str(&header_line);
        out.push('\n');
    }

    for (row, cells) in table.rows.iter().zip(&lines) {
        let line = join_padded(cells, &widths);
        match (color, row_color(row.classification)) {
            (true, Some(code)) => out.push_str(&format!("{}{}{}\n", code, line, RESET)),
            _ => {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
    out
}

fn row_cells(row: &AnnotatedRow, table: &AnnotatedTable) -> Vec<String> {
    let cfg = &table.config;
    let mut cells = vec![row.row.get(&cfg.id_column).to_string()];
    if let Some(name) = &cfg.name_column {
        cells.push(row.row.get(name).to_string());
    }
    cells.push(format_price_cell(row.row.get(&cfg.own_price_column)));
    cells.push(row.min_competitor_price.map(format_money).unwrap_or_else(|| "-".to_string()));
    cells.push(format_percent(row.percent_difference));
    for column in &cfg.competitor_columns {
        cells.push(format_price_cell(row.row.get(column)));
    }
    cells
}

fn row_color(class: Classification) -> Option<&'static str> {
    match class {
        Classification::Flagged => Some(RED),
        Classification::Competitive => Some(GREEN),
        Classification::Neutral => None,
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Colors are off when `NO_COLOR` is set, whatever the config says.
pub fn color_enabled(configured: bool) -> bool {
    configured && std::env::var_os("NO_COLOR").is_none()
}
