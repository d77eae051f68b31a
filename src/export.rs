// CSV export of the annotated table
use crate::analyzer::AnnotatedTable;
use crate::model::ExportError;
use chrono::{DateTime, Local};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MIN_PRICE_COLUMN: &str = "min_competitor_price";
pub const DIFFERENCE_COLUMN: &str = "percent_difference";
pub const ALERT_COLUMN: &str = "alert";

/// `price_analysis_<report>_%Y%m%d_%H%M%S`, without extension.
pub fn export_stem(report: &str, at: DateTime<Local>) -> String {
    let slug: String = report
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("price_analysis_{}_{}", slug, at.format("%Y%m%d_%H%M%S"))
}

pub fn export_filename(report: &str, at: DateTime<Local>) -> String {
    format!("{}.csv", export_stem(report, at))
}

/// Creates `<stem>.csv`, falling back to `<stem>_1.csv`, `<stem>_2.csv`, ... so an
/// existing export is never overwritten.
fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, fs::File), ExportError> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{}.csv", stem)
        } else {
            format!("{}_{}.csv", stem, attempt)
        };
        let path = dir.join(name);
        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Original columns in table order followed by the three derived columns.
/// Undefined numbers are written as empty cells.
pub fn to_csv<W: std::io::Write>(table: &AnnotatedTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = table.columns.iter().map(String::as_str).collect();
    header.extend([MIN_PRICE_COLUMN, DIFFERENCE_COLUMN, ALERT_COLUMN]);
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record: Vec<String> = table
            .columns
            .iter()
            .map(|c| row.row.get(c).to_string())
            .collect();
        record.push(row.min_competitor_price.map(|v| v.to_string()).unwrap_or_default());
        record.push(row.percent_difference.map(|v| v.to_string()).unwrap_or_default());
        record.push(row.is_flagged.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the table into `dir` under a timestamped name and returns the path.
pub fn export_table(table: &AnnotatedTable, dir: impl AsRef<Path>, report: &str) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let (path, file) = create_unique(dir, &export_stem(report, Local::now()))?;
    to_csv(table, file)?;
    info!("💾 Exported {} rows to {}", table.len(), path.display());
    Ok(path)
}
