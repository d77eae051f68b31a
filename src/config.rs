use crate::analyzer::filter::StatusFilter;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_THRESHOLD_PERCENT: f64 = 5.0;

/// Upper bound of the threshold slider in the interactive tool. The analyzer accepts any value.
pub const UI_MAX_THRESHOLD_PERCENT: f64 = 50.0;

/// How many numeric columns are picked as competitors when none are configured.
pub const DEFAULT_COMPETITOR_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config defines no reports")]
    NoReports,
}

/// One report as written in `config.json`. Column roles may be left out and are
/// resolved against the loaded table by the normalizer.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub name: String,
    pub source: String,
    #[serde(default)]
    pub id_column: Option<String>,
    /// Omitted picks the first column after the id; `""` disables name search.
    #[serde(default)]
    pub name_column: Option<String>,
    #[serde(default)]
    pub own_price_column: Option<String>,
    #[serde(default)]
    pub competitor_columns: Option<Vec<String>>,
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
    #[serde(default)]
    pub status_filter: StatusFilter,
    #[serde(default)]
    pub search_text: String,
    #[serde(default = "default_true")]
    pub export: bool,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default = "default_interval")]
    pub check_interval_seconds: u64,
    pub reports: Vec<ReportConfig>,
}

/// Validated column roles for a single analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub id_column: String,
    pub name_column: Option<String>,
    pub own_price_column: String,
    pub competitor_columns: Vec<String>,
    pub threshold_percent: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD_PERCENT
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_export_dir() -> String {
    "exports".to_string()
}

fn default_interval() -> u64 {
    60
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, LoadConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, LoadConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    if config.reports.is_empty() {
        return Err(LoadConfigError::NoReports);
    }
    Ok(config)
}
