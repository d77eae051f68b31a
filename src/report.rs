// Per-report pipeline: fetch, parse, resolve columns, analyze, filter, render, export
use crate::analyzer::{filter, Analyzer, AnalyzerImpl, AnnotatedTable, SummaryMetrics};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::export::export_table;
use crate::normalizer::resolve_config;
use crate::parser::{Parser, TableFormat, TableParser};
use crate::render::{render_legend, render_summary, render_table};
use crate::source::TableSource;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub export_dir: PathBuf,
    pub export_enabled: bool,
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput {
    /// Full table, used for the metrics.
    pub annotated: AnnotatedTable,
    /// What gets shown and exported.
    pub filtered: AnnotatedTable,
    pub metrics: SummaryMetrics,
}

#[derive(Debug)]
pub struct ReportRun {
    pub output: ReportOutput,
    pub rendered: String,
    pub export_path: Option<PathBuf>,
}

/// A report's source plus the fingerprint of the content it last analyzed.
pub struct ReportState {
    pub report: ReportConfig,
    pub source: Box<dyn TableSource>,
    last_fingerprint: Option<u64>,
}

impl ReportState {
    pub fn new(report: ReportConfig, source: Box<dyn TableSource>) -> Self {
        Self {
            report,
            source,
            last_fingerprint: None,
        }
    }
}

fn fingerprint(raw: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    hasher.finish()
}

/// Parses the raw table text and runs the analysis for one report. Pure.
pub fn analyze_report(raw: &str, report: &ReportConfig) -> Result<ReportOutput> {
    let format = TableFormat::from_location(&report.source)?;
    let table = TableParser::new(format).parse(raw)?;
    let cfg = resolve_config(&table, report)?;

    let analyzer = AnalyzerImpl::new();
    let annotated = analyzer.analyze(&table, &cfg)?;
    let metrics = analyzer.summarize(&annotated);
    let filtered = filter(
        &annotated,
        report.status_filter,
        &report.search_text,
        cfg.name_column.as_deref(),
    );

    Ok(ReportOutput {
        annotated,
        filtered,
        metrics,
    })
}

pub fn render_report(name: &str, output: &ReportOutput, color: bool) -> String {
    let mut out = format!("=== {} ===\n", name);
    out.push_str(&render_summary(&output.metrics));
    out.push('\n');
    out.push_str(&render_table(&output.filtered, color));
    out.push('\n');
    out.push_str(render_legend());
    out
}

/// Runs one report. Returns `Ok(None)` when the source content is unchanged since the
/// previous run, since the analysis of identical input is identical.
pub async fn process_report(state: &mut ReportState, settings: &RunSettings) -> Result<Option<ReportRun>> {
    let name = state.report.name.clone();
    info!("📥 [{}] Loading {}", name, state.source.describe());
    let raw = state.source.fetch().await?;

    let print = fingerprint(&raw);
    if state.last_fingerprint == Some(print) {
        info!("♻️ [{}] Source unchanged, skipping analysis", name);
        return Ok(None);
    }

    let output = analyze_report(&raw, &state.report)?;
    info!(
        "📊 [{}] {} products, {} flagged, {} competitive, {} shown",
        name,
        output.metrics.total_products,
        output.metrics.flagged_products,
        output.metrics.competitive_products,
        output.filtered.len()
    );

    let export_path = if settings.export_enabled && state.report.export {
        Some(export_table(&output.filtered, &settings.export_dir, &name)?)
    } else {
        None
    };

    // Only remember content that made it all the way through.
    state.last_fingerprint = Some(print);
    let rendered = render_report(&name, &output, settings.color);

    Ok(Some(ReportRun {
        output,
        rendered,
        export_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::StatusFilter;
    use crate::error::AppError;
    use crate::model::{ConfigError, SourceError};
    use std::sync::Mutex;

    const PRICES: &str = "SKU,Producto,Mi_Precio,Competidor_1,Competidor_2,Competidor_3\n\
        PROD001,Producto A,100,95,98,102\n\
        PROD002,Producto B,250,260,245,255\n\
        PROD003,Producto C,450,420,440,435\n";

    struct StaticSource(Mutex<String>);

    #[async_trait::async_trait]
    impl TableSource for StaticSource {
        async fn fetch(&self) -> std::result::Result<String, SourceError> {
            Ok(self.0.lock().unwrap().clone())
        }

        fn describe(&self) -> String {
            "static".into()
        }
    }

    fn report() -> ReportConfig {
        ReportConfig {
            name: "demo".into(),
            source: "prices.csv".into(),
            id_column: Some("SKU".into()),
            name_column: Some("Producto".into()),
            own_price_column: Some("Mi_Precio".into()),
            competitor_columns: None,
            threshold_percent: 5.0,
            status_filter: StatusFilter::All,
            search_text: String::new(),
            export: false,
        }
    }

    fn settings() -> RunSettings {
        RunSettings {
            export_dir: PathBuf::from("unused"),
            export_enabled: false,
            color: false,
        }
    }

    #[test]
    fn analyzes_sample_file() {
        let output = analyze_report(PRICES, &report()).unwrap();
        assert_eq!(output.metrics.total_products, 3);
        assert_eq!(output.metrics.flagged_products, 2);
        assert_eq!(output.metrics.competitive_products, 0);
        assert_eq!(output.metrics.average_own_price, Some(800.0 / 3.0));
    }

    #[test]
    fn metrics_ignore_the_filter() {
        let mut report = report();
        report.status_filter = StatusFilter::FlaggedOnly;
        report.search_text = "producto c".into();

        let output = analyze_report(PRICES, &report).unwrap();
        assert_eq!(output.filtered.len(), 1);
        assert_eq!(output.metrics.total_products, 3);
    }

    #[test]
    fn empty_competitor_list_surfaces_config_error() {
        let mut report = report();
        report.competitor_columns = Some(vec![]);
        let err = analyze_report(PRICES, &report).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::NoCompetitorColumns)));
    }

    #[tokio::test]
    async fn unchanged_content_is_skipped() {
        let mut state = ReportState::new(report(), Box::new(StaticSource(Mutex::new(PRICES.into()))));

        let first = process_report(&mut state, &settings()).await.unwrap();
        assert!(first.is_some());
        assert!(first.unwrap().rendered.contains("Total products: 3"));

        assert!(process_report(&mut state, &settings()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn changed_content_is_reanalyzed() {
        let source = std::sync::Arc::new(StaticSource(Mutex::new(PRICES.into())));
        struct Shared(std::sync::Arc<StaticSource>);

        #[async_trait::async_trait]
        impl TableSource for Shared {
            async fn fetch(&self) -> std::result::Result<String, SourceError> {
                self.0.fetch().await
            }

            fn describe(&self) -> String {
                self.0.describe()
            }
        }

        let mut state = ReportState::new(report(), Box::new(Shared(source.clone())));
        assert!(process_report(&mut state, &settings()).await.unwrap().is_some());

        source.0.lock().unwrap().push_str("PROD004,Producto D,10,20,30,40\n");
        let run = process_report(&mut state, &settings()).await.unwrap().unwrap();
        assert_eq!(run.output.metrics.total_products, 4);
        assert_eq!(run.output.metrics.competitive_products, 1);
    }
}
