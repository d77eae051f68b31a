// Analyzer module: pricing comparison, row filtering and summary metrics.

pub mod price_analysis;
pub mod filter;
pub mod summary;

pub use price_analysis::{analyze, classify, Analyzer, AnalyzerImpl, AnnotatedTable};
pub use filter::{filter, StatusFilter};
pub use summary::SummaryMetrics;
