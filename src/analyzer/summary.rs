use crate::analyzer::price_analysis::AnnotatedTable;
use crate::model::Classification;

/// Headline numbers computed over the full annotated table, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_products: usize,
    pub flagged_products: usize,
    pub competitive_products: usize,
    /// `None` when no row has a numeric own price.
    pub average_own_price: Option<f64>,
}

impl SummaryMetrics {
    pub fn from_table(annotated: &AnnotatedTable) -> Self {
        let own_column = &annotated.config.own_price_column;
        let own_prices: Vec<f64> = annotated
            .rows
            .iter()
            .filter_map(|r| r.row.number(own_column))
            .collect();
        let average_own_price = if own_prices.is_empty() {
            None
        } else {
            Some(own_prices.iter().sum::<f64>() / own_prices.len() as f64)
        };

        Self {
            total_products: annotated.len(),
            flagged_products: count(annotated, Classification::Flagged),
            competitive_products: count(annotated, Classification::Competitive),
            average_own_price,
        }
    }
}

fn count(annotated: &AnnotatedTable, class: Classification) -> usize {
    annotated
        .rows
        .iter()
        .filter(|r| r.classification == class)
        .count()
}
