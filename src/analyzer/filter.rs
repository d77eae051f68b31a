use crate::analyzer::price_analysis::AnnotatedTable;
use crate::model::{AnnotatedRow, CellValue, Classification};
use serde::Deserialize;

/// Row selection by classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    FlaggedOnly,
    /// Every row that is not flagged, neutral rows included.
    CompetitiveOnly,
}

impl StatusFilter {
    pub fn matches(self, row: &AnnotatedRow) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::FlaggedOnly => row.classification == Classification::Flagged,
            StatusFilter::CompetitiveOnly => row.classification != Classification::Flagged,
        }
    }
}

/// Projects the annotated table onto the rows matching the status filter and,
/// when a name column is set, the case-insensitive name search.
pub fn filter(
    annotated: &AnnotatedTable,
    status: StatusFilter,
    search_text: &str,
    name_column: Option<&str>,
) -> AnnotatedTable {
    let needle = search_text.trim().to_lowercase();
    let search = match name_column {
        Some(column) if !needle.is_empty() => Some(column),
        _ => None,
    };

    let rows = annotated
        .rows
        .iter()
        .filter(|row| status.matches(row))
        .filter(|row| match search {
            Some(column) => name_matches(row.row.get(column), &needle),
            None => true,
        })
        .cloned()
        .collect();

    AnnotatedTable {
        columns: annotated.columns.clone(),
        config: annotated.config.clone(),
        rows,
    }
}

fn name_matches(value: &CellValue, needle: &str) -> bool {
    match value {
        CellValue::Missing => false,
        other => other.to_string().to_lowercase().contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::price_analysis::analyze;
    use crate::config::AnalysisConfig;
    use crate::model::{Row, Table};

    fn annotated() -> AnnotatedTable {
        let mut table = Table::new(
            ["id", "name", "own", "c1"].iter().map(|c| c.to_string()).collect(),
        );
        let data = [
            ("1", Some("Red Kettle"), 110.0, Some(100.0)),   // 10% -> flagged
            ("2", Some("Blue kettle"), 90.0, Some(100.0)),   // -10% -> competitive
            ("3", Some("Toaster"), 102.0, Some(100.0)),      // 2% -> neutral
            ("4", None, 150.0, Some(100.0)),                 // flagged, no name
            ("5", Some("KETTLE XL"), 100.0, None),           // not computable
        ];
        for (id, name, own, c1) in data {
            let mut row = Row::new()
                .with("id", CellValue::Text(id.into()))
                .with("own", CellValue::number(own));
            if let Some(name) = name {
                row.insert("name", CellValue::Text(name.into()));
            }
            if let Some(c1) = c1 {
                row.insert("c1", CellValue::number(c1));
            }
            table.rows.push(row);
        }
        let cfg = AnalysisConfig {
            id_column: "id".into(),
            name_column: Some("name".into()),
            own_price_column: "own".into(),
            competitor_columns: vec!["c1".into()],
            threshold_percent: 5.0,
        };
        analyze(&table, &cfg).unwrap()
    }

    fn ids(table: &AnnotatedTable) -> Vec<String> {
        table.rows.iter().map(|r| r.row.get("id").to_string()).collect()
    }

    #[test]
    fn status_filters_partition_the_table() {
        let table = annotated();
        let flagged = filter(&table, StatusFilter::FlaggedOnly, "", None);
        let rest = filter(&table, StatusFilter::CompetitiveOnly, "", None);
        let all = filter(&table, StatusFilter::All, "", None);

        assert_eq!(ids(&flagged), vec!["1", "4"]);
        assert_eq!(ids(&rest), vec!["2", "3", "5"]);
        assert_eq!(flagged.len() + rest.len(), all.len());
        assert_eq!(all, table);
    }

    #[test]
    fn search_is_case_insensitive_and_skips_missing_names() {
        let table = annotated();
        let found = filter(&table, StatusFilter::All, "kettle", Some("name"));
        assert_eq!(ids(&found), vec!["1", "2", "5"]);

        let found = filter(&table, StatusFilter::FlaggedOnly, "KETTLE", Some("name"));
        assert_eq!(ids(&found), vec!["1"]);
    }

    #[test]
    fn search_needs_a_name_column_and_text() {
        let table = annotated();
        assert_eq!(filter(&table, StatusFilter::All, "kettle", None).len(), 5);
        assert_eq!(filter(&table, StatusFilter::All, "   ", Some("name")).len(), 5);
    }

    #[test]
    fn filtering_keeps_derived_fields() {
        let table = annotated();
        let found = filter(&table, StatusFilter::All, "toaster", Some("name"));
        assert_eq!(found.rows[0], table.rows[2]);
    }
}
