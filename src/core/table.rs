//! Result table formatting and rendering
//!
//! Column order is fixed: `Supplier Name`, `Country`, `Overall Risk Score`,
//! then every other column in lexicographic order. `ISO2` and `ISO3` never
//! appear in the output.

use std::collections::BTreeSet;
use tabled::{builder::Builder, settings::Style};

use crate::core::engine::SupplierRiskResult;
use crate::core::reference::{COUNTRY_COLUMN, OVERALL_COLUMN, SUPPLIER_COLUMN};
use crate::core::value::{display_cell, CellValue};

/// Leading columns of every result table
pub const IDENTITY_COLUMNS: [&str; 3] = [SUPPLIER_COLUMN, COUNTRY_COLUMN, OVERALL_COLUMN];

/// Identifier columns dropped from results
pub const EXCLUDED_COLUMNS: [&str; 2] = ["ISO2", "ISO3"];

/// Placeholder for null cells in human-readable renderings
const NULL_DISPLAY: &str = "-";

/// Ordered rows and columns ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RiskTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<CellValue>>>,
}

/// Arrange results into a table with deterministic column order
pub fn format_risk_table(results: &[SupplierRiskResult]) -> RiskTable {
    let extra: BTreeSet<&str> = results
        .iter()
        .flat_map(|r| r.scores.keys().map(String::as_str))
        .filter(|name| !IDENTITY_COLUMNS.contains(name) && !EXCLUDED_COLUMNS.contains(name))
        .collect();

    let mut columns: Vec<String> = IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(extra.into_iter().map(str::to_string));

    let rows = results
        .iter()
        .map(|result| {
            let mut row = Vec::with_capacity(columns.len());
            row.push(Some(CellValue::from(result.supplier_name.as_str())));
            row.push(Some(CellValue::from(result.country.as_str())));
            row.push(result.overall_risk_score.map(CellValue::Number));
            for column in &columns[IDENTITY_COLUMNS.len()..] {
                row.push(result.scores.get(column).cloned().flatten());
            }
            row
        })
        .collect();

    RiskTable { columns, rows }
}

impl RiskTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<CellValue>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` for the named column
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// CSV with a header row; null cells are empty
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| display_cell(cell.as_ref(), "")))?;
        }
        let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// One JSON object per row, keys in column order
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let value = cell
                            .as_ref()
                            .map_or(serde_json::Value::Null, CellValue::to_json);
                        (column.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Pretty-printed JSON array of records
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_records())
    }

    /// HTML table styled for Bootstrap
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<table border=\"1\" class=\"dataframe table table-striped table-bordered\">\n");
        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
        for column in &self.columns {
            html.push_str(&format!("      <th>{}</th>\n", escape_html(column)));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for row in &self.rows {
            html.push_str("    <tr>\n");
            for cell in row {
                html.push_str(&format!(
                    "      <td>{}</td>\n",
                    escape_html(&display_cell(cell.as_ref(), NULL_DISPLAY))
                ));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>\n");
        html
    }

    /// Markdown table
    pub fn to_markdown(&self) -> String {
        self.builder().build().with(Style::markdown()).to_string()
    }

    /// Boxed table for terminal display
    pub fn to_text(&self) -> String {
        self.builder().build().with(Style::rounded()).to_string()
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(String::as_str));
        for row in &self.rows {
            builder.push_record(row.iter().map(|cell| display_cell(cell.as_ref(), NULL_DISPLAY)));
        }
        builder
    }
}

/// Escape text for inclusion in HTML element content
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::CategoryScores;

    fn result(name: &str, country: &str, overall: Option<f64>, cells: &[(&str, Option<CellValue>)]) -> SupplierRiskResult {
        SupplierRiskResult {
            supplier_name: name.to_string(),
            country: country.to_string(),
            overall_risk_score: overall,
            scores: cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<CategoryScores>(),
        }
    }

    #[test]
    fn test_column_order_and_exclusions() {
        let table = format_risk_table(&[result(
            "Acme",
            "Freedonia",
            Some(15.0),
            &[
                ("Water", Some(3.0.into())),
                ("Forced_Labor", Some(10.0.into())),
                ("ISO2", Some("FD".into())),
            ],
        )]);
        assert_eq!(
            table.columns(),
            &["Supplier Name", "Country", "Overall Risk Score", "Forced_Labor", "Water"]
        );
    }

    #[test]
    fn test_empty_results_keep_identity_columns() {
        let table = format_risk_table(&[]);
        assert_eq!(table.columns(), &["Supplier Name", "Country", "Overall Risk Score"]);
        assert!(table.is_empty());
        assert_eq!(table.to_csv().unwrap(), "Supplier Name,Country,Overall Risk Score\n");
        assert_eq!(table.to_json().unwrap(), "[]");
    }

    #[test]
    fn test_union_of_columns_across_rows() {
        let table = format_risk_table(&[
            result("A", "X", None, &[("Wages", Some(1.0.into()))]),
            result("B", "Y", None, &[("Biodiversity", Some(2.0.into()))]),
        ]);
        assert_eq!(
            &table.columns()[3..],
            &["Biodiversity".to_string(), "Wages".to_string()]
        );
        assert_eq!(table.cell(0, "Biodiversity"), None);
        assert_eq!(table.cell(1, "Biodiversity"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_lexicographic_is_byte_order() {
        let table = format_risk_table(&[result(
            "A",
            "X",
            None,
            &[("water", None), ("Water", None), ("GHG_Emissions", None)],
        )]);
        assert_eq!(&table.columns()[3..], &["GHG_Emissions", "Water", "water"]);
    }

    #[test]
    fn test_csv_output() {
        let table = format_risk_table(&[
            result("Acme, Inc.", "Freedonia", Some(15.0), &[("Water", None), ("Wages", Some(12.35.into()))]),
            result("Ghost", "Atlantis", None, &[("Water", None), ("Wages", None)]),
        ]);
        let csv = table.to_csv().unwrap();
        assert_eq!(
            csv,
            "Supplier Name,Country,Overall Risk Score,Wages,Water\n\
             \"Acme, Inc.\",Freedonia,15.0,12.35,\n\
             Ghost,Atlantis,,,\n"
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let table = format_risk_table(&[
            result("Acme", "Freedonia", Some(15.0), &[("Forced_Labor", Some(10.0.into()))]),
            result("Beta", "Sylvania", Some(4.67), &[("Forced_Labor", Some(4.0.into()))]),
            result("Ghost", "Atlantis", None, &[("Forced_Labor", None)]),
        ]);
        let csv = table.to_csv().unwrap();

        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let parsed: Vec<(String, Option<f64>)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[1].to_string(), r[2].parse::<f64>().ok())
            })
            .collect();
        assert_eq!(
            parsed,
            vec![
                ("Freedonia".to_string(), Some(15.0)),
                ("Sylvania".to_string(), Some(4.67)),
                ("Atlantis".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_records_use_json_null() {
        let table = format_risk_table(&[result("Ghost", "Atlantis", None, &[("Water", None)])]);
        let records = table.to_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Country"], serde_json::json!("Atlantis"));
        assert_eq!(records[0]["Overall Risk Score"], serde_json::Value::Null);
        assert_eq!(records[0]["Water"], serde_json::Value::Null);
        let keys: Vec<_> = records[0].keys().cloned().collect();
        assert_eq!(keys, table.columns());
    }

    #[test]
    fn test_html_escapes_cells() {
        let table = format_risk_table(&[result("<Acme & Co>", "Freedonia", Some(1.5), &[])]);
        let html = table.to_html();
        assert!(html.starts_with("<table border=\"1\" class=\"dataframe table table-striped table-bordered\">"));
        assert!(html.contains("<td>&lt;Acme &amp; Co&gt;</td>"));
        assert!(html.contains("<th>Overall Risk Score</th>"));
    }

    #[test]
    fn test_markdown_and_text_render_nulls() {
        let table = format_risk_table(&[result("Ghost", "Atlantis", None, &[])]);
        let md = table.to_markdown();
        assert!(md.contains("| Supplier Name |"));
        assert!(md.contains("| -  "));
        assert!(table.to_text().contains("Atlantis"));
    }
}
