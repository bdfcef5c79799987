//! Typed table cells and the null policy used when reading tabular sources

use std::fmt;

/// Tokens that read as a missing value rather than text
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>",
];

/// A single non-null cell from a reference source or result table
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric score
    Number(f64),
    /// Anything that does not parse as a finite number (ISO codes, region names, ...)
    Text(String),
}

impl CellValue {
    /// Parse a raw cell, returning `None` for null tokens and non-finite numbers
    pub fn parse(raw: &str) -> Option<CellValue> {
        let trimmed = raw.trim();
        if NULL_TOKENS.contains(&trimmed) {
            return None;
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(CellValue::Number(n)),
            Ok(_) => None,
            Err(_) => Some(CellValue::Text(trimmed.to_string())),
        }
    }

    /// Convert to a JSON value (numbers stay numbers)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Format a number the way spreadsheet exports expect: whole numbers keep one
/// decimal (`15.0`), everything else uses the shortest round-trip form
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Render an optional cell for display, using `placeholder` for nulls
pub fn display_cell(cell: Option<&CellValue>, placeholder: &str) -> String {
    cell.map_or_else(|| placeholder.to_string(), |c| c.to_string())
}
