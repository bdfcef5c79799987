//! Supplier list parsing
//!
//! Two input shapes are accepted: a CSV file whose first row is a header, and
//! free text with one `supplier name, country` pair per line.

use csv::ReaderBuilder;
use std::io::Read;

use crate::core::engine::SupplierRecord;

/// Header words that mark the first line of pasted text as a header
const HEADER_HINTS: [&str; 2] = ["supplier name", "country"];

/// Parse a supplier CSV. The first row is always treated as a header.
///
/// Rows with fewer than two fields, or with a blank name or country, are
/// skipped. Columns past the second are ignored.
pub fn parse_csv_suppliers<R: Read>(reader: R) -> Result<Vec<SupplierRecord>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut suppliers = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() < 2 {
            tracing::debug!(row = row_idx + 2, "skipping short supplier row");
            continue;
        }
        if let Some(supplier) = non_blank(&record[0], &record[1]) {
            suppliers.push(supplier);
        }
    }

    Ok(suppliers)
}

/// Parse pasted `name, country` lines
///
/// Each line is split on its first comma only, so country names containing
/// commas survive. The first line is dropped if it looks like a header.
pub fn parse_text_suppliers(text: &str) -> Vec<SupplierRecord> {
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = match lines.first() {
        Some(first) if looks_like_header(first) => 1,
        _ => 0,
    };

    let mut suppliers = Vec::new();
    for (line_idx, line) in lines.iter().enumerate().skip(start) {
        match line.split_once(',') {
            Some((name, country)) => {
                if let Some(supplier) = non_blank(name, country) {
                    suppliers.push(supplier);
                }
            }
            None if line.trim().is_empty() => {}
            None => {
                tracing::warn!(line = line_idx + 1, "skipping line without a comma: {}", line.trim());
            }
        }
    }

    suppliers
}

fn looks_like_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_HINTS.iter().any(|hint| lower.contains(hint))
}

fn non_blank(name: &str, country: &str) -> Option<SupplierRecord> {
    let record = SupplierRecord::new(name, country);
    if record.name.is_empty() || record.country.is_empty() {
        None
    } else {
        Some(record)
    }
}
