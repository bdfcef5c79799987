//! Reference store: country-indexed risk category scores loaded from CSV
//!
//! The store is read once at startup and never mutated afterwards. Lookups
//! are exact, case-sensitive matches on the `Country` column.

use csv::ReaderBuilder;
use miette::Diagnostic;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::value::CellValue;

/// Key column of every reference source
pub const COUNTRY_COLUMN: &str = "Country";

/// Precomputed aggregate that is always dropped and recomputed
pub const OVERALL_COLUMN: &str = "Overall Risk Score";

/// Output identifier that must not be shadowed by a source column
pub const SUPPLIER_COLUMN: &str = "Supplier Name";

/// Column name → cell, with `None` for null cells
pub type CategoryScores = BTreeMap<String, Option<CellValue>>;

/// Errors raised while loading a reference source
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read reference data {path:?}: {source}")]
    #[diagnostic(code(mcp_risk::reference::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed reference data in {source_name}: {source}")]
    #[diagnostic(code(mcp_risk::reference::parse))]
    Parse {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("reference data {source_name} has no 'Country' column")]
    #[diagnostic(
        code(mcp_risk::reference::missing_country),
        help("the first row must be a header containing a 'Country' column")
    )]
    MissingCountryColumn { source_name: String },

    #[error("reference data {source_name} repeats column '{column}'")]
    #[diagnostic(code(mcp_risk::reference::duplicate_column))]
    DuplicateColumn { source_name: String, column: String },

    #[error("row {row} of {source_name} has {found} fields but the header has {expected}")]
    #[diagnostic(code(mcp_risk::reference::row_length))]
    RowTooLong {
        source_name: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("country '{country}' appears twice in {source_name} (rows {first_row} and {duplicate_row})")]
    #[diagnostic(
        code(mcp_risk::reference::duplicate_country),
        help("each country may appear only once; remove or merge the duplicate row")
    )]
    DuplicateCountry {
        source_name: String,
        country: String,
        first_row: usize,
        duplicate_row: usize,
    },
}

/// Risk data for one country
#[derive(Debug, Clone, PartialEq)]
pub struct CountryRiskProfile {
    pub country: String,
    pub scores: CategoryScores,
}

impl CountryRiskProfile {
    /// Get a non-null cell by column name
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.scores.get(column).and_then(|v| v.as_ref())
    }
}

/// Immutable country → profile lookup table
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    source: String,
    columns: Vec<String>,
    order: Vec<String>,
    profiles: HashMap<String, CountryRiskProfile>,
}

impl ReferenceStore {
    /// Load a reference CSV from disk
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Load reference CSV data from any reader; `source_name` is used in errors
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, LoadError> {
        let parse_err = |source: csv::Error| LoadError::Parse {
            source_name: source_name.to_string(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(parse_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let country_idx = headers
            .iter()
            .position(|h| h == COUNTRY_COLUMN)
            .ok_or_else(|| LoadError::MissingCountryColumn {
                source_name: source_name.to_string(),
            })?;

        // (column index, column name) for every data column kept in profiles
        let mut data_columns: Vec<(usize, String)> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == country_idx || header == OVERALL_COLUMN {
                continue;
            }
            if header == SUPPLIER_COLUMN || header == COUNTRY_COLUMN {
                tracing::warn!(column = %header, source = source_name, "ignoring reserved column in reference data");
                continue;
            }
            if data_columns.iter().any(|(_, name)| name == header) {
                return Err(LoadError::DuplicateColumn {
                    source_name: source_name.to_string(),
                    column: header.clone(),
                });
            }
            data_columns.push((idx, header.clone()));
        }

        let mut order = Vec::new();
        let mut first_rows: HashMap<String, usize> = HashMap::new();
        let mut profiles = HashMap::new();

        for (row_idx, result) in rdr.records().enumerate() {
            // Header is row 1
            let row_num = row_idx + 2;
            let record = result.map_err(parse_err)?;

            if record.len() > headers.len() {
                return Err(LoadError::RowTooLong {
                    source_name: source_name.to_string(),
                    row: row_num,
                    found: record.len(),
                    expected: headers.len(),
                });
            }

            let country = record.get(country_idx).unwrap_or("").trim().to_string();
            if country.is_empty() {
                tracing::warn!(row = row_num, source = source_name, "skipping reference row without a country");
                continue;
            }

            if let Some(&first_row) = first_rows.get(&country) {
                return Err(LoadError::DuplicateCountry {
                    source_name: source_name.to_string(),
                    country,
                    first_row,
                    duplicate_row: row_num,
                });
            }

            let scores: CategoryScores = data_columns
                .iter()
                .map(|(idx, name)| {
                    let cell = record.get(*idx).and_then(CellValue::parse);
                    (name.clone(), cell)
                })
                .collect();

            first_rows.insert(country.clone(), row_num);
            order.push(country.clone());
            profiles.insert(country.clone(), CountryRiskProfile { country, scores });
        }

        tracing::debug!(
            countries = order.len(),
            columns = data_columns.len(),
            source = source_name,
            "loaded reference data"
        );

        Ok(Self {
            source: source_name.to_string(),
            columns: data_columns.into_iter().map(|(_, name)| name).collect(),
            order,
            profiles,
        })
    }

    /// Profile for a country, or `None` if the country is unknown
    pub fn lookup(&self, country: &str) -> Option<&CountryRiskProfile> {
        self.profiles.get(country)
    }

    /// Data columns in source order (excludes `Country` and `Overall Risk Score`)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Countries in source order
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Name of the source this store was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }
}
