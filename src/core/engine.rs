//! Risk engine: resolves suppliers against the reference store and computes
//! the weighted overall risk score.
//!
//! # Scoring
//!
//! The overall score is a weighted average over the recognized categories
//! that have a value for the country. Missing or null categories drop out of
//! both the numerator and the denominator, so a country with only two scored
//! categories is averaged over those two. A country with no scored
//! categories has no overall score.
//!
//! Scores are rounded to two decimals, half away from zero, on the shortest
//! decimal form of the average (`0.125` → `0.13`, `0.135` → `0.14`).

use miette::Diagnostic;
use thiserror::Error;

use crate::core::reference::{CategoryScores, CountryRiskProfile, ReferenceStore};
use crate::core::table::{format_risk_table, RiskTable};
use crate::core::value::CellValue;
use crate::core::weights::CATEGORY_WEIGHTS;

/// One supplier to be scored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRecord {
    pub name: String,
    pub country: String,
}

impl SupplierRecord {
    /// Create a record, trimming surrounding whitespace from both fields
    pub fn new(name: impl AsRef<str>, country: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            country: country.as_ref().trim().to_string(),
        }
    }
}

/// Scored supplier
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierRiskResult {
    pub supplier_name: String,
    pub country: String,
    pub overall_risk_score: Option<f64>,
    /// Every reference column for the country; all null for unknown countries
    pub scores: CategoryScores,
}

/// A failure confined to a single supplier; the rest of the batch continues
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerRecordError {
    #[error("supplier record has an empty {field}")]
    BlankField { field: &'static str },

    #[error("'{column}' holds non-numeric value '{value}'")]
    NonNumericScore { column: String, value: String },
}

/// Result of scoring one input record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Scored(SupplierRiskResult),
    Skipped {
        supplier: String,
        reason: PerRecordError,
    },
}

/// The caller supplied nothing that could be scored
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum NoValidInputError {
    #[error("No valid supplier data provided")]
    #[diagnostic(
        code(mcp_risk::input::empty),
        help("provide at least one 'supplier name, country' line")
    )]
    EmptySupplierList,

    #[error("None of the {skipped} supplier record(s) could be scored")]
    #[diagnostic(code(mcp_risk::input::no_usable_records))]
    NoUsableRecords { skipped: usize },
}

/// Weighted average of the recognized categories present in `scores`
///
/// Returns `Ok(None)` when no recognized category has a value. Unrecognized
/// columns are ignored.
pub fn compute_overall_risk(scores: &CategoryScores) -> Result<Option<f64>, PerRecordError> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (category, weight) in CATEGORY_WEIGHTS.iter() {
        let column = category.column();
        match scores.get(column) {
            Some(Some(CellValue::Number(score))) => {
                weighted_sum += score * weight;
                total_weight += weight;
            }
            Some(Some(CellValue::Text(value))) => {
                return Err(PerRecordError::NonNumericScore {
                    column: column.to_string(),
                    value: value.clone(),
                });
            }
            Some(None) | None => {}
        }
    }

    if total_weight == 0.0 {
        return Ok(None);
    }

    Ok(Some(round_hundredths(weighted_sum / total_weight)))
}

/// Round to two decimals, half away from zero, using the shortest decimal
/// representation of `value`
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if frac_part.len() <= 2 {
        return value;
    }

    let digits = format!("{}{}", int_part, &frac_part[..2]);
    let Ok(mut cents) = digits.parse::<u128>() else {
        return (value * 100.0).round() / 100.0;
    };
    if frac_part.as_bytes()[2] >= b'5' {
        cents += 1;
    }

    let rounded = cents as f64 / 100.0;
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

/// Scoring context built once at startup and shared by every request
#[derive(Debug, Clone)]
pub struct RiskEngine {
    store: ReferenceStore,
}

impl RiskEngine {
    pub fn new(store: ReferenceStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    /// Score a single record
    pub fn score(&self, record: &SupplierRecord) -> Result<SupplierRiskResult, PerRecordError> {
        if record.name.trim().is_empty() {
            return Err(PerRecordError::BlankField { field: "supplier name" });
        }
        if record.country.trim().is_empty() {
            return Err(PerRecordError::BlankField { field: "country" });
        }

        match self.store.lookup(&record.country) {
            Some(profile) => self.score_known(record, profile),
            None => Ok(self.score_unknown(record)),
        }
    }

    fn score_known(
        &self,
        record: &SupplierRecord,
        profile: &CountryRiskProfile,
    ) -> Result<SupplierRiskResult, PerRecordError> {
        let overall = compute_overall_risk(&profile.scores)?;
        Ok(SupplierRiskResult {
            supplier_name: record.name.clone(),
            country: record.country.clone(),
            overall_risk_score: overall,
            scores: profile.scores.clone(),
        })
    }

    fn score_unknown(&self, record: &SupplierRecord) -> SupplierRiskResult {
        tracing::debug!(country = %record.country, "country not in reference data");
        SupplierRiskResult {
            supplier_name: record.name.clone(),
            country: record.country.clone(),
            overall_risk_score: None,
            scores: self
                .store
                .columns()
                .iter()
                .map(|column| (column.clone(), None))
                .collect(),
        }
    }

    /// Score every record, keeping one outcome per input in input order
    pub fn evaluate(&self, records: &[SupplierRecord]) -> Vec<RecordOutcome> {
        records
            .iter()
            .map(|record| match self.score(record) {
                Ok(result) => RecordOutcome::Scored(result),
                Err(reason) => RecordOutcome::Skipped {
                    supplier: record.name.clone(),
                    reason,
                },
            })
            .collect()
    }

    /// Score every record, dropping (and logging) records that fail
    pub fn process_supplier_list(&self, records: &[SupplierRecord]) -> Vec<SupplierRiskResult> {
        self.evaluate(records)
            .into_iter()
            .filter_map(|outcome| match outcome {
                RecordOutcome::Scored(result) => Some(result),
                RecordOutcome::Skipped { supplier, reason } => {
                    tracing::warn!(supplier = %supplier, "skipping supplier: {}", reason);
                    None
                }
            })
            .collect()
    }

    /// Score a supplier list and format it, rejecting input with nothing usable
    pub fn assess(&self, records: &[SupplierRecord]) -> Result<RiskTable, NoValidInputError> {
        if records.is_empty() {
            return Err(NoValidInputError::EmptySupplierList);
        }

        let results = self.process_supplier_list(records);
        if results.is_empty() {
            return Err(NoValidInputError::NoUsableRecords {
                skipped: records.len(),
            });
        }

        Ok(format_risk_table(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "\
Country,ISO2,ISO3,Forced_Labor,Child_Labor,Water,Wages,Region,Overall Risk Score
Freedonia,FD,FRD,10,20,,,North,1
Sylvania,SY,SYL,4,4,8,NA,South,2
Grand Fenwick,GF,GFW,,,,,West,3
Ruritania,RU,RUR,high,5,5,5,East,4
";

    fn engine() -> RiskEngine {
        RiskEngine::new(ReferenceStore::from_reader(REFERENCE.as_bytes(), "test.csv").unwrap())
    }

    fn scores(pairs: &[(&str, Option<CellValue>)]) -> CategoryScores {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_empty_scores_have_no_overall() {
        assert_eq!(compute_overall_risk(&CategoryScores::new()), Ok(None));
    }

    #[test]
    fn test_null_scores_have_no_overall() {
        let s = scores(&[("Forced_Labor", None), ("Water", None)]);
        assert_eq!(compute_overall_risk(&s), Ok(None));
    }

    #[test]
    fn test_subset_is_renormalized() {
        let s = scores(&[
            ("Forced_Labor", Some(10.0.into())),
            ("Child_Labor", Some(20.0.into())),
        ]);
        assert_eq!(compute_overall_risk(&s), Ok(Some(15.0)));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let base = scores(&[
            ("Forced_Labor", Some(10.0.into())),
            ("Water", Some(3.0.into())),
        ]);
        let mut extended = base.clone();
        extended.insert("Region".to_string(), Some("North".into()));
        extended.insert("Literacy".to_string(), Some(99.0.into()));
        extended.insert("forced_labor".to_string(), Some(1000.0.into()));

        assert_eq!(compute_overall_risk(&base), compute_overall_risk(&extended));
    }

    #[test]
    fn test_full_weighting() {
        // Every category scores 5 except Forced_Labor at 10:
        // (10*0.15 + 5*0.85) / 1.0 = 5.75
        let mut s = CategoryScores::new();
        for category in crate::core::weights::RiskCategory::all() {
            s.insert(category.column().to_string(), Some(5.0.into()));
        }
        s.insert("Forced_Labor".to_string(), Some(10.0.into()));
        assert_eq!(compute_overall_risk(&s), Ok(Some(5.75)));
    }

    #[test]
    fn test_text_in_weighted_column_is_record_error() {
        let s = scores(&[("Water", Some("dry".into()))]);
        assert!(matches!(
            compute_overall_risk(&s),
            Err(PerRecordError::NonNumericScore { .. })
        ));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round_hundredths(0.125), 0.13);
        assert_eq!(round_hundredths(0.135), 0.14);
        assert_eq!(round_hundredths(1.005), 1.01);
        assert_eq!(round_hundredths(2.675), 2.68);
        assert_eq!(round_hundredths(-0.125), -0.13);
        assert_eq!(round_hundredths(0.124), 0.12);
        assert_eq!(round_hundredths(15.000000000000002), 15.0);
        assert_eq!(round_hundredths(7.0), 7.0);
        assert_eq!(round_hundredths(3.45), 3.45);
    }

    #[test]
    fn test_known_country() {
        let results = engine().process_supplier_list(&[SupplierRecord::new("Acme", "Freedonia")]);
        assert_eq!(results.len(), 1);
        let acme = &results[0];
        assert_eq!(acme.supplier_name, "Acme");
        assert_eq!(acme.overall_risk_score, Some(15.0));
        assert_eq!(acme.scores.get("ISO2"), Some(&Some("FD".into())));
        assert!(!acme.scores.contains_key("Overall Risk Score"));
    }

    #[test]
    fn test_unknown_country_is_null_row() {
        let results = engine().process_supplier_list(&[SupplierRecord::new("Ghost Co", "Atlantis")]);
        assert_eq!(results.len(), 1);
        let ghost = &results[0];
        assert_eq!(ghost.country, "Atlantis");
        assert_eq!(ghost.overall_risk_score, None);
        assert!(ghost.scores.values().all(Option::is_none));
        for category in crate::core::weights::RiskCategory::all() {
            if let Some(cell) = ghost.scores.get(category.column()) {
                assert!(cell.is_none());
            }
        }
        assert_eq!(ghost.scores.get("Forced_Labor"), Some(&None));
    }

    #[test]
    fn test_country_without_scores() {
        let results = engine().process_supplier_list(&[SupplierRecord::new("Mouse", "Grand Fenwick")]);
        assert_eq!(results[0].overall_risk_score, None);
        assert_eq!(results[0].scores.get("Region"), Some(&Some("West".into())));
    }

    #[test]
    fn test_text_passthrough_reaches_table() {
        let eng = engine();
        let results = eng.process_supplier_list(&[
            SupplierRecord::new("Acme", "Freedonia"),
            SupplierRecord::new("Ghost Co", "Atlantis"),
        ]);
        let table = format_risk_table(&results);

        assert_eq!(table.cell(0, "Region"), Some(&CellValue::from("North")));
        assert_eq!(table.cell(0, "Overall Risk Score"), Some(&CellValue::Number(15.0)));
        assert_eq!(table.cell(1, "Region"), None);
        assert!(table.columns().iter().any(|c| c == "Region"));
    }

    #[test]
    fn test_order_and_length_preserved() {
        let records = vec![
            SupplierRecord::new("B", "Sylvania"),
            SupplierRecord::new("A", "Atlantis"),
            SupplierRecord::new("C", "Freedonia"),
            SupplierRecord::new("D", "Sylvania"),
        ];
        let results = engine().process_supplier_list(&records);
        assert_eq!(results.len(), records.len());
        let names: Vec<_> = results.iter().map(|r| r.supplier_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);
        assert_eq!(results[0].overall_risk_score, Some(4.67));
    }

    #[test]
    fn test_bad_record_does_not_abort_batch() {
        let records = vec![
            SupplierRecord::new("Good", "Freedonia"),
            SupplierRecord::new("Bad", "Ruritania"),
            SupplierRecord::new("", "Freedonia"),
            SupplierRecord::new("Also Good", "Atlantis"),
        ];
        let eng = engine();

        let outcomes = eng.evaluate(&records);
        assert_eq!(outcomes.len(), 4);
        assert!(matches!(
            &outcomes[1],
            RecordOutcome::Skipped { supplier, reason: PerRecordError::NonNumericScore { .. } } if supplier == "Bad"
        ));
        assert!(matches!(
            &outcomes[2],
            RecordOutcome::Skipped { reason: PerRecordError::BlankField { field: "supplier name" }, .. }
        ));

        let results = eng.process_supplier_list(&records);
        let names: Vec<_> = results.iter().map(|r| r.supplier_name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Also Good"]);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RiskEngine>();

        let eng = std::sync::Arc::new(engine());
        let handles: Vec<_> = ["Freedonia", "Sylvania"]
            .into_iter()
            .map(|country| {
                let eng = std::sync::Arc::clone(&eng);
                std::thread::spawn(move || {
                    eng.process_supplier_list(&[SupplierRecord::new("X", country)])[0].overall_risk_score
                })
            })
            .collect();
        let scores: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(scores, vec![Some(15.0), Some(4.67)]);
    }

    #[test]
    fn test_assess_empty_input() {
        assert_eq!(
            engine().assess(&[]).unwrap_err(),
            NoValidInputError::EmptySupplierList
        );
    }

    #[test]
    fn test_assess_all_records_skipped() {
        let err = engine()
            .assess(&[SupplierRecord::new("Bad", "Ruritania")])
            .unwrap_err();
        assert_eq!(err, NoValidInputError::NoUsableRecords { skipped: 1 });
    }

    #[test]
    fn test_assess_formats_table() {
        let table = engine()
            .assess(&[SupplierRecord::new("Acme", "Freedonia")])
            .unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.columns().iter().any(|c| c == "ISO2" || c == "ISO3"));
    }
}
