//! Core module - reference data, scoring and result tables

pub mod config;
pub mod engine;
pub mod input;
pub mod reference;
pub mod table;
pub mod value;
pub mod weights;

pub use config::Config;
pub use engine::{
    compute_overall_risk, NoValidInputError, PerRecordError, RecordOutcome, RiskEngine,
    SupplierRecord, SupplierRiskResult,
};
pub use input::{parse_csv_suppliers, parse_text_suppliers};
pub use reference::{CategoryScores, CountryRiskProfile, LoadError, ReferenceStore};
pub use table::{format_risk_table, RiskTable};
pub use value::CellValue;
pub use weights::{RiskCategory, CATEGORY_WEIGHTS};
