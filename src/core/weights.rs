//! Weighted risk categories
//!
//! Human-rights categories carry the largest weights, followed by worker
//! safety and pay, then environmental and governance categories.

use std::fmt;

/// One of the twelve risk categories that contribute to the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskCategory {
    ForcedLabor,
    ChildLabor,
    GenderBasedViolence,
    HealthAndSafety,
    Wages,
    HazardousChemicals,
    BriberyAndCorruption,
    Water,
    GhgEmissions,
    WorkingTime,
    TradeUnions,
    Biodiversity,
}

/// Category weights in descending order of weight; sums to 1.00
pub const CATEGORY_WEIGHTS: [(RiskCategory, f64); 12] = [
    (RiskCategory::ForcedLabor, 0.15),
    (RiskCategory::ChildLabor, 0.15),
    (RiskCategory::GenderBasedViolence, 0.12),
    (RiskCategory::HealthAndSafety, 0.10),
    (RiskCategory::Wages, 0.10),
    (RiskCategory::HazardousChemicals, 0.08),
    (RiskCategory::BriberyAndCorruption, 0.08),
    (RiskCategory::Water, 0.06),
    (RiskCategory::GhgEmissions, 0.06),
    (RiskCategory::WorkingTime, 0.05),
    (RiskCategory::TradeUnions, 0.03),
    (RiskCategory::Biodiversity, 0.02),
];

impl RiskCategory {
    /// Column name used in reference sources and result tables
    pub fn column(&self) -> &'static str {
        match self {
            RiskCategory::ForcedLabor => "Forced_Labor",
            RiskCategory::ChildLabor => "Child_Labor",
            RiskCategory::GenderBasedViolence => "Gender_Based_Violence",
            RiskCategory::HealthAndSafety => "Health_and_Safety",
            RiskCategory::Wages => "Wages",
            RiskCategory::HazardousChemicals => "Hazardous_Chemicals",
            RiskCategory::BriberyAndCorruption => "Bribery_and_Corruption",
            RiskCategory::Water => "Water",
            RiskCategory::GhgEmissions => "GHG_Emissions",
            RiskCategory::WorkingTime => "Working_Time",
            RiskCategory::TradeUnions => "Trade_Unions",
            RiskCategory::Biodiversity => "Biodiversity",
        }
    }

    /// Weight of this category in the overall score
    pub fn weight(&self) -> f64 {
        CATEGORY_WEIGHTS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }

    /// Look up a category by its exact (case-sensitive) column name
    pub fn from_column(name: &str) -> Option<RiskCategory> {
        CATEGORY_WEIGHTS
            .iter()
            .map(|(category, _)| *category)
            .find(|category| category.column() == name)
    }

    /// All categories in weight order
    pub fn all() -> impl Iterator<Item = RiskCategory> {
        CATEGORY_WEIGHTS.iter().map(|(category, _)| *category)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
