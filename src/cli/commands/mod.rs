//! CLI command implementations

pub mod calculate;
pub mod completions;
pub mod countries;
pub mod lookup;
pub mod weights;
