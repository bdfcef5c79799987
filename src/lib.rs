//! MCP Risk: supplier country-risk scoring
//!
//! Loads a country risk reference table, scores suppliers by the country they
//! operate in, and renders the results as tables, CSV, JSON or HTML.

pub mod cli;
pub mod core;
