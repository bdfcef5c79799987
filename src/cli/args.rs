//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calculate::CalculateArgs, completions::CompletionsArgs, countries::CountriesArgs,
    lookup::LookupArgs, weights::WeightsArgs,
};

#[derive(Parser)]
#[command(name = "mcp-risk")]
#[command(author, version, about = "Supplier country-risk scoring")]
#[command(long_about = "Scores suppliers against a country risk reference table using a weighted average of human-rights, labour, environmental and governance risk categories.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Country risk reference CSV (default: from config or MCP_RISK_REFERENCE)
    #[arg(long, short = 'r', global = true)]
    pub reference: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a supplier list against the reference data
    #[clap(alias = "calc")]
    Calculate(CalculateArgs),

    /// Show the reference profile and overall score for one country
    Lookup(LookupArgs),

    /// List countries in the reference data
    Countries(CountriesArgs),

    /// Show the category weight table
    Weights(WeightsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default, falling back to a terminal table
    #[default]
    Auto,
    /// Boxed table for the terminal
    Table,
    /// Markdown tables
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON list of records (for programming)
    Json,
    /// HTML table (Bootstrap classes)
    Html,
}
