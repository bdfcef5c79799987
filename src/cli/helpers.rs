//! Shared helper functions for CLI commands
//!
//! Engine construction, output format resolution and output writing used
//! across the command modules.

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, ReferenceStore, RiskEngine, RiskTable};

/// Build the scoring engine from the reference path given on the command
/// line, falling back to configuration
pub fn load_engine(global: &GlobalOpts, config: &Config) -> Result<RiskEngine> {
    let path = global
        .reference
        .clone()
        .or_else(|| config.reference.clone())
        .ok_or_else(|| {
            miette::miette!(
                help = "pass --reference <FILE>, set MCP_RISK_REFERENCE, or add `reference:` to .mcp-risk.yaml",
                "No country risk reference data configured"
            )
        })?;

    let store = ReferenceStore::load(&path)?;
    tracing::info!(
        countries = store.len(),
        path = %path.display(),
        "reference data loaded"
    );
    Ok(RiskEngine::new(store))
}

/// Resolve `auto` against the configured default format
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }

    config
        .default_format
        .as_deref()
        .and_then(|name| match OutputFormat::from_str(name, true) {
            Ok(format) => Some(format),
            Err(_) => {
                tracing::warn!(format = name, "ignoring unknown default_format in config");
                None
            }
        })
        .filter(|format| *format != OutputFormat::Auto)
        .unwrap_or(OutputFormat::Table)
}

/// Render a result table in the requested format
pub fn render_table(table: &RiskTable, format: OutputFormat) -> Result<String> {
    let mut rendered = match format {
        OutputFormat::Csv => return table.to_csv().into_diagnostic(),
        OutputFormat::Json => table.to_json().into_diagnostic()?,
        OutputFormat::Html => return Ok(table.to_html()),
        OutputFormat::Md => table.to_markdown(),
        OutputFormat::Auto | OutputFormat::Table => table.to_text(),
    };
    rendered.push('\n');
    Ok(rendered)
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write to a file if given, otherwise stdout
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            eprintln!("Output written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
