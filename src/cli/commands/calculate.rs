//! `mcp-risk calculate` command - Score a supplier list

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufReader, IsTerminal, Read};
use std::path::PathBuf;

use crate::cli::helpers::{render_table, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{parse_csv_suppliers, parse_text_suppliers, RiskEngine, SupplierRecord};

#[derive(clap::Args, Debug)]
pub struct CalculateArgs {
    /// Supplier CSV (header row, then name,country); `-` or omitted reads pasted lines from stdin
    pub file: Option<PathBuf>,

    /// Inline `name, country` lines instead of a file
    #[arg(long, short = 'd', conflicts_with = "file")]
    pub data: Option<String>,

    /// Treat FILE as pasted `name, country` lines rather than CSV
    #[arg(long)]
    pub text: bool,

    /// Output to file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: CalculateArgs, engine: &RiskEngine, format: OutputFormat, global: &GlobalOpts) -> Result<()> {
    let suppliers = read_suppliers(&args)?;
    tracing::debug!(count = suppliers.len(), "parsed supplier list");

    let table = engine.assess(&suppliers)?;
    let rendered = render_table(&table, format)?;
    write_output(&rendered, args.output.as_deref())?;

    if !global.quiet {
        let skipped = suppliers.len() - table.len();
        let unscored = (0..table.len())
            .filter(|&row| table.cell(row, "Overall Risk Score").is_none())
            .count();

        eprintln!(
            "{} Scored {} supplier(s)",
            style("✓").green(),
            style(table.len()).cyan()
        );
        if unscored > 0 {
            eprintln!(
                "{} {} supplier(s) have no overall score (unknown country or no category data)",
                style("!").yellow(),
                unscored
            );
        }
        if skipped > 0 {
            eprintln!(
                "{} {} supplier(s) skipped due to invalid reference data",
                style("✗").red(),
                skipped
            );
        }
    }

    Ok(())
}

fn read_suppliers(args: &CalculateArgs) -> Result<Vec<SupplierRecord>> {
    if let Some(ref data) = args.data {
        return Ok(parse_text_suppliers(data));
    }

    match args.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            if !path.exists() {
                return Err(miette::miette!("File not found: {}", path.display()));
            }
            let file = File::open(path).into_diagnostic()?;
            if args.text {
                let mut text = String::new();
                BufReader::new(file).read_to_string(&mut text).into_diagnostic()?;
                Ok(parse_text_suppliers(&text))
            } else {
                parse_csv_suppliers(BufReader::new(file))
                    .map_err(|e| miette::miette!("Invalid supplier CSV {}: {}", path.display(), e))
            }
        }
        _ => {
            let stdin = std::io::stdin();
            let interactive = stdin.is_terminal();
            read_pasted(stdin.lock(), interactive)
        }
    }
}

/// Read pasted `name, country` lines, refusing to wait on an interactive terminal
fn read_pasted<R: Read>(mut reader: R, interactive: bool) -> Result<Vec<SupplierRecord>> {
    if interactive {
        return Err(miette::miette!(
            help = "pass a supplier CSV, use --data \"name, country\", or pipe lines into stdin",
            "No supplier list given"
        ));
    }

    let mut text = String::new();
    reader.read_to_string(&mut text).into_diagnostic()?;
    Ok(parse_text_suppliers(&text))
}
