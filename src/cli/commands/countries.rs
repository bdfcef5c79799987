//! `mcp-risk countries` command - List countries in the reference data

use miette::{IntoDiagnostic, Result};

use crate::cli::OutputFormat;
use crate::core::RiskEngine;

#[derive(clap::Args, Debug)]
pub struct CountriesArgs {
    /// Only show countries containing this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: CountriesArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    let needle = args.search.as_deref().map(str::to_lowercase);
    let countries: Vec<&str> = engine
        .store()
        .countries()
        .filter(|c| needle.as_ref().map_or(true, |n| c.to_lowercase().contains(n)))
        .collect();

    if args.count {
        println!("{}", countries.len());
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&countries).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            print!("{}", to_csv(&countries).into_diagnostic()?);
        }
        _ => {
            if countries.is_empty() {
                println!("No countries found.");
            }
            for country in &countries {
                println!("{}", country);
            }
        }
    }

    Ok(())
}

/// Single-column CSV of country names with a `Country` header
fn to_csv(countries: &[&str]) -> Result<String, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Country"])?;
    for country in countries {
        wtr.write_record([country])?;
    }
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_csv_quotes_commas() {
        let csv = to_csv(&["Freedonia", "Korea, Republic of"]).unwrap();
        assert_eq!(csv, "Country\nFreedonia\n\"Korea, Republic of\"\n");

        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let names: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_string()).collect();
        assert_eq!(names, vec!["Freedonia", "Korea, Republic of"]);
    }
}
