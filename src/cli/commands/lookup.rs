//! `mcp-risk lookup` command - Show one country's reference profile

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::escape_csv;
use crate::cli::OutputFormat;
use crate::core::value::{display_cell, format_number};
use crate::core::{compute_overall_risk, RiskCategory, RiskEngine};

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// Country name (exact, case-sensitive)
    pub country: String,
}

pub fn run(args: LookupArgs, engine: &RiskEngine, format: OutputFormat) -> Result<()> {
    let country = args.country.trim();
    let profile = engine.store().lookup(country).ok_or_else(|| {
        miette::miette!(
            help = "run `mcp-risk countries` to list known countries",
            "Country '{}' not found in reference data",
            country
        )
    })?;

    let overall = compute_overall_risk(&profile.scores)
        .map_err(|e| miette::miette!("Cannot score '{}': {}", country, e))?;

    match format {
        OutputFormat::Json => {
            let mut record = serde_json::Map::new();
            record.insert("Country".to_string(), serde_json::json!(profile.country));
            record.insert("Overall Risk Score".to_string(), serde_json::json!(overall));
            for (column, cell) in &profile.scores {
                let value = cell
                    .as_ref()
                    .map_or(serde_json::Value::Null, |c| c.to_json());
                record.insert(column.clone(), value);
            }
            let json = serde_json::to_string_pretty(&record).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            println!("Column,Value,Weight");
            println!("Overall Risk Score,{},", overall.map_or(String::new(), format_number));
            for (column, cell) in &profile.scores {
                let weight = RiskCategory::from_column(column)
                    .map_or(String::new(), |c| c.weight().to_string());
                println!("{},{},{}", escape_csv(column), escape_csv(&display_cell(cell.as_ref(), "")), weight);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Column", "Value", "Weight"]);
            builder.push_record([
                "Overall Risk Score".to_string(),
                overall.map_or("-".to_string(), format_number),
                String::new(),
            ]);
            for (column, cell) in &profile.scores {
                let weight = RiskCategory::from_column(column)
                    .map_or(String::new(), |c| format!("{:.2}", c.weight()));
                builder.push_record([column.clone(), display_cell(cell.as_ref(), "-"), weight]);
            }

            let style_markdown = format == OutputFormat::Md;
            let mut table = builder.build();
            if style_markdown {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            println!("{}", profile.country);
            println!("{}", table);
        }
    }

    Ok(())
}
