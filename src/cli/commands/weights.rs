//! `mcp-risk weights` command - Show the category weight table

use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;
use crate::core::CATEGORY_WEIGHTS;

#[derive(clap::Args, Debug)]
pub struct WeightsArgs {}

pub fn run(_args: WeightsArgs, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let weights: serde_json::Map<String, serde_json::Value> = CATEGORY_WEIGHTS
                .iter()
                .map(|(category, weight)| (category.column().to_string(), serde_json::json!(weight)))
                .collect();
            let json = serde_json::to_string_pretty(&weights).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            println!("Category,Weight");
            for (category, weight) in CATEGORY_WEIGHTS.iter() {
                println!("{},{:.2}", category, weight);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Category", "Weight"]);
            for (category, weight) in CATEGORY_WEIGHTS.iter() {
                builder.push_record([category.column().to_string(), format!("{:.2}", weight)]);
            }
            let total: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
            builder.push_record(["Total".to_string(), format!("{:.2}", total)]);

            let mut table = builder.build();
            if format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            println!("{}", table);
        }
    }

    Ok(())
}
