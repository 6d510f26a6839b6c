//! Project every household in a CSV file
//!
//! Outputs one summary line per household

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use retirement_projection::household::load_households;
use retirement_projection::{BatchRunner, ProjectionSummary};

#[derive(Parser, Debug)]
#[command(name = "run_batch")]
#[command(about = "Project a batch of households in parallel")]
struct Cli {
    /// Household CSV, one household per row
    #[arg(short, long, default_value = "households.csv")]
    households: PathBuf,

    /// Summary CSV to write
    #[arg(short, long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Reference-data directory (built-in tables when omitted)
    #[arg(short, long)]
    reference_data: Option<PathBuf>,
}

/// One household's summary line
#[derive(Debug, Serialize)]
struct SummaryLine<'a> {
    household_id: &'a str,
    projection_years: u32,
    baseline_total_cost: f64,
    optimized_total_cost: f64,
    lifetime_savings: f64,
    total_converted: f64,
    total_conversion_tax: f64,
    break_even_year: Option<i32>,
    first_spouse_death_year: Option<i32>,
    total_qcds: f64,
    baseline_final_ira: f64,
    optimized_final_ira: f64,
    optimized_final_roth: f64,
    baseline_heir_annual_rmd: f64,
    optimized_heir_annual_rmd: f64,
    baseline_after_tax_legacy: f64,
    optimized_after_tax_legacy: f64,
}

impl<'a> SummaryLine<'a> {
    fn new(household_id: &'a str, s: &ProjectionSummary) -> Self {
        Self {
            household_id,
            projection_years: s.projection_years,
            baseline_total_cost: s.baseline_total_cost,
            optimized_total_cost: s.optimized_total_cost,
            lifetime_savings: s.lifetime_savings,
            total_converted: s.total_converted,
            total_conversion_tax: s.total_conversion_tax,
            break_even_year: s.break_even_year,
            first_spouse_death_year: s.first_spouse_death_year,
            total_qcds: s.total_qcds,
            baseline_final_ira: s.baseline_final_ira,
            optimized_final_ira: s.optimized_final_ira,
            optimized_final_roth: s.optimized_final_roth,
            baseline_heir_annual_rmd: s.baseline_heir_annual_rmd,
            optimized_heir_annual_rmd: s.optimized_heir_annual_rmd,
            baseline_after_tax_legacy: s.baseline_after_tax_legacy,
            optimized_after_tax_legacy: s.optimized_after_tax_legacy,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    println!("Loading households from {}...", cli.households.display());

    let households = load_households(&cli.households)
        .with_context(|| format!("reading {}", cli.households.display()))?;
    println!("Loaded {} households in {:?}", households.len(), start.elapsed());

    let runner = match &cli.reference_data {
        Some(dir) => BatchRunner::from_csv_path(dir)
            .with_context(|| format!("loading reference data from {}", dir.display()))?,
        None => BatchRunner::new(),
    };

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = runner.run_batch(&households);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    for (id, result) in &results {
        writer.serialize(SummaryLine::new(id, &result.summary))?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());

    let total_savings: f64 = results.iter().map(|(_, r)| r.summary.lifetime_savings).sum();
    let converting = results
        .iter()
        .filter(|(_, r)| r.summary.total_converted > 0.0)
        .count();

    println!("\nBatch Summary:");
    println!("  Households: {}", results.len());
    println!("  Converting: {}", converting);
    println!("  Total Lifetime Savings: ${:.0}", total_savings);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
