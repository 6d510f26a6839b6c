//! Retirement Projection CLI
//!
//! Projects one household's baseline and Roth-conversion scenarios and
//! prints the year table and the comparison summary

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use retirement_projection::household::load_inputs;
use retirement_projection::projection::{
    primary_profile, spouse_profile, write_rows_to_path, ScenarioRow,
};
use retirement_projection::{expected_age, BatchRunner, ProjectionSummary, TaxInputs};

#[derive(Parser, Debug)]
#[command(name = "retirement_projection")]
#[command(about = "Compare a no-conversion baseline with IRMAA tier-filling Roth conversions")]
struct Cli {
    /// Household inputs (JSON)
    #[arg(short, long)]
    inputs: PathBuf,

    /// Write optimized rows here; baseline rows go to <stem>_baseline.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory with year_reference.csv, life_expectancy.csv and uniform_lifetime.csv
    #[arg(short, long)]
    reference_data: Option<PathBuf>,

    /// Also project the household once per IRMAA target tier
    #[arg(long)]
    tier_sweep: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let inputs = load_inputs(&cli.inputs)
        .with_context(|| format!("reading household inputs from {}", cli.inputs.display()))?;

    let runner = match &cli.reference_data {
        Some(dir) => BatchRunner::from_csv_path(dir)
            .with_context(|| format!("loading reference data from {}", dir.display()))?,
        None => BatchRunner::new(),
    };

    println!("Retirement Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("===========================\n");
    print_household(&inputs, &runner);

    let result = runner.run(&inputs);

    println!("\nOptimized scenario ({} years):", result.optimized.len());
    print_rows(&result.optimized);
    print_summary(&result.summary);

    if let Some(path) = &cli.output {
        let baseline_path = baseline_path(path);
        write_rows_to_path(path, &result.optimized)
            .with_context(|| format!("writing {}", path.display()))?;
        write_rows_to_path(&baseline_path, &result.baseline)
            .with_context(|| format!("writing {}", baseline_path.display()))?;
        println!("\nRows written to: {} and {}", path.display(), baseline_path.display());
    }

    if cli.tier_sweep {
        println!("\nTier sweep:");
        println!(
            "{:>6} {:>14} {:>14} {:>14} {:>16}",
            "Tier", "Converted", "Opt Cost", "Savings", "Legacy Gain"
        );
        for (tier, sweep) in runner.run_tier_sweep(&inputs) {
            println!(
                "{:>6} {:>14.0} {:>14.0} {:>14.0} {:>16.0}",
                tier.index(),
                sweep.summary.total_converted,
                sweep.summary.optimized_total_cost,
                sweep.summary.lifetime_savings,
                sweep.summary.legacy_gain(),
            );
        }
    }

    Ok(())
}

fn baseline_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "projection".to_string());
    path.with_file_name(format!("{stem}_baseline.csv"))
}

fn print_household(inputs: &TaxInputs, runner: &BatchRunner) {
    let table = &runner.assumptions().life_expectancy;
    let primary = primary_profile(inputs);

    println!("Household:");
    println!("  Filing Status: {}", inputs.filing_status.as_str());
    println!(
        "  Primary: born {} ({:?}), expected age {}",
        inputs.primary_birth_year,
        inputs.primary_sex,
        expected_age(primary, table)
    );
    if let (Some(spouse), Some(birth_year)) = (spouse_profile(inputs), inputs.spouse_birth_year) {
        println!(
            "  Spouse: born {} ({:?}), expected age {}",
            birth_year,
            spouse.sex,
            expected_age(spouse, table)
        );
    }
    println!("  IRA: ${:.2}  Roth: ${:.2}", inputs.ira_balance, inputs.roth_balance);
    println!(
        "  Target Tier: {}  Window: {:?}",
        inputs.target_tier.index(),
        inputs.conversion_window
    );
}

fn print_rows(rows: &[ScenarioRow]) {
    println!(
        "{:>5} {:>4} {:>6} {:>12} {:>10} {:>12} {:>12} {:>10} {:>8} {:>12} {:>12}",
        "Year", "Age", "Status", "MAGI", "RMD", "Conversion", "Total Tax", "IRMAA", "Eff%", "IRA", "Roth"
    );
    println!("{}", "-".repeat(116));

    for row in rows {
        println!(
            "{:>5} {:>4} {:>6} {:>12.0} {:>10.0} {:>12.0} {:>12.0} {:>10.0} {:>8.2} {:>12.0} {:>12.0}",
            row.year,
            row.age,
            row.filing_status.as_str(),
            row.magi,
            row.rmd,
            row.roth_conversion,
            row.total_tax,
            row.irmaa_surcharge,
            row.effective_rate * 100.0,
            row.ira_balance,
            row.roth_balance,
        );
    }
}

fn print_summary(summary: &ProjectionSummary) {
    println!("\nSummary:");
    println!("  Projection Years: {}", summary.projection_years);
    println!(
        "  Baseline Cost: ${:.2} (tax ${:.2}, IRMAA ${:.2})",
        summary.baseline_total_cost, summary.baseline_total_tax, summary.baseline_total_irmaa
    );
    println!(
        "  Optimized Cost: ${:.2} (tax ${:.2}, IRMAA ${:.2})",
        summary.optimized_total_cost, summary.optimized_total_tax, summary.optimized_total_irmaa
    );
    println!("  Lifetime Savings: ${:.2}", summary.lifetime_savings);
    println!(
        "  Total Converted: ${:.2} (conversion tax ${:.2})",
        summary.total_converted, summary.total_conversion_tax
    );
    match summary.break_even_year {
        Some(year) => println!("  Break-even Year: {year}"),
        None => println!("  Break-even Year: never"),
    }
    if let Some(year) = summary.first_spouse_death_year {
        println!("  First Spouse Death: {year}");
    }
    println!("  Total QCDs: ${:.2}", summary.total_qcds);
    println!(
        "  Final IRA/Roth: baseline ${:.2} / ${:.2}, optimized ${:.2} / ${:.2}",
        summary.baseline_final_ira,
        summary.baseline_final_roth,
        summary.optimized_final_ira,
        summary.optimized_final_roth
    );
    println!(
        "  Heir Annual RMD: baseline ${:.2}, optimized ${:.2}",
        summary.baseline_heir_annual_rmd, summary.optimized_heir_annual_rmd
    );
    println!(
        "  After-tax Legacy: baseline ${:.2}, optimized ${:.2}",
        summary.baseline_after_tax_legacy, summary.optimized_after_tax_legacy
    );
}
