//! Per-year output rows for a scenario

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};
use crate::household::FilingStatus;

/// Which of the two futures a scenario run simulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// No Roth conversions
    Baseline,
    /// Roth conversions sized to the target IRMAA tier
    Optimized,
}

impl ScenarioKind {
    pub fn conversions_enabled(&self) -> bool {
        matches!(self, ScenarioKind::Optimized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Baseline => "baseline",
            ScenarioKind::Optimized => "optimized",
        }
    }
}

/// A single simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    // Timing
    pub year: i32,
    pub age: u32,
    /// Status actually used this year (Single after a survivor transition)
    pub filing_status: FilingStatus,
    pub medicare_enrollees: u8,

    // Income actually used
    pub wages: f64,
    pub interest: f64,
    pub qualified_dividends: f64,
    pub capital_gain_distributions: f64,
    pub short_term_gains: f64,
    pub long_term_gains: f64,
    pub other_income: f64,
    pub social_security: f64,
    pub taxable_social_security: f64,

    // Contributions
    pub ira_contribution: f64,
    pub roth_contribution: f64,

    // Distributions
    pub ira_before_withdrawal: f64,
    pub rmd: f64,
    pub qcd: f64,
    pub qcd_limit: f64,
    /// Taxable IRA withdrawal: RMD net of QCD, or the manual withdrawal
    pub taxable_ira_withdrawal: f64,
    pub ira_after_rmd: f64,

    // Conversion
    pub roth_conversion: f64,
    pub conversion_tax: f64,

    // Income measures
    pub provisional_income: f64,
    pub agi: f64,
    pub magi: f64,
    pub taxable_income: f64,

    // Taxes and surcharges
    pub ordinary_tax: f64,
    pub capital_gains_tax: f64,
    pub state_tax: f64,
    pub total_tax: f64,
    pub effective_rate: f64,
    pub irmaa_surcharge: f64,
    pub total_cost: f64,

    // Ending balances
    pub ira_balance: f64,
    pub roth_balance: f64,
}

impl ScenarioRow {
    /// Create a row with zeroed amounts
    pub fn new(year: i32, age: u32, filing_status: FilingStatus) -> Self {
        Self {
            year,
            age,
            filing_status,
            medicare_enrollees: 0,
            wages: 0.0,
            interest: 0.0,
            qualified_dividends: 0.0,
            capital_gain_distributions: 0.0,
            short_term_gains: 0.0,
            long_term_gains: 0.0,
            other_income: 0.0,
            social_security: 0.0,
            taxable_social_security: 0.0,
            ira_contribution: 0.0,
            roth_contribution: 0.0,
            ira_before_withdrawal: 0.0,
            rmd: 0.0,
            qcd: 0.0,
            qcd_limit: 0.0,
            taxable_ira_withdrawal: 0.0,
            ira_after_rmd: 0.0,
            roth_conversion: 0.0,
            conversion_tax: 0.0,
            provisional_income: 0.0,
            agi: 0.0,
            magi: 0.0,
            taxable_income: 0.0,
            ordinary_tax: 0.0,
            capital_gains_tax: 0.0,
            state_tax: 0.0,
            total_tax: 0.0,
            effective_rate: 0.0,
            irmaa_surcharge: 0.0,
            total_cost: 0.0,
            ira_balance: 0.0,
            roth_balance: 0.0,
        }
    }
}

/// Write rows as CSV with a header line
pub fn write_rows_csv<W: Write>(writer: W, rows: &[ScenarioRow]) -> LoadResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .map_err(|e| LoadError::io("csv output", e))
}

/// Write rows to a CSV file, replacing it if present
pub fn write_rows_to_path(path: &Path, rows: &[ScenarioRow]) -> LoadResult<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| LoadError::io(path.display().to_string(), e))?;
    write_rows_csv(file, rows)
}
