//! Load household inputs from JSON documents and batch CSV files

use super::{ConversionWindow, FilingStatus, IrmaaTier, Sex, TaxInputs};
use crate::error::{LoadError, LoadResult};
use chrono::Datelike;
use csv::Reader;
use serde::Deserialize;
use std::path::Path;

/// One household from a batch file
#[derive(Debug, Clone)]
pub struct HouseholdRecord {
    pub household_id: String,
    pub inputs: TaxInputs,
}

/// Raw CSV row, one household per line
#[derive(Debug, Deserialize)]
struct CsvRow {
    household_id: String,
    start_year: Option<i32>,
    filing_status: String,
    primary_birth_year: i32,
    primary_sex: String,
    spouse_birth_year: Option<i32>,
    spouse_sex: Option<String>,
    primary_life_expectancy: Option<u32>,
    spouse_life_expectancy: Option<u32>,
    #[serde(default)]
    wages: f64,
    #[serde(default)]
    interest: f64,
    #[serde(default)]
    qualified_dividends: f64,
    #[serde(default)]
    capital_gain_distributions: f64,
    #[serde(default)]
    short_term_gains: f64,
    #[serde(default)]
    long_term_gains: f64,
    #[serde(default)]
    other_income: f64,
    ira_balance: f64,
    #[serde(default)]
    roth_balance: f64,
    primary_ss_start_year: i32,
    #[serde(default)]
    primary_ss_benefit: f64,
    spouse_ss_start_year: Option<i32>,
    #[serde(default)]
    spouse_ss_benefit: f64,
    retirement_year: i32,
    growth_rate: f64,
    inflation_rate: f64,
    target_tier: String,
    conversion_window: String,
    medicare_start_year: Option<i32>,
    medicare_enrollees: u8,
    #[serde(default)]
    state_tax_rate: f64,
    #[serde(default)]
    qcd_percent: f64,
    #[serde(default)]
    pre_rmd_withdrawal: f64,
    #[serde(default)]
    primary_deferred_contribution: f64,
    #[serde(default)]
    primary_roth_contribution: f64,
    #[serde(default)]
    primary_employer_match: f64,
    #[serde(default)]
    spouse_deferred_contribution: f64,
    #[serde(default)]
    spouse_roth_contribution: f64,
    #[serde(default)]
    spouse_employer_match: f64,
    heir_tax_rate: Option<f64>,
}

fn parse_filing_status(value: &str) -> LoadResult<FilingStatus> {
    match value {
        "Single" => Ok(FilingStatus::Single),
        "Joint" | "MFJ" => Ok(FilingStatus::Joint),
        other => Err(LoadError::UnknownLabel {
            field: "filing_status",
            value: other.to_string(),
        }),
    }
}

fn parse_sex(field: &'static str, value: &str) -> LoadResult<Sex> {
    match value {
        "Male" | "M" => Ok(Sex::Male),
        "Female" | "F" => Ok(Sex::Female),
        other => Err(LoadError::UnknownLabel {
            field,
            value: other.to_string(),
        }),
    }
}

fn parse_tier(value: &str) -> LoadResult<IrmaaTier> {
    match value {
        "0" | "Tier0" => Ok(IrmaaTier::Tier0),
        "1" | "Tier1" => Ok(IrmaaTier::Tier1),
        "2" | "Tier2" => Ok(IrmaaTier::Tier2),
        other => Err(LoadError::UnknownLabel {
            field: "target_tier",
            value: other.to_string(),
        }),
    }
}

/// Accepts the policy names or a bare calendar year
fn parse_conversion_window(value: &str) -> LoadResult<ConversionWindow> {
    match value {
        "UntilRmdAge" => Ok(ConversionWindow::UntilRmdAge),
        "UntilMedicare" => Ok(ConversionWindow::UntilMedicare),
        "Unlimited" => Ok(ConversionWindow::Unlimited),
        other => other
            .parse::<i32>()
            .map(ConversionWindow::UntilYear)
            .map_err(|_| LoadError::UnknownLabel {
                field: "conversion_window",
                value: other.to_string(),
            }),
    }
}

impl CsvRow {
    fn into_record(self) -> LoadResult<HouseholdRecord> {
        let spouse_sex = match self.spouse_sex.as_deref() {
            None | Some("") => None,
            Some(label) => Some(parse_sex("spouse_sex", label)?),
        };

        let inputs = TaxInputs {
            start_year: self.start_year.unwrap_or_else(|| chrono::Local::now().year()),
            filing_status: parse_filing_status(&self.filing_status)?,
            primary_birth_year: self.primary_birth_year,
            primary_sex: parse_sex("primary_sex", &self.primary_sex)?,
            spouse_birth_year: self.spouse_birth_year,
            spouse_sex,
            primary_life_expectancy: self.primary_life_expectancy,
            spouse_life_expectancy: self.spouse_life_expectancy,
            wages: self.wages,
            interest: self.interest,
            qualified_dividends: self.qualified_dividends,
            capital_gain_distributions: self.capital_gain_distributions,
            short_term_gains: self.short_term_gains,
            long_term_gains: self.long_term_gains,
            other_income: self.other_income,
            ira_balance: self.ira_balance,
            roth_balance: self.roth_balance,
            primary_ss_start_year: self.primary_ss_start_year,
            primary_ss_benefit: self.primary_ss_benefit,
            spouse_ss_start_year: self.spouse_ss_start_year,
            spouse_ss_benefit: self.spouse_ss_benefit,
            retirement_year: self.retirement_year,
            growth_rate: self.growth_rate,
            inflation_rate: self.inflation_rate,
            target_tier: parse_tier(&self.target_tier)?,
            conversion_window: parse_conversion_window(&self.conversion_window)?,
            medicare_start_year: self.medicare_start_year,
            medicare_enrollees: self.medicare_enrollees,
            state_tax_rate: self.state_tax_rate,
            qcd_percent: self.qcd_percent,
            pre_rmd_withdrawal: self.pre_rmd_withdrawal,
            primary_deferred_contribution: self.primary_deferred_contribution,
            primary_roth_contribution: self.primary_roth_contribution,
            primary_employer_match: self.primary_employer_match,
            spouse_deferred_contribution: self.spouse_deferred_contribution,
            spouse_roth_contribution: self.spouse_roth_contribution,
            spouse_employer_match: self.spouse_employer_match,
            heir_tax_rate: self.heir_tax_rate.unwrap_or(0.24),
        };

        Ok(HouseholdRecord {
            household_id: self.household_id,
            inputs,
        })
    }
}

/// Load one household's inputs from a JSON file
pub fn load_inputs<P: AsRef<Path>>(path: P) -> LoadResult<TaxInputs> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::io(path.display().to_string(), e))?;
    load_inputs_from_str(&text)
}

/// Parse one household's inputs from a JSON document
pub fn load_inputs_from_str(json: &str) -> LoadResult<TaxInputs> {
    Ok(serde_json::from_str(json)?)
}

/// Load all households from a CSV file
pub fn load_households<P: AsRef<Path>>(path: P) -> LoadResult<Vec<HouseholdRecord>> {
    let reader = Reader::from_path(path)?;
    collect_households(reader)
}

/// Load households from any reader (e.g., string buffer, network stream)
pub fn load_households_from_reader<R: std::io::Read>(reader: R) -> LoadResult<Vec<HouseholdRecord>> {
    collect_households(Reader::from_reader(reader))
}

fn collect_households<R: std::io::Read>(mut reader: Reader<R>) -> LoadResult<Vec<HouseholdRecord>> {
    let mut households = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        households.push(row.into_record()?);
    }

    log::debug!("Loaded {} households", households.len());
    Ok(households)
}
