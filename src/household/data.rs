//! Household input record for a projection run

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::assumptions::rmd_age;

/// Age at which Medicare eligibility begins
pub const MEDICARE_AGE: u32 = 65;

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Federal filing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingStatus {
    Single,
    /// Married filing jointly
    Joint,
}

impl FilingStatus {
    pub fn is_joint(&self) -> bool {
        matches!(self, FilingStatus::Joint)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::Joint => "Joint",
        }
    }
}

/// Sex used for life-expectancy lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// Target IRMAA tier for Roth-conversion sizing.
///
/// Tier 0 keeps MAGI below the first surcharge threshold; each higher tier
/// accepts one more surcharge bracket in exchange for larger conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrmaaTier {
    Tier0,
    Tier1,
    Tier2,
}

impl IrmaaTier {
    pub const ALL: [IrmaaTier; 3] = [IrmaaTier::Tier0, IrmaaTier::Tier1, IrmaaTier::Tier2];

    pub fn index(&self) -> usize {
        match self {
            IrmaaTier::Tier0 => 0,
            IrmaaTier::Tier1 => 1,
            IrmaaTier::Tier2 => 2,
        }
    }
}

/// When Roth conversions stop in the optimized scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionWindow {
    /// Stop in the year RMDs begin
    UntilRmdAge,
    /// Stop in the year Medicare coverage begins
    UntilMedicare,
    /// Stop in the given calendar year (exclusive)
    UntilYear(i32),
    /// Convert every year of the horizon
    Unlimited,
}

/// Which household member a per-person value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Person {
    Primary,
    Spouse,
}

/// Flat parameter record for one projection call.
///
/// Income amounts are annual and expressed in `start_year` dollars.
/// Social Security benefits are annual amounts in the dollars of their
/// own claiming year.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInputs {
    /// First simulated calendar year
    #[serde(default = "current_year")]
    pub start_year: i32,

    pub filing_status: FilingStatus,

    // Household members
    pub primary_birth_year: i32,
    pub primary_sex: Sex,
    pub spouse_birth_year: Option<i32>,
    pub spouse_sex: Option<Sex>,

    /// Expected age at death overrides (replace the life-expectancy table)
    pub primary_life_expectancy: Option<u32>,
    pub spouse_life_expectancy: Option<u32>,

    // Income by category
    pub wages: f64,
    pub interest: f64,
    pub qualified_dividends: f64,
    pub capital_gain_distributions: f64,
    pub short_term_gains: f64,
    pub long_term_gains: f64,
    pub other_income: f64,

    // Starting balances
    pub ira_balance: f64,
    pub roth_balance: f64,

    // Social Security
    pub primary_ss_start_year: i32,
    pub primary_ss_benefit: f64,
    pub spouse_ss_start_year: Option<i32>,
    pub spouse_ss_benefit: f64,

    pub retirement_year: i32,

    /// Annual portfolio growth rate (e.g. 0.06)
    pub growth_rate: f64,
    /// Annual inflation rate, also used as the Social Security COLA
    pub inflation_rate: f64,

    pub target_tier: IrmaaTier,
    pub conversion_window: ConversionWindow,

    /// Explicit Medicare start year; derived when absent
    pub medicare_start_year: Option<i32>,
    /// Number of Medicare enrollees in the household (1 or 2)
    pub medicare_enrollees: u8,

    /// Flat state income tax rate applied to taxable income
    pub state_tax_rate: f64,

    /// Share of each RMD directed to charity as a QCD (0-1)
    pub qcd_percent: f64,
    /// Fully taxable IRA withdrawal taken each year before RMD age
    pub pre_rmd_withdrawal: f64,

    // Pre-retirement contributions
    pub primary_deferred_contribution: f64,
    pub primary_roth_contribution: f64,
    pub primary_employer_match: f64,
    pub spouse_deferred_contribution: f64,
    pub spouse_roth_contribution: f64,
    pub spouse_employer_match: f64,

    /// Marginal rate heirs are assumed to pay on inherited IRA dollars
    pub heir_tax_rate: f64,
}

impl Default for TaxInputs {
    fn default() -> Self {
        Self {
            start_year: 2025,
            filing_status: FilingStatus::Single,
            primary_birth_year: 1960,
            primary_sex: Sex::Male,
            spouse_birth_year: None,
            spouse_sex: None,
            primary_life_expectancy: None,
            spouse_life_expectancy: None,
            wages: 0.0,
            interest: 0.0,
            qualified_dividends: 0.0,
            capital_gain_distributions: 0.0,
            short_term_gains: 0.0,
            long_term_gains: 0.0,
            other_income: 0.0,
            ira_balance: 0.0,
            roth_balance: 0.0,
            primary_ss_start_year: 2027,
            primary_ss_benefit: 0.0,
            spouse_ss_start_year: None,
            spouse_ss_benefit: 0.0,
            retirement_year: 2025,
            growth_rate: 0.05,
            inflation_rate: 0.025,
            target_tier: IrmaaTier::Tier0,
            conversion_window: ConversionWindow::UntilRmdAge,
            medicare_start_year: None,
            medicare_enrollees: 1,
            state_tax_rate: 0.0,
            qcd_percent: 0.0,
            pre_rmd_withdrawal: 0.0,
            primary_deferred_contribution: 0.0,
            primary_roth_contribution: 0.0,
            primary_employer_match: 0.0,
            spouse_deferred_contribution: 0.0,
            spouse_roth_contribution: 0.0,
            spouse_employer_match: 0.0,
            heir_tax_rate: 0.24,
        }
    }
}

impl TaxInputs {
    /// True when the household files jointly and the spouse's birth year is known
    pub fn has_spouse(&self) -> bool {
        self.filing_status.is_joint() && self.spouse_birth_year.is_some()
    }

    pub fn birth_year(&self, person: Person) -> Option<i32> {
        match person {
            Person::Primary => Some(self.primary_birth_year),
            Person::Spouse => self.spouse_birth_year,
        }
    }

    /// First year Medicare surcharges can apply: the explicit start year, or
    /// the later of retirement and the primary's 65th birthday year
    pub fn resolved_medicare_start_year(&self) -> i32 {
        self.medicare_start_year.unwrap_or_else(|| {
            self.retirement_year
                .max(self.primary_birth_year + MEDICARE_AGE as i32)
        })
    }

    /// First year in which no conversion may be executed, or `None` when
    /// conversions run for the whole horizon
    pub fn conversion_stop_year(&self) -> Option<i32> {
        match self.conversion_window {
            ConversionWindow::UntilRmdAge => {
                Some(self.primary_birth_year + rmd_age(self.primary_birth_year) as i32)
            }
            ConversionWindow::UntilMedicare => Some(self.resolved_medicare_start_year()),
            ConversionWindow::UntilYear(year) => Some(year),
            ConversionWindow::Unlimited => None,
        }
    }

    /// Growth factor for start-year dollars in `year`
    pub fn income_scale(&self, year: i32) -> f64 {
        crate::tax::inflation_factor(self.inflation_rate, year, self.start_year)
    }
}

/// Age attained during a calendar year
pub fn age_in_year(birth_year: i32, year: i32) -> u32 {
    (year - birth_year).max(0) as u32
}
