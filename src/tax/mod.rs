//! Federal tax, Social Security taxability and IRMAA calculators
//!
//! All calculators are pure functions of their arguments. Dollar thresholds
//! are stated in `BASE_TAX_YEAR` dollars and scaled by an inflation factor
//! supplied by the caller, except the Social Security thresholds, which are
//! fixed by statute.

mod irmaa;
mod ordinary;
mod preferential;
mod social_security;

pub use irmaa::{irmaa_surcharge, ConversionCeilings};
pub use ordinary::OrdinaryBrackets;
pub use preferential::PreferentialBrackets;
pub use social_security::{provisional_income, SocialSecurityThresholds, SsThresholds};

use crate::household::FilingStatus;

/// Year the built-in bracket tables are stated in
pub const BASE_TAX_YEAR: i32 = 2025;

/// Compound growth factor from `base_year` to `year`.
/// Years at or before the base year are never deflated.
pub fn inflation_factor(rate: f64, year: i32, base_year: i32) -> f64 {
    if year <= base_year {
        1.0
    } else {
        (1.0 + rate).powi(year - base_year)
    }
}

/// Standard deduction by filing status, in base-year dollars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardDeduction {
    pub single: f64,
    pub joint: f64,
}

impl Default for StandardDeduction {
    fn default() -> Self {
        Self {
            single: 15_750.0,
            joint: 31_500.0,
        }
    }
}

impl StandardDeduction {
    pub fn amount(&self, filing_status: FilingStatus, factor: f64) -> f64 {
        match filing_status {
            FilingStatus::Single => self.single * factor,
            FilingStatus::Joint => self.joint * factor,
        }
    }
}

/// Everything needed to tax one household-year
#[derive(Debug, Clone)]
pub struct FederalTaxSchedule {
    pub base_year: i32,
    pub ordinary: OrdinaryBrackets,
    pub preferential: PreferentialBrackets,
    pub social_security: SocialSecurityThresholds,
    pub standard_deduction: StandardDeduction,
    pub conversion_ceilings: ConversionCeilings,
}

impl Default for FederalTaxSchedule {
    fn default() -> Self {
        Self {
            base_year: BASE_TAX_YEAR,
            ordinary: OrdinaryBrackets::default(),
            preferential: PreferentialBrackets::default(),
            social_security: SocialSecurityThresholds::default(),
            standard_deduction: StandardDeduction::default(),
            conversion_ceilings: ConversionCeilings::default(),
        }
    }
}

impl FederalTaxSchedule {
    /// Bracket inflation factor for a simulated year
    pub fn factor(&self, inflation_rate: f64, year: i32) -> f64 {
        inflation_factor(inflation_rate, year, self.base_year)
    }
}
