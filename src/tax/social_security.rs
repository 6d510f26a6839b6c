//! Taxable portion of Social Security benefits
//!
//! Thresholds are fixed by statute and never inflation-indexed.

use crate::household::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsThresholds {
    pub first: f64,
    pub second: f64,
    /// Amount taxed from the 50% band once income passes the second threshold
    pub carryover: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocialSecurityThresholds {
    pub single: SsThresholds,
    pub joint: SsThresholds,
}

impl Default for SocialSecurityThresholds {
    fn default() -> Self {
        Self {
            single: SsThresholds {
                first: 25_000.0,
                second: 34_000.0,
                carryover: 4_500.0,
            },
            joint: SsThresholds {
                first: 32_000.0,
                second: 44_000.0,
                carryover: 6_000.0,
            },
        }
    }
}

/// Non-SS income (conversions included, QCDs already excluded) plus half of gross benefits
pub fn provisional_income(non_ss_income: f64, gross_benefits: f64) -> f64 {
    non_ss_income + 0.5 * gross_benefits
}

impl SocialSecurityThresholds {
    pub fn for_status(&self, filing_status: FilingStatus) -> SsThresholds {
        match filing_status {
            FilingStatus::Single => self.single,
            FilingStatus::Joint => self.joint,
        }
    }

    /// Taxable benefits for a given provisional income
    pub fn taxable_benefits(
        &self,
        gross_benefits: f64,
        provisional: f64,
        filing_status: FilingStatus,
    ) -> f64 {
        if gross_benefits <= 0.0 {
            return 0.0;
        }
        let t = self.for_status(filing_status);

        if provisional <= t.first {
            0.0
        } else if provisional <= t.second {
            (0.5 * gross_benefits).min(0.5 * (provisional - t.first))
        } else {
            (0.85 * gross_benefits).min(0.85 * (provisional - t.second) + t.carryover)
        }
    }
}
