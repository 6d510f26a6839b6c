//! Stacked tax on qualified dividends and long-term capital gains
//!
//! Ordinary income fills the brackets first; preferential income sits on
//! top of it and is taxed at 0%, 15% and 20% by the band it lands in.

use crate::household::FilingStatus;

const RATES: [f64; 3] = [0.0, 0.15, 0.20];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferentialBrackets {
    /// Top of the 0% and 15% bands for single filers
    pub single: [f64; 2],
    /// Top of the 0% and 15% bands for joint filers
    pub joint: [f64; 2],
}

impl Default for PreferentialBrackets {
    fn default() -> Self {
        Self {
            single: [48_350.0, 533_400.0],
            joint: [96_700.0, 600_050.0],
        }
    }
}

impl PreferentialBrackets {
    fn ceilings(&self, filing_status: FilingStatus) -> [f64; 2] {
        match filing_status {
            FilingStatus::Single => self.single,
            FilingStatus::Joint => self.joint,
        }
    }

    /// Tax on the preferential slice of `taxable_income`.
    ///
    /// `preferential` is clamped to `taxable_income` because deductions may
    /// already have pushed taxable income below the gross preferential amount.
    pub fn tax(
        &self,
        preferential: f64,
        taxable_income: f64,
        filing_status: FilingStatus,
        factor: f64,
    ) -> f64 {
        let taxable = taxable_income.max(0.0);
        let preferential = preferential.clamp(0.0, taxable);
        if preferential == 0.0 {
            return 0.0;
        }

        let ordinary = taxable - preferential;
        let [zero_top, fifteen_top] = self.ceilings(filing_status);
        let bands = [
            (0.0, zero_top * factor),
            (zero_top * factor, fifteen_top * factor),
            (fifteen_top * factor, f64::INFINITY),
        ];

        bands
            .iter()
            .zip(RATES)
            .map(|(&(low, high), rate)| {
                let start = low.max(ordinary);
                let end = high.min(taxable);
                (end - start).max(0.0) * rate
            })
            .sum()
    }
}
