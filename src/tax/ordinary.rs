//! Progressive ordinary income tax

use crate::household::FilingStatus;

/// Strictly increasing (ceiling, marginal rate) pairs per filing status.
/// The last ceiling is `f64::INFINITY`.
#[derive(Debug, Clone)]
pub struct OrdinaryBrackets {
    single: Vec<(f64, f64)>,
    joint: Vec<(f64, f64)>,
}

impl Default for OrdinaryBrackets {
    fn default() -> Self {
        const INF: f64 = f64::INFINITY;
        Self {
            single: vec![
                (11_925.0, 0.10),
                (48_475.0, 0.12),
                (103_350.0, 0.22),
                (197_300.0, 0.24),
                (250_525.0, 0.32),
                (626_350.0, 0.35),
                (INF, 0.37),
            ],
            joint: vec![
                (23_850.0, 0.10),
                (96_950.0, 0.12),
                (206_700.0, 0.22),
                (394_600.0, 0.24),
                (501_050.0, 0.32),
                (751_600.0, 0.35),
                (INF, 0.37),
            ],
        }
    }
}

impl OrdinaryBrackets {
    pub fn brackets(&self, filing_status: FilingStatus) -> &[(f64, f64)] {
        match filing_status {
            FilingStatus::Single => &self.single,
            FilingStatus::Joint => &self.joint,
        }
    }

    /// Tax on `income` with every ceiling scaled by `factor`
    pub fn tax(&self, income: f64, filing_status: FilingStatus, factor: f64) -> f64 {
        let mut tax = 0.0;
        let mut previous = 0.0;

        for &(ceiling, rate) in self.brackets(filing_status) {
            let scaled = ceiling * factor;
            if income > previous {
                tax += (income.min(scaled) - previous) * rate;
            }
            if income <= scaled {
                break;
            }
            previous = scaled;
        }

        tax
    }
}
