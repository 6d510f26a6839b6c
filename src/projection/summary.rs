//! Side-by-side comparison of the baseline and optimized scenarios

use serde::{Deserialize, Serialize};

use super::rows::ScenarioRow;

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Rows with conversions disabled
    pub baseline: Vec<ScenarioRow>,

    /// Rows with tier-filling conversions
    pub optimized: Vec<ScenarioRow>,

    pub summary: ProjectionSummary,
}

/// Totals and final balances for one scenario's rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTotals {
    pub total_cost: f64,
    pub total_tax: f64,
    pub total_irmaa: f64,
    pub final_ira: f64,
    pub final_roth: f64,
}

impl ScenarioTotals {
    pub fn from_rows(rows: &[ScenarioRow]) -> Self {
        let last = rows.last();
        Self {
            total_cost: rows.iter().map(|r| r.total_cost).sum(),
            total_tax: rows.iter().map(|r| r.total_tax).sum(),
            total_irmaa: rows.iter().map(|r| r.irmaa_surcharge).sum(),
            final_ira: last.map(|r| r.ira_balance).unwrap_or(0.0),
            final_roth: last.map(|r| r.roth_balance).unwrap_or(0.0),
        }
    }

    /// Annual heir distribution spreading the final IRA evenly over
    /// `drawdown_years`
    pub fn heir_annual_rmd(&self, drawdown_years: u32) -> f64 {
        if drawdown_years == 0 {
            self.final_ira
        } else {
            self.final_ira / drawdown_years as f64
        }
    }

    /// Roth passes untaxed; the IRA is reduced by the heir's tax rate
    pub fn after_tax_legacy(&self, heir_tax_rate: f64) -> f64 {
        self.final_roth + self.final_ira * (1.0 - heir_tax_rate.clamp(0.0, 1.0))
    }
}

/// Aggregate comparison of the two scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub projection_years: u32,

    pub baseline_total_cost: f64,
    pub baseline_total_tax: f64,
    pub baseline_total_irmaa: f64,

    pub optimized_total_cost: f64,
    pub optimized_total_tax: f64,
    pub optimized_total_irmaa: f64,

    /// Baseline total cost minus optimized total cost
    pub lifetime_savings: f64,

    pub total_converted: f64,
    pub total_conversion_tax: f64,

    /// First year from which cumulative savings stay non-negative
    pub break_even_year: Option<i32>,

    pub first_spouse_death_year: Option<i32>,

    /// QCDs made in the baseline scenario
    pub total_qcds: f64,

    pub baseline_final_ira: f64,
    pub baseline_final_roth: f64,
    pub optimized_final_ira: f64,
    pub optimized_final_roth: f64,

    pub baseline_heir_annual_rmd: f64,
    pub optimized_heir_annual_rmd: f64,

    pub baseline_after_tax_legacy: f64,
    pub optimized_after_tax_legacy: f64,
}

impl ProjectionSummary {
    pub fn from_scenarios(
        baseline: &[ScenarioRow],
        optimized: &[ScenarioRow],
        first_spouse_death_year: Option<i32>,
        heir_drawdown_years: u32,
        heir_tax_rate: f64,
    ) -> Self {
        let base = ScenarioTotals::from_rows(baseline);
        let opt = ScenarioTotals::from_rows(optimized);

        Self {
            projection_years: baseline.len() as u32,
            baseline_total_cost: base.total_cost,
            baseline_total_tax: base.total_tax,
            baseline_total_irmaa: base.total_irmaa,
            optimized_total_cost: opt.total_cost,
            optimized_total_tax: opt.total_tax,
            optimized_total_irmaa: opt.total_irmaa,
            lifetime_savings: base.total_cost - opt.total_cost,
            total_converted: optimized.iter().map(|r| r.roth_conversion).sum(),
            total_conversion_tax: optimized.iter().map(|r| r.conversion_tax).sum(),
            break_even_year: break_even_year(baseline, optimized),
            first_spouse_death_year,
            total_qcds: baseline.iter().map(|r| r.qcd).sum(),
            baseline_final_ira: base.final_ira,
            baseline_final_roth: base.final_roth,
            optimized_final_ira: opt.final_ira,
            optimized_final_roth: opt.final_roth,
            baseline_heir_annual_rmd: base.heir_annual_rmd(heir_drawdown_years),
            optimized_heir_annual_rmd: opt.heir_annual_rmd(heir_drawdown_years),
            baseline_after_tax_legacy: base.after_tax_legacy(heir_tax_rate),
            optimized_after_tax_legacy: opt.after_tax_legacy(heir_tax_rate),
        }
    }

    pub fn legacy_gain(&self) -> f64 {
        self.optimized_after_tax_legacy - self.baseline_after_tax_legacy
    }
}

/// First year of the trailing run of non-negative cumulative savings.
///
/// `None` when the final cumulative savings are negative or there are no rows.
pub fn break_even_year(baseline: &[ScenarioRow], optimized: &[ScenarioRow]) -> Option<i32> {
    let mut cumulative = 0.0;
    let mut candidate = None;

    for (base, opt) in baseline.iter().zip(optimized) {
        cumulative += base.total_cost - opt.total_cost;
        if cumulative >= 0.0 {
            if candidate.is_none() {
                candidate = Some(base.year);
            }
        } else {
            candidate = None;
        }
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::FilingStatus;
    use approx::assert_relative_eq;

    fn row(year: i32, total_cost: f64) -> ScenarioRow {
        let mut row = ScenarioRow::new(year, 70, FilingStatus::Single);
        row.total_cost = total_cost;
        row.total_tax = total_cost;
        row
    }

    #[test]
    fn test_break_even_after_early_conversion_cost() {
        let baseline = vec![row(2025, 10.0), row(2026, 10.0), row(2027, 30.0), row(2028, 30.0)];
        let optimized = vec![row(2025, 25.0), row(2026, 20.0), row(2027, 5.0), row(2028, 5.0)];
        // Cumulative: -15, -25, 0, 25
        assert_eq!(break_even_year(&baseline, &optimized), Some(2027));
    }

    #[test]
    fn test_break_even_resets_when_savings_dip() {
        let baseline = vec![row(2025, 10.0), row(2026, 0.0), row(2027, 20.0)];
        let optimized = vec![row(2025, 5.0), row(2026, 10.0), row(2027, 5.0)];
        // Cumulative: 5, -5, 10
        assert_eq!(break_even_year(&baseline, &optimized), Some(2027));
    }

    #[test]
    fn test_no_break_even_when_optimized_costs_more() {
        let baseline = vec![row(2025, 10.0), row(2026, 10.0)];
        let optimized = vec![row(2025, 30.0), row(2026, 5.0)];
        assert_eq!(break_even_year(&baseline, &optimized), None);
        assert_eq!(break_even_year(&[], &[]), None);
    }

    #[test]
    fn test_summary_totals_and_legacy() {
        let mut b1 = row(2025, 100.0);
        b1.qcd = 40.0;
        let mut b2 = row(2026, 200.0);
        b2.ira_balance = 500_000.0;
        b2.roth_balance = 0.0;

        let mut o1 = row(2025, 150.0);
        o1.roth_conversion = 50_000.0;
        o1.conversion_tax = 150.0;
        let mut o2 = row(2026, 50.0);
        o2.ira_balance = 300_000.0;
        o2.roth_balance = 220_000.0;

        let summary = ProjectionSummary::from_scenarios(&[b1, b2], &[o1, o2], Some(2040), 10, 0.24);

        assert_eq!(summary.projection_years, 2);
        assert_relative_eq!(summary.baseline_total_cost, 300.0);
        assert_relative_eq!(summary.optimized_total_cost, 200.0);
        assert_relative_eq!(summary.lifetime_savings, 100.0);
        assert_relative_eq!(summary.total_converted, 50_000.0);
        assert_relative_eq!(summary.total_conversion_tax, 150.0);
        assert_relative_eq!(summary.total_qcds, 40.0);
        assert_eq!(summary.first_spouse_death_year, Some(2040));
        assert_relative_eq!(summary.baseline_heir_annual_rmd, 50_000.0);
        assert_relative_eq!(summary.optimized_heir_annual_rmd, 30_000.0);
        assert_relative_eq!(summary.baseline_after_tax_legacy, 380_000.0, epsilon = 1e-6);
        assert_relative_eq!(summary.optimized_after_tax_legacy, 448_000.0, epsilon = 1e-6);
        assert_relative_eq!(summary.legacy_gain(), 68_000.0, epsilon = 1e-6);
        assert_eq!(summary.break_even_year, Some(2026));
    }
}
