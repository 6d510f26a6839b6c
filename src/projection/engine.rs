//! Core projection engine: runs the baseline and optimized scenarios for a
//! household and compares them

use crate::assumptions::Assumptions;
use crate::household::TaxInputs;

use super::horizon::{first_spouse_death, projection_years};
use super::rows::{ScenarioKind, ScenarioRow};
use super::scenario::ScenarioRunner;
use super::summary::{ProjectionResult, ProjectionSummary};

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Years over which an heir is assumed to drain an inherited IRA
    pub heir_drawdown_years: u32,

    /// Year whose IRMAA bracket table is used for every simulated year,
    /// inflated forward from this year
    pub irmaa_reference_year: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            heir_drawdown_years: 10,
            irmaa_reference_year: 2025,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new(Assumptions::default_tables(), ProjectionConfig::default())
    }
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Number of years a projection for `inputs` covers
    pub fn horizon(&self, inputs: &TaxInputs) -> u32 {
        projection_years(inputs, &self.assumptions.life_expectancy)
    }

    /// Run a single scenario over `horizon` years
    pub fn run_scenario(&self, inputs: &TaxInputs, kind: ScenarioKind, horizon: u32) -> Vec<ScenarioRow> {
        ScenarioRunner::new(&self.assumptions, &self.config, inputs, kind, horizon).run()
    }

    /// Run both scenarios from identical inputs and summarize
    pub fn project(&self, inputs: &TaxInputs) -> ProjectionResult {
        let horizon = self.horizon(inputs);
        let baseline = self.run_scenario(inputs, ScenarioKind::Baseline, horizon);
        let optimized = self.run_scenario(inputs, ScenarioKind::Optimized, horizon);

        let spouse_death = first_spouse_death(inputs, &self.assumptions.life_expectancy);
        let summary = ProjectionSummary::from_scenarios(
            &baseline,
            &optimized,
            spouse_death.map(|d| d.year),
            self.config.heir_drawdown_years,
            inputs.heir_tax_rate,
        );

        log::debug!(
            "Projected {} years: baseline cost {:.0}, optimized cost {:.0}, savings {:.0}",
            horizon,
            summary.baseline_total_cost,
            summary.optimized_total_cost,
            summary.lifetime_savings
        );

        ProjectionResult {
            baseline,
            optimized,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{ConversionWindow, FilingStatus, IrmaaTier, Sex};
    use crate::projection::horizon::MIN_PROJECTION_YEARS;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn joint_retirees() -> TaxInputs {
        TaxInputs {
            start_year: 2025,
            filing_status: FilingStatus::Joint,
            primary_birth_year: 1959,
            primary_sex: Sex::Male,
            spouse_birth_year: Some(1961),
            spouse_sex: Some(Sex::Female),
            interest: 8_000.0,
            qualified_dividends: 12_000.0,
            ira_balance: 1_400_000.0,
            roth_balance: 50_000.0,
            primary_ss_start_year: 2029,
            primary_ss_benefit: 38_000.0,
            spouse_ss_start_year: Some(2030),
            spouse_ss_benefit: 24_000.0,
            retirement_year: 2024,
            growth_rate: 0.05,
            inflation_rate: 0.025,
            target_tier: IrmaaTier::Tier0,
            conversion_window: ConversionWindow::UntilRmdAge,
            medicare_enrollees: 2,
            qcd_percent: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_projection_runs() {
        let engine = ProjectionEngine::default();
        let inputs = joint_retirees();
        let result = engine.project(&inputs);

        let horizon = engine.horizon(&inputs) as usize;
        assert_eq!(result.baseline.len(), horizon);
        assert_eq!(result.optimized.len(), horizon);
        assert_eq!(result.summary.projection_years as usize, horizon);
        assert_eq!(result.baseline[0].year, 2025);
        assert!(result.summary.total_converted > 0.0);
        assert!(result.summary.first_spouse_death_year.is_some());
    }

    #[test]
    fn test_single_retiree_rmd_at_75() {
        let engine = ProjectionEngine::default();
        let inputs = TaxInputs {
            start_year: 2025,
            primary_birth_year: 1950,
            ira_balance: 500_000.0 / 1.05,
            growth_rate: 0.05,
            primary_ss_start_year: 2015,
            primary_ss_benefit: 0.0,
            retirement_year: 2015,
            ..Default::default()
        };
        let result = engine.project(&inputs);
        let first = &result.baseline[0];

        assert_eq!(first.age, 75);
        assert_relative_eq!(first.rmd, 500_000.0 / 24.6, epsilon = 1e-6);
        assert_relative_eq!(first.rmd, 20_325.20, epsilon = 0.01);
    }

    #[test]
    fn test_conversions_stop_at_rmd_age() {
        let engine = ProjectionEngine::default();
        let inputs = joint_retirees();
        let result = engine.project(&inputs);

        // Primary born 1959 reaches RMD age 73 in 2032
        for row in &result.optimized {
            if row.year >= 2032 {
                assert_eq!(row.roth_conversion, 0.0, "converted in {}", row.year);
            }
        }
        assert!(result.optimized.iter().any(|r| r.year < 2032 && r.roth_conversion > 0.0));
        assert!(result.baseline.iter().all(|r| r.roth_conversion == 0.0));
    }

    #[test]
    fn test_optimized_reduces_final_ira() {
        let engine = ProjectionEngine::default();
        let result = engine.project(&joint_retirees());
        let summary = &result.summary;

        assert!(summary.optimized_final_ira < summary.baseline_final_ira);
        assert!(summary.optimized_final_roth > summary.baseline_final_roth);
        assert!(summary.optimized_heir_annual_rmd < summary.baseline_heir_annual_rmd);
        assert_relative_eq!(
            summary.baseline_heir_annual_rmd,
            summary.baseline_final_ira / 10.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_higher_tier_converts_more() {
        let engine = ProjectionEngine::default();
        let totals: Vec<f64> = IrmaaTier::ALL
            .iter()
            .map(|tier| {
                // Large enough that no tier drains the IRA before RMD age
                let inputs = TaxInputs {
                    target_tier: *tier,
                    ira_balance: 5_000_000.0,
                    ..joint_retirees()
                };
                engine.project(&inputs).summary.total_converted
            })
            .collect();

        assert!(totals[0] < totals[1]);
        assert!(totals[1] < totals[2]);
    }

    #[test]
    fn test_unlimited_window_keeps_converting() {
        let engine = ProjectionEngine::default();
        let inputs = TaxInputs {
            conversion_window: ConversionWindow::Unlimited,
            ..joint_retirees()
        };
        let result = engine.project(&inputs);
        assert!(result.optimized.iter().any(|r| r.year >= 2032 && r.roth_conversion > 0.0));
    }

    #[test]
    fn test_heir_drawdown_years_configurable() {
        let engine = ProjectionEngine::new(
            Assumptions::default_tables(),
            ProjectionConfig {
                heir_drawdown_years: 5,
                ..Default::default()
            },
        );
        let summary = engine.project(&joint_retirees()).summary;
        assert_relative_eq!(
            summary.baseline_heir_annual_rmd,
            summary.baseline_final_ira / 5.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_projection_is_deterministic() {
        let engine = ProjectionEngine::default();
        let inputs = joint_retirees();
        let first = serde_json::to_string(&engine.project(&inputs)).unwrap();
        let second = serde_json::to_string(&engine.project(&inputs)).unwrap();
        assert_eq!(first, second);
    }

    fn window(index: u8, year: i32) -> ConversionWindow {
        match index {
            0 => ConversionWindow::UntilRmdAge,
            1 => ConversionWindow::UntilMedicare,
            2 => ConversionWindow::UntilYear(year),
            _ => ConversionWindow::Unlimited,
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_projection_invariants(
            joint in proptest::bool::ANY,
            primary_birth in 1940i32..1985,
            spouse_offset in -8i32..9,
            ira in 0u32..3_000_000,
            roth in 0u32..400_000,
            wages in 0u32..200_000,
            interest in 0u32..150_000,
            dividends in 0u32..80_000,
            primary_ss in 0u32..60_000,
            spouse_ss in 0u32..40_000,
            ss_offset in 0i32..8,
            retire_offset in 0i32..8,
            growth_bp in -200i32..900,
            inflation_bp in 0u32..500,
            tier in 0usize..3,
            window_index in 0u8..4,
            qcd_pct in 0u32..101,
            state_bp in 0u32..800,
        ) {
            let start_year = 2025;
            let inputs = TaxInputs {
                start_year,
                filing_status: if joint { FilingStatus::Joint } else { FilingStatus::Single },
                primary_birth_year: primary_birth,
                primary_sex: Sex::Female,
                spouse_birth_year: if joint { Some(primary_birth + spouse_offset) } else { None },
                spouse_sex: None,
                wages: wages as f64,
                interest: interest as f64,
                qualified_dividends: dividends as f64,
                ira_balance: ira as f64,
                roth_balance: roth as f64,
                primary_ss_start_year: start_year + ss_offset,
                primary_ss_benefit: primary_ss as f64,
                spouse_ss_start_year: if joint { Some(start_year + ss_offset + 1) } else { None },
                spouse_ss_benefit: spouse_ss as f64,
                retirement_year: start_year + retire_offset,
                growth_rate: growth_bp as f64 / 10_000.0,
                inflation_rate: inflation_bp as f64 / 10_000.0,
                target_tier: IrmaaTier::ALL[tier],
                conversion_window: window(window_index, start_year + 6),
                medicare_enrollees: if joint { 2 } else { 1 },
                state_tax_rate: state_bp as f64 / 10_000.0,
                qcd_percent: qcd_pct as f64 / 100.0,
                primary_deferred_contribution: 10_000.0,
                primary_employer_match: 3_000.0,
                ..Default::default()
            };

            let engine = ProjectionEngine::default();
            let result = engine.project(&inputs);
            let eps = 1e-6;

            // Horizon
            prop_assert_eq!(result.baseline.len(), result.optimized.len());
            prop_assert!(result.baseline.len() as u32 >= MIN_PROJECTION_YEARS);

            let death_year = result.summary.first_spouse_death_year;
            prop_assert_eq!(death_year.is_some(), joint);

            for rows in [&result.baseline, &result.optimized] {
                for row in rows.iter() {
                    // Balances never go negative
                    prop_assert!(row.ira_balance >= 0.0 && row.roth_balance >= 0.0);
                    prop_assert!(row.ira_after_rmd >= 0.0);

                    // Single exactly in the years after the first death
                    let survivor = death_year.map_or(true, |d| row.year > d);
                    prop_assert_eq!(row.filing_status == FilingStatus::Single, survivor);

                    // Distribution and conversion bounds
                    prop_assert!(row.qcd <= row.rmd + eps);
                    prop_assert!(row.qcd <= row.qcd_limit + eps);
                    prop_assert!(row.qcd <= row.ira_before_withdrawal + eps);
                    prop_assert!(row.roth_conversion <= row.ira_after_rmd + eps);
                    prop_assert!(row.total_tax >= 0.0 && row.irmaa_surcharge >= 0.0);
                }
            }

            prop_assert!(result.baseline.iter().all(|r| r.roth_conversion == 0.0));

            // Cost identity
            let summary = &result.summary;
            let tolerance = 1e-9 * summary.baseline_total_cost.abs().max(1.0);
            prop_assert!(
                (summary.optimized_total_cost + summary.lifetime_savings - summary.baseline_total_cost).abs()
                    <= tolerance
            );

            // Determinism
            let again = engine.project(&inputs);
            prop_assert_eq!(&result.baseline, &again.baseline);
            prop_assert_eq!(&result.optimized, &again.optimized);
        }
    }
}
