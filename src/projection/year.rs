//! One household-year of a scenario
//!
//! Order of operations within a year:
//! 1. effective filing status and Medicare enrollees
//! 2. pre-retirement contributions
//! 3. IRA growth
//! 4. RMD/QCD, or the manual pre-RMD withdrawal
//! 5. wages net of deferred contributions
//! 6. Social Security (survivor takes the larger benefit)
//! 7. base metrics without a conversion
//! 8. conversion sizing and the with-conversion metrics
//! 9. Roth growth (plus the conversion in the optimized scenario)
//! 10. the immutable row

use crate::assumptions::{rmd_age, Assumptions};
use crate::household::{age_in_year, FilingStatus, Person, TaxInputs, MEDICARE_AGE};
use crate::tax::{inflation_factor, irmaa_surcharge, provisional_income};

use super::conversion::size_conversion;
use super::engine::ProjectionConfig;
use super::horizon::SpouseDeath;
use super::rows::{ScenarioKind, ScenarioRow};
use super::state::ScenarioState;

/// Non-Social-Security income for one year, in that year's dollars
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearIncome {
    pub wages: f64,
    pub interest: f64,
    pub qualified_dividends: f64,
    pub capital_gain_distributions: f64,
    pub short_term_gains: f64,
    pub long_term_gains: f64,
    pub other_income: f64,
    pub taxable_ira_withdrawal: f64,
}

impl YearIncome {
    /// Income taxed at ordinary rates (before any conversion)
    pub fn ordinary(&self) -> f64 {
        self.wages
            + self.interest
            + self.short_term_gains
            + self.other_income
            + self.taxable_ira_withdrawal
    }

    /// Qualified dividends and long-term gains
    pub fn preferential(&self) -> f64 {
        self.qualified_dividends + self.capital_gain_distributions + self.long_term_gains
    }
}

/// Tax and surcharge results for one income set
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearMetrics {
    pub provisional_income: f64,
    pub taxable_social_security: f64,
    pub agi: f64,
    pub magi: f64,
    pub taxable_income: f64,
    pub ordinary_tax: f64,
    pub capital_gains_tax: f64,
    pub state_tax: f64,
    pub total_tax: f64,
    pub effective_rate: f64,
    pub irmaa_surcharge: f64,
    pub total_cost: f64,
}

/// Who is alive and how the household files in a given year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdYear {
    pub filing_status: FilingStatus,
    pub medicare_enrollees: u8,
    /// Member whose age drives RMD and Medicare rules
    pub driver: Person,
    pub driver_birth_year: i32,
    pub age: u32,
    pub deceased: Option<Person>,
}

impl HouseholdYear {
    pub fn is_alive(&self, person: Person) -> bool {
        self.deceased != Some(person)
    }
}

/// Advances one scenario's state a year at a time
pub struct YearSimulator<'a> {
    assumptions: &'a Assumptions,
    config: &'a ProjectionConfig,
    inputs: &'a TaxInputs,
    kind: ScenarioKind,
    spouse_death: Option<SpouseDeath>,
    conversion_stop_year: Option<i32>,
    medicare_start_year: i32,
}

impl<'a> YearSimulator<'a> {
    pub fn new(
        assumptions: &'a Assumptions,
        config: &'a ProjectionConfig,
        inputs: &'a TaxInputs,
        kind: ScenarioKind,
        spouse_death: Option<SpouseDeath>,
    ) -> Self {
        Self {
            assumptions,
            config,
            inputs,
            kind,
            spouse_death,
            conversion_stop_year: inputs.conversion_stop_year(),
            medicare_start_year: inputs.resolved_medicare_start_year(),
        }
    }

    /// Filing status, enrollees and driving age for `year`
    pub fn household_year(&self, year: i32) -> HouseholdYear {
        let deceased = self
            .spouse_death
            .filter(|d| d.is_survivor_year(year))
            .map(|d| d.deceased);

        let (filing_status, medicare_enrollees) = match deceased {
            Some(_) => (
                FilingStatus::Single,
                if self.inputs.medicare_enrollees >= 2 {
                    self.inputs.medicare_enrollees - 1
                } else {
                    self.inputs.medicare_enrollees
                },
            ),
            None => (self.inputs.filing_status, self.inputs.medicare_enrollees),
        };

        let driver = match deceased {
            Some(Person::Primary) => Person::Spouse,
            _ => Person::Primary,
        };
        let driver_birth_year = self
            .inputs
            .birth_year(driver)
            .unwrap_or(self.inputs.primary_birth_year);

        HouseholdYear {
            filing_status,
            medicare_enrollees,
            driver,
            driver_birth_year,
            age: age_in_year(driver_birth_year, year),
            deceased,
        }
    }

    /// (deferred, roth, employer match) contributions of living members
    fn contributions(&self, household: &HouseholdYear, scale: f64) -> (f64, f64, f64) {
        let mut deferred = 0.0;
        let mut roth = 0.0;
        let mut employer = 0.0;

        if household.is_alive(Person::Primary) {
            deferred += self.inputs.primary_deferred_contribution;
            roth += self.inputs.primary_roth_contribution;
            employer += self.inputs.primary_employer_match;
        }
        if self.inputs.has_spouse() && household.is_alive(Person::Spouse) {
            deferred += self.inputs.spouse_deferred_contribution;
            roth += self.inputs.spouse_roth_contribution;
            employer += self.inputs.spouse_employer_match;
        }

        (
            deferred.max(0.0) * scale,
            roth.max(0.0) * scale,
            employer.max(0.0) * scale,
        )
    }

    /// A benefit grown by COLA from its own claiming year; zero before it
    fn grown_benefit(&self, benefit: f64, start_year: Option<i32>, year: i32) -> f64 {
        match start_year {
            Some(start) if year >= start => {
                benefit.max(0.0) * inflation_factor(self.inputs.inflation_rate, year, start)
            }
            _ => 0.0,
        }
    }

    /// Household Social Security: the sum of both benefits, or the larger
    /// one once a spouse has died
    pub fn social_security(&self, year: i32, household: &HouseholdYear) -> f64 {
        let primary = self.grown_benefit(
            self.inputs.primary_ss_benefit,
            Some(self.inputs.primary_ss_start_year),
            year,
        );
        let spouse = if self.inputs.has_spouse() {
            self.grown_benefit(self.inputs.spouse_ss_benefit, self.inputs.spouse_ss_start_year, year)
        } else {
            0.0
        };

        match household.deceased {
            Some(_) => primary.max(spouse),
            None => primary + spouse,
        }
    }

    fn medicare_applies(&self, household: &HouseholdYear, year: i32) -> bool {
        household.age >= MEDICARE_AGE && year >= self.medicare_start_year
    }

    /// Taxes, IRMAA and income measures for one income set plus `conversion`
    pub fn metrics(
        &self,
        income: &YearIncome,
        social_security: f64,
        conversion: f64,
        household: &HouseholdYear,
        year: i32,
    ) -> YearMetrics {
        let tax = &self.assumptions.tax;
        let status = household.filing_status;
        let factor = tax.factor(self.inputs.inflation_rate, year);

        let ordinary_income = income.ordinary() + conversion;
        let preferential = income.preferential();
        let non_ss_income = ordinary_income + preferential;

        let provisional = provisional_income(non_ss_income, social_security);
        let taxable_social_security =
            tax.social_security
                .taxable_benefits(social_security, provisional, status);

        let agi = non_ss_income + taxable_social_security;
        let magi = agi;
        let taxable_income = (agi - tax.standard_deduction.amount(status, factor)).max(0.0);

        let capital_gains_tax = tax.preferential.tax(preferential, taxable_income, status, factor);
        let ordinary_taxable = taxable_income - preferential.clamp(0.0, taxable_income);
        let ordinary_tax = tax.ordinary.tax(ordinary_taxable, status, factor);
        let state_tax = taxable_income * self.inputs.state_tax_rate.max(0.0);
        let total_tax = ordinary_tax + capital_gains_tax + state_tax;

        let irmaa = if self.medicare_applies(household, year) {
            let reference_year = self.config.irmaa_reference_year;
            irmaa_surcharge(
                magi,
                self.assumptions.reference.row(reference_year),
                status,
                inflation_factor(self.inputs.inflation_rate, year, reference_year),
                household.medicare_enrollees,
            )
        } else {
            0.0
        };

        YearMetrics {
            provisional_income: provisional,
            taxable_social_security,
            agi,
            magi,
            taxable_income,
            ordinary_tax,
            capital_gains_tax,
            state_tax,
            total_tax,
            effective_rate: if agi > 0.0 { total_tax / agi } else { 0.0 },
            irmaa_surcharge: irmaa,
            total_cost: total_tax + irmaa,
        }
    }

    fn conversion_allowed(&self, year: i32) -> bool {
        self.kind.conversions_enabled() && self.conversion_stop_year.map_or(true, |stop| year < stop)
    }

    /// Simulate `year`, updating `state` and returning its row
    pub fn step(&self, state: &mut ScenarioState, year: i32) -> ScenarioRow {
        let inputs = self.inputs;
        let household = self.household_year(year);
        let scale = inputs.income_scale(year);
        let working = year < inputs.retirement_year;

        let mut row = ScenarioRow::new(year, household.age, household.filing_status);
        row.medicare_enrollees = household.medicare_enrollees;

        // Contributions land before the year's growth
        let (deferred, roth_contribution, employer_match) = if working {
            self.contributions(&household, scale)
        } else {
            (0.0, 0.0, 0.0)
        };
        state.contribute(deferred + employer_match, roth_contribution);
        row.ira_contribution = deferred + employer_match;
        row.roth_contribution = roth_contribution;

        state.grow_ira(inputs.growth_rate);

        // Distributions
        row.ira_before_withdrawal = state.ira_balance;
        row.qcd_limit = self
            .assumptions
            .reference
            .qcd_limit(year, inputs.inflation_rate);

        let taxable_ira_withdrawal = if household.age >= rmd_age(household.driver_birth_year) {
            let distribution = self.assumptions.uniform_lifetime.distribution(
                state.ira_balance,
                household.age,
                inputs.qcd_percent,
                row.qcd_limit,
            );
            state.withdraw_ira(distribution.total_withdrawal);
            row.rmd = distribution.rmd;
            row.qcd = distribution.qcd;
            distribution.taxable
        } else {
            state.withdraw_ira(inputs.pre_rmd_withdrawal * scale)
        };
        row.taxable_ira_withdrawal = taxable_ira_withdrawal;
        row.ira_after_rmd = state.ira_balance;

        let income = YearIncome {
            wages: if working {
                (inputs.wages * scale - deferred).max(0.0)
            } else {
                0.0
            },
            interest: inputs.interest * scale,
            qualified_dividends: inputs.qualified_dividends * scale,
            capital_gain_distributions: inputs.capital_gain_distributions * scale,
            short_term_gains: inputs.short_term_gains * scale,
            long_term_gains: inputs.long_term_gains * scale,
            other_income: inputs.other_income * scale,
            taxable_ira_withdrawal,
        };
        row.wages = income.wages;
        row.interest = income.interest;
        row.qualified_dividends = income.qualified_dividends;
        row.capital_gain_distributions = income.capital_gain_distributions;
        row.short_term_gains = income.short_term_gains;
        row.long_term_gains = income.long_term_gains;
        row.other_income = income.other_income;

        let social_security = self.social_security(year, &household);
        row.social_security = social_security;

        let base = self.metrics(&income, social_security, 0.0, &household, year);
        let mut metrics = base;

        if self.conversion_allowed(year) {
            let amount = size_conversion(
                base.magi,
                state.ira_balance,
                household.filing_status,
                inputs.target_tier,
                year,
                inputs.inflation_rate,
                &self.assumptions.tax.conversion_ceilings,
            );
            if amount > 0.0 {
                let with_conversion = self.metrics(&income, social_security, amount, &household, year);
                row.roth_conversion = state.withdraw_ira(amount);
                row.conversion_tax = with_conversion.total_tax - base.total_tax;
                metrics = with_conversion;

                log::debug!(
                    "{year}: converting {:.0} (base MAGI {:.0}, conversion tax {:.0})",
                    row.roth_conversion,
                    base.magi,
                    row.conversion_tax
                );
            }
        }

        state.grow_roth(inputs.growth_rate);
        if self.kind.conversions_enabled() {
            state.deposit_roth(row.roth_conversion);
        }

        row.provisional_income = metrics.provisional_income;
        row.taxable_social_security = metrics.taxable_social_security;
        row.agi = metrics.agi;
        row.magi = metrics.magi;
        row.taxable_income = metrics.taxable_income;
        row.ordinary_tax = metrics.ordinary_tax;
        row.capital_gains_tax = metrics.capital_gains_tax;
        row.state_tax = metrics.state_tax;
        row.total_tax = metrics.total_tax;
        row.effective_rate = metrics.effective_rate;
        row.irmaa_surcharge = metrics.irmaa_surcharge;
        row.total_cost = metrics.total_cost;

        row.ira_balance = state.ira_balance;
        row.roth_balance = state.roth_balance;

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{ConversionWindow, IrmaaTier, Sex};
    use approx::assert_relative_eq;

    fn retiree() -> TaxInputs {
        TaxInputs {
            start_year: 2025,
            filing_status: FilingStatus::Single,
            primary_birth_year: 1958,
            primary_sex: Sex::Female,
            ira_balance: 800_000.0,
            roth_balance: 0.0,
            primary_ss_start_year: 2030,
            primary_ss_benefit: 30_000.0,
            retirement_year: 2024,
            growth_rate: 0.05,
            inflation_rate: 0.0,
            target_tier: IrmaaTier::Tier0,
            conversion_window: ConversionWindow::UntilRmdAge,
            ..Default::default()
        }
    }

    fn step_once(inputs: &TaxInputs, kind: ScenarioKind, year: i32) -> (ScenarioRow, ScenarioState) {
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let simulator = YearSimulator::new(&assumptions, &config, inputs, kind, None);
        let mut state = ScenarioState::from_inputs(inputs);
        let row = simulator.step(&mut state, year);
        (row, state)
    }

    #[test]
    fn test_rmd_at_75_from_post_growth_balance() {
        let inputs = TaxInputs {
            primary_birth_year: 1950,
            ira_balance: 500_000.0 / 1.05,
            ..retiree()
        };
        let (row, _) = step_once(&inputs, ScenarioKind::Baseline, 2025);

        assert_eq!(row.age, 75);
        assert_relative_eq!(row.ira_before_withdrawal, 500_000.0, epsilon = 1e-6);
        assert_relative_eq!(row.rmd, 20_325.20, epsilon = 0.01);
        assert_relative_eq!(row.taxable_ira_withdrawal, row.rmd);
        assert_relative_eq!(row.ira_balance, 500_000.0 - row.rmd, epsilon = 1e-6);
    }

    #[test]
    fn test_no_rmd_before_rmd_age() {
        let (row, _) = step_once(&retiree(), ScenarioKind::Baseline, 2025);
        assert_eq!(row.age, 67);
        assert_eq!(row.rmd, 0.0);
        assert_eq!(row.qcd, 0.0);
    }

    #[test]
    fn test_manual_withdrawal_before_rmd_age_is_taxable() {
        let inputs = TaxInputs {
            pre_rmd_withdrawal: 40_000.0,
            ..retiree()
        };
        let (row, state) = step_once(&inputs, ScenarioKind::Baseline, 2025);
        assert_eq!(row.taxable_ira_withdrawal, 40_000.0);
        assert_relative_eq!(state.ira_balance, 840_000.0 - 40_000.0, epsilon = 1e-6);
        assert_relative_eq!(row.agi, 40_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_qcd_removes_rmd_from_income() {
        let inputs = TaxInputs {
            primary_birth_year: 1950,
            qcd_percent: 1.0,
            ..retiree()
        };
        let (row, _) = step_once(&inputs, ScenarioKind::Baseline, 2025);
        assert!(row.rmd > 0.0);
        assert_relative_eq!(row.qcd, row.rmd);
        assert_eq!(row.taxable_ira_withdrawal, 0.0);
        assert_eq!(row.agi, 0.0);
        assert_eq!(row.total_tax, 0.0);
    }

    #[test]
    fn test_optimized_fills_to_tier_ceiling() {
        let (row, state) = step_once(&retiree(), ScenarioKind::Optimized, 2025);
        assert_relative_eq!(row.magi, 106_000.0 - 1.0, epsilon = 1e-6);
        assert_relative_eq!(row.roth_conversion, 105_999.0, epsilon = 1e-6);
        assert!(row.conversion_tax > 0.0);
        assert_relative_eq!(row.conversion_tax, row.total_tax, epsilon = 1e-9);
        // Roth grows before the conversion lands
        assert_relative_eq!(state.roth_balance, 105_999.0, epsilon = 1e-6);
        assert_relative_eq!(row.ira_balance, 840_000.0 - 105_999.0, epsilon = 1e-6);
    }

    #[test]
    fn test_baseline_never_converts() {
        let (row, _) = step_once(&retiree(), ScenarioKind::Baseline, 2025);
        assert_eq!(row.roth_conversion, 0.0);
        assert_eq!(row.conversion_tax, 0.0);
    }

    #[test]
    fn test_no_conversion_after_stop_year() {
        // Born 1958: RMD age 73, conversions stop in 2031
        let (row, _) = step_once(&retiree(), ScenarioKind::Optimized, 2031);
        assert_eq!(row.roth_conversion, 0.0);
        let (row, _) = step_once(&retiree(), ScenarioKind::Optimized, 2030);
        assert!(row.roth_conversion > 0.0);
    }

    #[test]
    fn test_pre_retirement_contributions_and_wages() {
        let inputs = TaxInputs {
            primary_birth_year: 1970,
            wages: 150_000.0,
            retirement_year: 2030,
            primary_deferred_contribution: 23_000.0,
            primary_roth_contribution: 7_000.0,
            primary_employer_match: 5_000.0,
            ira_balance: 100_000.0,
            roth_balance: 10_000.0,
            ..retiree()
        };
        let (row, state) = step_once(&inputs, ScenarioKind::Baseline, 2025);

        assert_eq!(row.wages, 127_000.0);
        assert_eq!(row.ira_contribution, 28_000.0);
        assert_relative_eq!(state.ira_balance, 128_000.0 * 1.05, epsilon = 1e-6);
        assert_relative_eq!(state.roth_balance, 17_000.0 * 1.05, epsilon = 1e-6);
    }

    #[test]
    fn test_irmaa_only_after_medicare_start() {
        let inputs = TaxInputs {
            primary_birth_year: 1962,
            interest: 300_000.0,
            retirement_year: 2024,
            ..retiree()
        };
        // Turns 65 in 2027
        let (row, _) = step_once(&inputs, ScenarioKind::Baseline, 2026);
        assert_eq!(row.irmaa_surcharge, 0.0);
        let (row, _) = step_once(&inputs, ScenarioKind::Baseline, 2027);
        assert!(row.irmaa_surcharge > 0.0);
        assert_relative_eq!(row.total_cost, row.total_tax + row.irmaa_surcharge);
    }

    #[test]
    fn test_survivor_year_files_single_with_larger_benefit() {
        let inputs = TaxInputs {
            filing_status: FilingStatus::Joint,
            spouse_birth_year: Some(1960),
            spouse_sex: Some(Sex::Male),
            primary_ss_start_year: 2025,
            primary_ss_benefit: 20_000.0,
            spouse_ss_start_year: Some(2025),
            spouse_ss_benefit: 35_000.0,
            medicare_enrollees: 2,
            ..retiree()
        };
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let death = SpouseDeath {
            year: 2026,
            deceased: Person::Spouse,
        };
        let simulator =
            YearSimulator::new(&assumptions, &config, &inputs, ScenarioKind::Baseline, Some(death));

        let before = simulator.household_year(2026);
        assert_eq!(before.filing_status, FilingStatus::Joint);
        assert_eq!(before.medicare_enrollees, 2);
        assert_eq!(simulator.social_security(2026, &before), 55_000.0);

        let after = simulator.household_year(2027);
        assert_eq!(after.filing_status, FilingStatus::Single);
        assert_eq!(after.medicare_enrollees, 1);
        assert_eq!(after.driver, Person::Primary);
        assert_eq!(simulator.social_security(2027, &after), 35_000.0);
    }

    #[test]
    fn test_primary_death_hands_ages_to_spouse() {
        let inputs = TaxInputs {
            filing_status: FilingStatus::Joint,
            spouse_birth_year: Some(1966),
            ..retiree()
        };
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let death = SpouseDeath {
            year: 2030,
            deceased: Person::Primary,
        };
        let simulator =
            YearSimulator::new(&assumptions, &config, &inputs, ScenarioKind::Baseline, Some(death));

        let household = simulator.household_year(2035);
        assert_eq!(household.driver, Person::Spouse);
        assert_eq!(household.age, 69);
        assert_eq!(household.driver_birth_year, 1966);
    }

    #[test]
    fn test_social_security_grows_from_claim_year() {
        let inputs = TaxInputs {
            inflation_rate: 0.02,
            primary_ss_start_year: 2027,
            primary_ss_benefit: 30_000.0,
            ..retiree()
        };
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let simulator = YearSimulator::new(&assumptions, &config, &inputs, ScenarioKind::Baseline, None);

        let household = simulator.household_year(2026);
        assert_eq!(simulator.social_security(2026, &household), 0.0);
        let household = simulator.household_year(2029);
        assert_relative_eq!(simulator.social_security(2029, &household), 30_000.0 * 1.02 * 1.02, epsilon = 1e-9);
    }
}
