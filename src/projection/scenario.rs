//! Runs one scenario (baseline or optimized) across the projection horizon

use crate::assumptions::Assumptions;
use crate::household::TaxInputs;

use super::engine::ProjectionConfig;
use super::horizon::{first_spouse_death, SpouseDeath};
use super::rows::{ScenarioKind, ScenarioRow};
use super::state::ScenarioState;
use super::year::YearSimulator;

/// Year-by-year driver for a single scenario.
///
/// Each run owns a fresh `ScenarioState`; nothing is shared between the
/// baseline and optimized runs except the read-only inputs and tables.
pub struct ScenarioRunner<'a> {
    simulator: YearSimulator<'a>,
    inputs: &'a TaxInputs,
    kind: ScenarioKind,
    horizon: u32,
    spouse_death: Option<SpouseDeath>,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(
        assumptions: &'a Assumptions,
        config: &'a ProjectionConfig,
        inputs: &'a TaxInputs,
        kind: ScenarioKind,
        horizon: u32,
    ) -> Self {
        let spouse_death = first_spouse_death(inputs, &assumptions.life_expectancy);
        Self {
            simulator: YearSimulator::new(assumptions, config, inputs, kind, spouse_death),
            inputs,
            kind,
            horizon,
            spouse_death,
        }
    }

    pub fn spouse_death(&self) -> Option<SpouseDeath> {
        self.spouse_death
    }

    /// Simulate every horizon year in order
    pub fn run(&self) -> Vec<ScenarioRow> {
        let start = self.inputs.start_year;
        let mut state = ScenarioState::from_inputs(self.inputs);
        let mut rows = Vec::with_capacity(self.horizon as usize);

        log::debug!(
            "Running {} scenario: {} years from {}",
            self.kind.as_str(),
            self.horizon,
            start
        );

        for offset in 0..self.horizon {
            let year = start + offset as i32;

            if let Some(death) = self.spouse_death {
                if year == death.year + 1 {
                    log::debug!(
                        "{}: {:?} deceased in {}, filing single from {}",
                        self.kind.as_str(),
                        death.deceased,
                        death.year,
                        year
                    );
                }
            }

            let row = self.simulator.step(&mut state, year);
            log::trace!(
                "{} {}: age {} IRA {:.0} Roth {:.0} cost {:.0}",
                self.kind.as_str(),
                row.year,
                row.age,
                row.ira_balance,
                row.roth_balance,
                row.total_cost
            );
            rows.push(row);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{FilingStatus, Sex};

    #[test]
    fn test_rows_cover_consecutive_years() {
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let inputs = TaxInputs {
            start_year: 2026,
            ira_balance: 250_000.0,
            ..Default::default()
        };

        let rows = ScenarioRunner::new(&assumptions, &config, &inputs, ScenarioKind::Baseline, 12).run();
        assert_eq!(rows.len(), 12);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.year, 2026 + i as i32);
        }
    }

    #[test]
    fn test_survivor_transition_is_one_way() {
        let assumptions = Assumptions::default_tables();
        let config = ProjectionConfig::default();
        let inputs = TaxInputs {
            start_year: 2025,
            filing_status: FilingStatus::Joint,
            primary_birth_year: 1955,
            primary_sex: Sex::Male,
            primary_life_expectancy: Some(75),
            spouse_birth_year: Some(1957),
            spouse_sex: Some(Sex::Female),
            spouse_life_expectancy: Some(90),
            medicare_enrollees: 2,
            ira_balance: 600_000.0,
            ..Default::default()
        };

        let runner = ScenarioRunner::new(&assumptions, &config, &inputs, ScenarioKind::Optimized, 22);
        let death = runner.spouse_death().unwrap();
        assert_eq!(death.year, 2030);

        let rows = runner.run();
        for row in &rows {
            if row.year <= 2030 {
                assert_eq!(row.filing_status, FilingStatus::Joint);
                assert_eq!(row.medicare_enrollees, 2);
            } else {
                assert_eq!(row.filing_status, FilingStatus::Single);
                assert_eq!(row.medicare_enrollees, 1);
            }
        }
    }
}
