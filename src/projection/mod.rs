//! Year-by-year baseline and Roth-conversion projections

mod conversion;
mod engine;
mod horizon;
mod rows;
mod scenario;
mod state;
mod summary;
mod year;

pub use conversion::size_conversion;
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use horizon::{
    compute_projection_years, expected_age, first_spouse_death, primary_profile, projection_years,
    spouse_profile, LifeProfile, SpouseDeath, MIN_PROJECTION_YEARS,
};
pub use rows::{write_rows_csv, write_rows_to_path, ScenarioKind, ScenarioRow};
pub use scenario::ScenarioRunner;
pub use state::ScenarioState;
pub use summary::{break_even_year, ProjectionResult, ProjectionSummary, ScenarioTotals};
pub use year::{HouseholdYear, YearIncome, YearMetrics, YearSimulator};
