//! Retirement Projection - multi-year tax, RMD, QCD, IRMAA and Roth-conversion
//! projection engine for a retired or near-retired household
//!
//! This library provides:
//! - Federal, state and Social Security tax calculators
//! - Required minimum distributions with qualified charitable distributions
//! - Medicare IRMAA surcharges and tier-filling Roth conversions
//! - Survivor transition to single filing after the first spouse's death
//! - Side-by-side baseline vs. optimized projections and batch runs

pub mod error;
pub mod household;
pub mod assumptions;
pub mod tax;
pub mod projection;
pub mod batch;

// Re-export commonly used types
pub use error::{LoadError, LoadResult};
pub use household::{ConversionWindow, FilingStatus, IrmaaTier, Sex, TaxInputs};
pub use assumptions::Assumptions;
pub use projection::{
    compute_projection_years, expected_age, ProjectionConfig, ProjectionEngine, ProjectionResult,
    ProjectionSummary, ScenarioKind, ScenarioRow,
};
pub use batch::BatchRunner;

/// Project a household with the built-in tables and default configuration
pub fn project(inputs: &TaxInputs) -> ProjectionResult {
    ProjectionEngine::default().project(inputs)
}
