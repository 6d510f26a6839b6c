//! Batch runner for projecting many households
//!
//! Pre-loads assumptions once, then runs any number of households (in
//! parallel) or target tiers without re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::LoadResult;
use crate::household::{HouseholdRecord, IrmaaTier, TaxInputs};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-loaded runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::from_csv()?;
/// let households = load_households("households.csv")?;
/// let results = runner.run_batch(&households);
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    engine: ProjectionEngine,
}

impl BatchRunner {
    /// Create runner with the built-in tables
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_tables())
    }

    /// Create runner by loading reference data from data/reference/
    pub fn from_csv() -> LoadResult<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?))
    }

    /// Create runner from a specific reference-data directory
    pub fn from_csv_path(path: &Path) -> LoadResult<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self::with_config(assumptions, ProjectionConfig::default())
    }

    pub fn with_config(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions, config),
        }
    }

    /// Project a single household
    pub fn run(&self, inputs: &TaxInputs) -> ProjectionResult {
        self.engine.project(inputs)
    }

    /// Project every household in parallel, preserving input order
    pub fn run_batch(&self, households: &[HouseholdRecord]) -> Vec<(String, ProjectionResult)> {
        log::debug!("Projecting {} households", households.len());
        households
            .par_iter()
            .map(|h| (h.household_id.clone(), self.engine.project(&h.inputs)))
            .collect()
    }

    /// Project one household once per target tier
    pub fn run_tier_sweep(&self, inputs: &TaxInputs) -> Vec<(IrmaaTier, ProjectionResult)> {
        IrmaaTier::ALL
            .par_iter()
            .map(|&tier| {
                let inputs = TaxInputs {
                    target_tier: tier,
                    ..inputs.clone()
                };
                (tier, self.engine.project(&inputs))
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}
