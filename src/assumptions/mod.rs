//! Static reference data: Medicare/IRMAA year rows, life expectancy,
//! the RMD uniform lifetime table and the federal tax schedule

mod life_expectancy;
mod reference;
mod rmd;
pub mod loader;

pub use life_expectancy::LifeExpectancyTable;
pub use loader::LoadedReference;
pub use reference::{IrmaaBracket, YearReferenceRow, YearReferenceTable};
pub use rmd::{rmd_age, Distribution, UniformLifetimeTable};

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::tax::FederalTaxSchedule;

/// Container for all reference data a projection consults
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub reference: YearReferenceTable,
    pub life_expectancy: LifeExpectancyTable,
    pub uniform_lifetime: UniformLifetimeTable,
    pub tax: FederalTaxSchedule,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_tables()
    }
}

impl Assumptions {
    /// Built-in tables
    pub fn default_tables() -> Self {
        Self {
            reference: YearReferenceTable::default(),
            life_expectancy: LifeExpectancyTable::default(),
            uniform_lifetime: UniformLifetimeTable::default(),
            tax: FederalTaxSchedule::default(),
        }
    }

    /// Load reference data from CSV files in the default location (data/reference/)
    pub fn from_csv() -> LoadResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_REFERENCE_PATH))
    }

    /// Load reference data from CSV files in a specific directory.
    /// The federal tax schedule always comes from the built-in tables.
    pub fn from_csv_path(path: &Path) -> LoadResult<Self> {
        let loaded = LoadedReference::load_from(path)?;
        Self::from_loaded(loaded)
    }

    pub fn from_loaded(loaded: LoadedReference) -> LoadResult<Self> {
        Ok(Self {
            reference: YearReferenceTable::from_rows(loaded.year_reference)
                .ok_or(LoadError::EmptyTable("year_reference"))?,
            life_expectancy: LifeExpectancyTable::from_rows(loaded.life_expectancy)
                .ok_or(LoadError::EmptyTable("life_expectancy"))?,
            uniform_lifetime: UniformLifetimeTable::from_rows(loaded.uniform_lifetime)
                .ok_or(LoadError::EmptyTable("uniform_lifetime"))?,
            tax: FederalTaxSchedule::default(),
        })
    }
}
