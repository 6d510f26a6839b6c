//! Household input records and loading

mod data;
pub mod loader;

pub use data::{
    age_in_year, ConversionWindow, FilingStatus, IrmaaTier, Person, Sex, TaxInputs, MEDICARE_AGE,
};
pub use loader::{
    load_households, load_households_from_reader, load_inputs, load_inputs_from_str,
    HouseholdRecord,
};
