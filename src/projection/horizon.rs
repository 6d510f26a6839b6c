//! Projection horizon sizing and survivor-transition timing

use serde::{Deserialize, Serialize};

use crate::assumptions::LifeExpectancyTable;
use crate::household::{age_in_year, Person, Sex, TaxInputs};

/// The horizon is never shorter than this many years
pub const MIN_PROJECTION_YEARS: u32 = 10;

/// What the life-expectancy lookups need to know about one person
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeProfile {
    pub current_age: u32,
    pub sex: Sex,
    /// Expected age at death, replacing the table when present
    pub life_expectancy: Option<u32>,
}

impl LifeProfile {
    pub fn new(current_age: u32, sex: Sex, life_expectancy: Option<u32>) -> Self {
        Self {
            current_age,
            sex,
            life_expectancy,
        }
    }

    /// Remaining years of life, from the override or the table
    pub fn years_remaining(&self, table: &LifeExpectancyTable) -> f64 {
        match self.life_expectancy {
            Some(age) => (age as f64 - self.current_age as f64).max(0.0),
            None => table.remaining_years(self.current_age, self.sex),
        }
    }
}

/// Primary's life profile at the start of the projection
pub fn primary_profile(inputs: &TaxInputs) -> LifeProfile {
    LifeProfile::new(
        age_in_year(inputs.primary_birth_year, inputs.start_year),
        inputs.primary_sex,
        inputs.primary_life_expectancy,
    )
}

/// Spouse's life profile, present only for joint filers with a known spouse.
/// A missing spouse sex is taken as the opposite of the primary's.
pub fn spouse_profile(inputs: &TaxInputs) -> Option<LifeProfile> {
    if !inputs.has_spouse() {
        return None;
    }
    let birth_year = inputs.spouse_birth_year?;
    let sex = inputs.spouse_sex.unwrap_or(match inputs.primary_sex {
        Sex::Male => Sex::Female,
        Sex::Female => Sex::Male,
    });
    Some(LifeProfile::new(
        age_in_year(birth_year, inputs.start_year),
        sex,
        inputs.spouse_life_expectancy,
    ))
}

/// Number of years to project: the longer of the two remaining lifetimes,
/// rounded, and never fewer than `MIN_PROJECTION_YEARS`
pub fn compute_projection_years(
    primary: LifeProfile,
    spouse: Option<LifeProfile>,
    table: &LifeExpectancyTable,
) -> u32 {
    let primary_years = primary.years_remaining(table);
    let spouse_years = spouse.map(|s| s.years_remaining(table)).unwrap_or(0.0);

    let years = primary_years.max(spouse_years).round() as u32;
    years.max(MIN_PROJECTION_YEARS)
}

/// Horizon for a household's inputs
pub fn projection_years(inputs: &TaxInputs, table: &LifeExpectancyTable) -> u32 {
    compute_projection_years(primary_profile(inputs), spouse_profile(inputs), table)
}

/// Expected age at death for display
pub fn expected_age(profile: LifeProfile, table: &LifeExpectancyTable) -> u32 {
    match profile.life_expectancy {
        Some(age) => age,
        None => (profile.current_age as f64 + table.remaining_years(profile.current_age, profile.sex))
            .round() as u32,
    }
}

/// The year the first spouse is expected to die, and who it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpouseDeath {
    pub year: i32,
    pub deceased: Person,
}

impl SpouseDeath {
    /// True for every year after the death year
    pub fn is_survivor_year(&self, year: i32) -> bool {
        year > self.year
    }
}

/// First-spouse-death year for a joint household, `None` otherwise.
/// Shared by the scenario runner and the projection summary.
pub fn first_spouse_death(inputs: &TaxInputs, table: &LifeExpectancyTable) -> Option<SpouseDeath> {
    let spouse = spouse_profile(inputs)?;
    let spouse_birth_year = inputs.spouse_birth_year?;

    let primary_year = inputs.primary_birth_year + expected_age(primary_profile(inputs), table) as i32;
    let spouse_year = spouse_birth_year + expected_age(spouse, table) as i32;

    Some(if primary_year <= spouse_year {
        SpouseDeath {
            year: primary_year,
            deceased: Person::Primary,
        }
    } else {
        SpouseDeath {
            year: spouse_year,
            deceased: Person::Spouse,
        }
    })
}
