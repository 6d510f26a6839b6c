//! Remaining life expectancy by age and sex
//!
//! Anchored on a period life table at five-year ages; intermediate ages
//! are linearly interpolated. Used for horizon sizing and to time the
//! first spouse's death, never for mortality-weighted cashflows.

use crate::household::Sex;

/// Remaining life expectancy never drops below this many years
const MIN_REMAINING_YEARS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct LifeExpectancyTable {
    /// (age, male remaining years, female remaining years), sorted by age
    anchors: Vec<(u32, f64, f64)>,
}

impl Default for LifeExpectancyTable {
    fn default() -> Self {
        Self {
            anchors: vec![
                (20, 55.4, 60.6),
                (25, 50.8, 55.7),
                (30, 46.3, 50.9),
                (35, 41.8, 46.1),
                (40, 37.4, 41.4),
                (45, 33.0, 36.8),
                (50, 28.8, 32.4),
                (55, 24.8, 28.1),
                (60, 21.0, 24.0),
                (65, 17.5, 20.1),
                (70, 14.1, 16.3),
                (75, 11.0, 12.8),
                (80, 8.2, 9.7),
                (85, 5.8, 7.0),
                (90, 4.0, 4.8),
                (95, 2.8, 3.3),
                (100, 2.1, 2.4),
                (105, 1.6, 1.7),
                (110, 1.2, 1.2),
            ],
        }
    }
}

impl LifeExpectancyTable {
    /// Build from (age, male, female) rows; returns `None` when empty
    pub fn from_rows(mut anchors: Vec<(u32, f64, f64)>) -> Option<Self> {
        if anchors.is_empty() {
            return None;
        }
        anchors.sort_by_key(|(age, _, _)| *age);
        anchors.dedup_by_key(|(age, _, _)| *age);
        Some(Self { anchors })
    }

    fn value(row: &(u32, f64, f64), sex: Sex) -> f64 {
        match sex {
            Sex::Male => row.1,
            Sex::Female => row.2,
        }
    }

    /// Expected remaining years of life at `age`
    pub fn remaining_years(&self, age: u32, sex: Sex) -> f64 {
        let first = &self.anchors[0];
        let last = &self.anchors[self.anchors.len() - 1];

        if age <= first.0 {
            return Self::value(first, sex) + (first.0 - age) as f64;
        }
        if age >= last.0 {
            return Self::value(last, sex).max(MIN_REMAINING_YEARS);
        }

        let upper_idx = self
            .anchors
            .iter()
            .position(|(a, _, _)| *a >= age)
            .unwrap_or(self.anchors.len() - 1);
        let upper = &self.anchors[upper_idx];
        if upper.0 == age {
            return Self::value(upper, sex).max(MIN_REMAINING_YEARS);
        }
        let lower = &self.anchors[upper_idx - 1];

        let span = (upper.0 - lower.0) as f64;
        let weight = (age - lower.0) as f64 / span;
        let lower_value = Self::value(lower, sex);
        let upper_value = Self::value(upper, sex);

        (lower_value + (upper_value - lower_value) * weight).max(MIN_REMAINING_YEARS)
    }
}
