//! Medicare IRMAA surcharge lookup and conversion target ceilings

use crate::assumptions::YearReferenceRow;
use crate::household::{FilingStatus, IrmaaTier};

/// Annual household IRMAA surcharge for `magi`.
///
/// Bracket floors in `row` are scaled by `factor`; MAGI must exceed a
/// bracket's scaled floor to land in it. The lowest bracket carries no
/// surcharge. The monthly surcharge is the bracket's Part B premium above
/// the base premium plus its Part D surcharge, annualized, inflated and
/// multiplied by the number of enrollees.
pub fn irmaa_surcharge(
    magi: f64,
    row: &YearReferenceRow,
    filing_status: FilingStatus,
    factor: f64,
    enrollees: u8,
) -> f64 {
    let brackets = row.brackets(filing_status);
    let position = brackets
        .iter()
        .rposition(|b| magi > b.floor * factor)
        .unwrap_or(0);
    if position == 0 {
        return 0.0;
    }

    let bracket = &brackets[position];
    let monthly = bracket.part_b_premium - row.base_part_b_premium + bracket.part_d_surcharge;
    monthly.max(0.0) * 12.0 * factor * enrollees as f64
}

/// MAGI ceilings the conversion sizer fills up to, per target tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionCeilings {
    /// Year the ceilings are stated in
    pub base_year: i32,
    pub single: [f64; 3],
    pub joint: [f64; 3],
}

impl Default for ConversionCeilings {
    fn default() -> Self {
        // First three IRMAA thresholds
        Self {
            base_year: 2025,
            single: [106_000.0, 133_000.0, 167_000.0],
            joint: [212_000.0, 266_000.0, 334_000.0],
        }
    }
}

impl ConversionCeilings {
    /// Unscaled ceiling for a tier
    pub fn ceiling(&self, tier: IrmaaTier, filing_status: FilingStatus) -> f64 {
        match filing_status {
            FilingStatus::Single => self.single[tier.index()],
            FilingStatus::Joint => self.joint[tier.index()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::YearReferenceTable;
    use approx::assert_relative_eq;

    #[test]
    fn test_lowest_bracket_has_no_surcharge() {
        let table = YearReferenceTable::default();
        let row = table.row(2025);
        assert_eq!(irmaa_surcharge(90_000.0, row, FilingStatus::Single, 1.0, 1), 0.0);
        assert_eq!(irmaa_surcharge(106_000.0, row, FilingStatus::Single, 1.0, 1), 0.0);
    }

    #[test]
    fn test_second_bracket_single() {
        let table = YearReferenceTable::default();
        let row = table.row(2025);
        // (259.00 - 185.00 + 13.70) * 12
        let surcharge = irmaa_surcharge(120_000.0, row, FilingStatus::Single, 1.0, 1);
        assert_relative_eq!(surcharge, 87.70 * 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_joint_top_bracket_two_enrollees() {
        let table = YearReferenceTable::default();
        let row = table.row(2025);
        let surcharge = irmaa_surcharge(900_000.0, row, FilingStatus::Joint, 1.0, 2);
        let monthly = 628.90 - 185.00 + 85.80;
        assert_relative_eq!(surcharge, monthly * 12.0 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_inflation_moves_floors_and_amounts() {
        let table = YearReferenceTable::default();
        let row = table.row(2025);
        // 110,000 is above the 2025 floor but below it once scaled by 5%
        assert!(irmaa_surcharge(110_000.0, row, FilingStatus::Single, 1.0, 1) > 0.0);
        assert_eq!(irmaa_surcharge(110_000.0, row, FilingStatus::Single, 1.05, 1), 0.0);

        let base = irmaa_surcharge(150_000.0, row, FilingStatus::Single, 1.0, 1);
        let inflated = irmaa_surcharge(157_500.0, row, FilingStatus::Single, 1.05, 1);
        assert_relative_eq!(inflated, base * 1.05, epsilon = 1e-9);
    }

    #[test]
    fn test_conversion_ceilings_increase_with_tier() {
        let ceilings = ConversionCeilings::default();
        for status in [FilingStatus::Single, FilingStatus::Joint] {
            let values: Vec<f64> = IrmaaTier::ALL.iter().map(|t| ceilings.ceiling(*t, status)).collect();
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(ceilings.ceiling(IrmaaTier::Tier0, FilingStatus::Joint), 212_000.0);
    }
}
