//! Roth-conversion sizing
//!
//! Fills MAGI up to one dollar under the target tier's ceiling each
//! eligible year. This is a greedy tier-filling heuristic, not a
//! multi-year optimum.

use crate::household::{FilingStatus, IrmaaTier};
use crate::tax::{inflation_factor, ConversionCeilings};

/// Conversion amount for one year.
///
/// `base_magi` is the year's MAGI without any conversion and
/// `available_ira` the IRA balance left after that year's distribution.
pub fn size_conversion(
    base_magi: f64,
    available_ira: f64,
    filing_status: FilingStatus,
    tier: IrmaaTier,
    year: i32,
    inflation_rate: f64,
    ceilings: &ConversionCeilings,
) -> f64 {
    let factor = inflation_factor(inflation_rate, year, ceilings.base_year);
    let ceiling = ceilings.ceiling(tier, filing_status) * factor;
    let headroom = (ceiling - base_magi - 1.0).max(0.0);

    headroom.min(available_ira.max(0.0))
}
