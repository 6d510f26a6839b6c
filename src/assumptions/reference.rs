//! Year-keyed Medicare and IRMAA reference data
//!
//! Each row holds one year's base Part B premium, the IRMAA bracket
//! schedules for single and joint filers, and the QCD annual limit.
//! Years after the last tabled row are extrapolated by inflation.

use crate::household::FilingStatus;
use crate::tax::inflation_factor;

/// One IRMAA bracket: MAGI in `[floor, ceiling)` pays these monthly amounts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrmaaBracket {
    pub floor: f64,
    /// `f64::INFINITY` for the top bracket
    pub ceiling: f64,
    /// Total monthly Part B premium in this bracket
    pub part_b_premium: f64,
    /// Monthly Part D income-related surcharge
    pub part_d_surcharge: f64,
}

impl IrmaaBracket {
    const fn new(floor: f64, ceiling: f64, part_b_premium: f64, part_d_surcharge: f64) -> Self {
        Self {
            floor,
            ceiling,
            part_b_premium,
            part_d_surcharge,
        }
    }
}

/// One tax year's Medicare/IRMAA constants
#[derive(Debug, Clone, PartialEq)]
pub struct YearReferenceRow {
    pub year: i32,
    pub base_part_b_premium: f64,
    /// Ordered by floor, lowest (no surcharge) bracket first
    pub single_brackets: Vec<IrmaaBracket>,
    pub joint_brackets: Vec<IrmaaBracket>,
    pub qcd_limit: f64,
}

impl YearReferenceRow {
    pub fn brackets(&self, filing_status: FilingStatus) -> &[IrmaaBracket] {
        match filing_status {
            FilingStatus::Single => &self.single_brackets,
            FilingStatus::Joint => &self.joint_brackets,
        }
    }
}

/// Static table of year reference rows, sorted by year
#[derive(Debug, Clone)]
pub struct YearReferenceTable {
    rows: Vec<YearReferenceRow>,
}

impl Default for YearReferenceTable {
    fn default() -> Self {
        const INF: f64 = f64::INFINITY;
        Self {
            rows: vec![
                YearReferenceRow {
                    year: 2024,
                    base_part_b_premium: 174.70,
                    single_brackets: vec![
                        IrmaaBracket::new(0.0, 103_000.0, 174.70, 0.0),
                        IrmaaBracket::new(103_000.0, 129_000.0, 244.60, 12.90),
                        IrmaaBracket::new(129_000.0, 161_000.0, 349.40, 33.30),
                        IrmaaBracket::new(161_000.0, 193_000.0, 454.20, 53.80),
                        IrmaaBracket::new(193_000.0, 500_000.0, 559.00, 74.20),
                        IrmaaBracket::new(500_000.0, INF, 594.00, 81.00),
                    ],
                    joint_brackets: vec![
                        IrmaaBracket::new(0.0, 206_000.0, 174.70, 0.0),
                        IrmaaBracket::new(206_000.0, 258_000.0, 244.60, 12.90),
                        IrmaaBracket::new(258_000.0, 322_000.0, 349.40, 33.30),
                        IrmaaBracket::new(322_000.0, 386_000.0, 454.20, 53.80),
                        IrmaaBracket::new(386_000.0, 750_000.0, 559.00, 74.20),
                        IrmaaBracket::new(750_000.0, INF, 594.00, 81.00),
                    ],
                    qcd_limit: 105_000.0,
                },
                YearReferenceRow {
                    year: 2025,
                    base_part_b_premium: 185.00,
                    single_brackets: vec![
                        IrmaaBracket::new(0.0, 106_000.0, 185.00, 0.0),
                        IrmaaBracket::new(106_000.0, 133_000.0, 259.00, 13.70),
                        IrmaaBracket::new(133_000.0, 167_000.0, 370.00, 35.30),
                        IrmaaBracket::new(167_000.0, 200_000.0, 480.90, 57.00),
                        IrmaaBracket::new(200_000.0, 500_000.0, 591.90, 78.60),
                        IrmaaBracket::new(500_000.0, INF, 628.90, 85.80),
                    ],
                    joint_brackets: vec![
                        IrmaaBracket::new(0.0, 212_000.0, 185.00, 0.0),
                        IrmaaBracket::new(212_000.0, 266_000.0, 259.00, 13.70),
                        IrmaaBracket::new(266_000.0, 334_000.0, 370.00, 35.30),
                        IrmaaBracket::new(334_000.0, 400_000.0, 480.90, 57.00),
                        IrmaaBracket::new(400_000.0, 750_000.0, 591.90, 78.60),
                        IrmaaBracket::new(750_000.0, INF, 628.90, 85.80),
                    ],
                    qcd_limit: 108_000.0,
                },
                YearReferenceRow {
                    year: 2026,
                    base_part_b_premium: 202.90,
                    single_brackets: vec![
                        IrmaaBracket::new(0.0, 109_000.0, 202.90, 0.0),
                        IrmaaBracket::new(109_000.0, 137_000.0, 284.10, 14.50),
                        IrmaaBracket::new(137_000.0, 171_000.0, 405.80, 37.50),
                        IrmaaBracket::new(171_000.0, 205_000.0, 527.50, 60.40),
                        IrmaaBracket::new(205_000.0, 500_000.0, 649.20, 83.30),
                        IrmaaBracket::new(500_000.0, INF, 689.90, 91.00),
                    ],
                    joint_brackets: vec![
                        IrmaaBracket::new(0.0, 218_000.0, 202.90, 0.0),
                        IrmaaBracket::new(218_000.0, 274_000.0, 284.10, 14.50),
                        IrmaaBracket::new(274_000.0, 342_000.0, 405.80, 37.50),
                        IrmaaBracket::new(342_000.0, 410_000.0, 527.50, 60.40),
                        IrmaaBracket::new(410_000.0, 750_000.0, 649.20, 83.30),
                        IrmaaBracket::new(750_000.0, INF, 689.90, 91.00),
                    ],
                    qcd_limit: 111_000.0,
                },
            ],
        }
    }
}

impl YearReferenceTable {
    /// Build from rows in any order; returns `None` when `rows` is empty
    pub fn from_rows(mut rows: Vec<YearReferenceRow>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        rows.sort_by_key(|r| r.year);
        for row in &mut rows {
            row.single_brackets
                .sort_by(|a, b| a.floor.total_cmp(&b.floor));
            row.joint_brackets
                .sort_by(|a, b| a.floor.total_cmp(&b.floor));
        }
        Some(Self { rows })
    }

    pub fn rows(&self) -> &[YearReferenceRow] {
        &self.rows
    }

    pub fn first_year(&self) -> i32 {
        self.rows[0].year
    }

    pub fn last_year(&self) -> i32 {
        self.rows[self.rows.len() - 1].year
    }

    /// Row for `year`, clamped to the tabled range
    pub fn row(&self, year: i32) -> &YearReferenceRow {
        self.rows
            .iter()
            .rev()
            .find(|r| r.year <= year)
            .unwrap_or(&self.rows[0])
    }

    /// Row for `year` if it is explicitly tabled
    pub fn exact_row(&self, year: i32) -> Option<&YearReferenceRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// Annual QCD limit, inflated beyond the last tabled year
    pub fn qcd_limit(&self, year: i32, inflation_rate: f64) -> f64 {
        if let Some(row) = self.exact_row(year) {
            return row.qcd_limit;
        }
        let row = self.row(year);
        row.qcd_limit * inflation_factor(inflation_rate, year, row.year)
    }
}
