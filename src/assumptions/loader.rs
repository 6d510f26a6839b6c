//! CSV-based reference data loader
//!
//! Loads IRMAA/QCD year rows, life expectancy and the uniform lifetime
//! table from CSV files in a reference-data directory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::reference::{IrmaaBracket, YearReferenceRow};
use crate::error::{LoadError, LoadResult};

/// Default path to the reference-data directory
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference";

pub const YEAR_REFERENCE_FILE: &str = "year_reference.csv";
pub const LIFE_EXPECTANCY_FILE: &str = "life_expectancy.csv";
pub const UNIFORM_LIFETIME_FILE: &str = "uniform_lifetime.csv";

fn open(path: &Path, file: &str) -> LoadResult<File> {
    let full = path.join(file);
    File::open(&full).map_err(|e| LoadError::io(full.display().to_string(), e))
}

#[derive(Debug, Deserialize)]
struct BracketCsvRow {
    year: i32,
    filing_status: String,
    floor: f64,
    /// Empty for the top bracket
    ceiling: Option<f64>,
    part_b_premium: f64,
    part_d_surcharge: f64,
    base_part_b_premium: f64,
    qcd_limit: f64,
}

/// Parse year reference rows, one CSV line per IRMAA bracket
pub fn load_year_reference_from_reader<R: Read>(reader: R) -> LoadResult<Vec<YearReferenceRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_year: BTreeMap<i32, YearReferenceRow> = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: BracketCsvRow = result?;
        let bracket = IrmaaBracket {
            floor: row.floor,
            ceiling: row.ceiling.unwrap_or(f64::INFINITY),
            part_b_premium: row.part_b_premium,
            part_d_surcharge: row.part_d_surcharge,
        };

        let entry = by_year.entry(row.year).or_insert_with(|| YearReferenceRow {
            year: row.year,
            base_part_b_premium: row.base_part_b_premium,
            single_brackets: Vec::new(),
            joint_brackets: Vec::new(),
            qcd_limit: row.qcd_limit,
        });

        match row.filing_status.as_str() {
            "Single" => entry.single_brackets.push(bracket),
            "Joint" => entry.joint_brackets.push(bracket),
            other => {
                return Err(LoadError::UnknownLabel {
                    field: "filing_status",
                    value: other.to_string(),
                })
            }
        }
    }

    let rows: Vec<YearReferenceRow> = by_year.into_values().collect();
    for row in &rows {
        if row.single_brackets.is_empty() || row.joint_brackets.is_empty() {
            return Err(LoadError::Parse {
                file: YEAR_REFERENCE_FILE.to_string(),
                line: 0,
                message: format!("year {} needs both Single and Joint brackets", row.year),
            });
        }
    }
    Ok(rows)
}

/// Load year reference rows from `year_reference.csv`
pub fn load_year_reference(path: &Path) -> LoadResult<Vec<YearReferenceRow>> {
    load_year_reference_from_reader(open(path, YEAR_REFERENCE_FILE)?)
}

/// Parse life expectancy rows: `age,male,female`
pub fn load_life_expectancy_from_reader<R: Read>(reader: R) -> LoadResult<Vec<(u32, f64, f64)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parse = |idx: usize| -> LoadResult<f64> {
            record
                .get(idx)
                .unwrap_or("")
                .trim()
                .parse::<f64>()
                .map_err(|e| LoadError::Parse {
                    file: LIFE_EXPECTANCY_FILE.to_string(),
                    line,
                    message: e.to_string(),
                })
        };

        let age: u32 = record
            .get(0)
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| LoadError::Parse {
                file: LIFE_EXPECTANCY_FILE.to_string(),
                line,
                message: e.to_string(),
            })?;
        let male = parse(1)?;
        let female = parse(2)?;
        if male < 0.0 || female < 0.0 {
            log::warn!("Skipping negative life expectancy row at line {line}");
            continue;
        }
        rows.push((age, male, female));
    }

    Ok(rows)
}

/// Load life expectancy rows from `life_expectancy.csv`
pub fn load_life_expectancy(path: &Path) -> LoadResult<Vec<(u32, f64, f64)>> {
    load_life_expectancy_from_reader(open(path, LIFE_EXPECTANCY_FILE)?)
}

/// Parse distribution periods: `age,factor`
pub fn load_uniform_lifetime_from_reader<R: Read>(reader: R) -> LoadResult<Vec<(u32, f64)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut factors = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parse_err = |message: String| LoadError::Parse {
            file: UNIFORM_LIFETIME_FILE.to_string(),
            line,
            message,
        };

        let age: u32 = record
            .get(0)
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| parse_err(e.to_string()))?;
        let factor: f64 = record
            .get(1)
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|e: std::num::ParseFloatError| parse_err(e.to_string()))?;

        if factor < 1.0 {
            log::warn!("Skipping distribution period {factor} below 1.0 at age {age}");
            continue;
        }
        factors.push((age, factor));
    }

    Ok(factors)
}

/// Load distribution periods from `uniform_lifetime.csv`
pub fn load_uniform_lifetime(path: &Path) -> LoadResult<Vec<(u32, f64)>> {
    load_uniform_lifetime_from_reader(open(path, UNIFORM_LIFETIME_FILE)?)
}

/// All reference data loaded from one directory
pub struct LoadedReference {
    pub year_reference: Vec<YearReferenceRow>,
    pub life_expectancy: Vec<(u32, f64, f64)>,
    pub uniform_lifetime: Vec<(u32, f64)>,
}

impl LoadedReference {
    /// Load all reference data from the default path
    pub fn load_default() -> LoadResult<Self> {
        Self::load_from(Path::new(DEFAULT_REFERENCE_PATH))
    }

    /// Load all reference data from a specific path
    pub fn load_from(path: &Path) -> LoadResult<Self> {
        Ok(Self {
            year_reference: load_year_reference(path)?,
            life_expectancy: load_life_expectancy(path)?,
            uniform_lifetime: load_uniform_lifetime(path)?,
        })
    }
}
