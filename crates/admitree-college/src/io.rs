use std::{fs, io::Read, path::Path};

use serde::Deserialize;

use crate::{Catalog, PlannerError, SatPercentileTable, Student};

#[derive(Debug, Deserialize)]
struct SatRow {
    score: u32,
    percentile: u32,
}

/// Load a school catalog from a JSON array of school records.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, PlannerError> {
    let json = fs::read_to_string(path)?;
    catalog_from_json(&json)
}

/// Parse a school catalog from JSON text.
pub fn catalog_from_json(json: &str) -> Result<Catalog, PlannerError> {
    let catalog: Catalog = serde_json::from_str(json)?;
    Ok(catalog)
}

/// Load a SAT percentile table from a CSV file with a `score,percentile` header.
pub fn load_sat_table(path: impl AsRef<Path>) -> Result<SatPercentileTable, PlannerError> {
    let file = fs::File::open(path)?;
    sat_table_from_reader(file)
}

/// Parse a SAT percentile table from CSV with a `score,percentile` header.
pub fn sat_table_from_reader(reader: impl Read) -> Result<SatPercentileTable, PlannerError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut pairs = Vec::new();
    for row in csv_reader.deserialize() {
        let row: SatRow = row?;
        pairs.push((row.score, row.percentile));
    }
    SatPercentileTable::new(pairs)
}

/// Load a student snapshot from JSON.
pub fn load_student(path: impl AsRef<Path>) -> Result<Student, PlannerError> {
    let json = fs::read_to_string(path)?;
    let student: Student = serde_json::from_str(&json)?;
    Ok(student)
}
