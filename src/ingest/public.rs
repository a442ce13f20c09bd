// ABOUTME: CSV loader for the public fitness dataset with bilingual headers
// ABOUTME: Unknown columns are ignored; cells are coerced leniently into RawRecords
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use std::path::Path;

use tracing::{debug, info};

use fitlife_core::models::DataSource;

use super::{canonical_field, parse_number, parse_text, parse_timestamp, Field, RawRecord};
use crate::errors::{AppError, AppResult};

/// Load the public tabular dataset from a CSV file.
///
/// Headers are normalized through [`canonical_field`]; columns that map
/// to no canonical field are ignored. Cell-level problems (unparseable
/// numbers, placeholder strings) coerce to `None` rather than failing
/// the load; structural CSV errors fail it.
///
/// # Errors
///
/// Returns an error when the file cannot be read or a row is
/// structurally malformed.
pub fn load_public_csv(path: &Path) -> AppResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_path(path)?;

    let columns: Vec<Option<Field>> = reader
        .headers()?
        .iter()
        .map(canonical_field)
        .collect();
    if !columns.iter().any(|c| matches!(c, Some(Field::Id))) {
        return Err(AppError::ingest(format!(
            "{}: no recognizable id column",
            path.display()
        )));
    }
    debug!(
        recognized = columns.iter().filter(|c| c.is_some()).count(),
        total = columns.len(),
        "mapped public dataset headers"
    );

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut raw = RawRecord::empty(DataSource::Public);
        for (field, cell) in columns.iter().zip(row.iter()) {
            let Some(field) = field else { continue };
            apply_cell(&mut raw, *field, cell);
        }
        records.push(raw);
    }

    info!(rows = records.len(), path = %path.display(), "loaded public dataset");
    Ok(records)
}

fn apply_cell(raw: &mut RawRecord, field: Field, cell: &str) {
    match field {
        Field::Id => raw.id = parse_text(cell),
        Field::Timestamp => raw.timestamp = parse_timestamp(cell),
        Field::Age => raw.age = parse_number(cell),
        Field::Gender => raw.gender = parse_text(cell),
        Field::Height => raw.height = parse_number(cell),
        Field::Weight => raw.weight_kg = parse_number(cell),
        Field::Bpm => raw.bpm = parse_number(cell),
        Field::Calories => raw.calories_kcal = parse_number(cell),
        Field::Steps => raw.steps = parse_number(cell),
        Field::Duration => raw.duration_min = parse_number(cell),
        Field::Distance => raw.distance_km = parse_number(cell),
        Field::Activity => raw.activity = parse_text(cell),
        Field::SmokingLevel => raw.smoking_level = parse_text(cell),
        Field::HealthCondition => raw.health_condition = parse_text(cell),
    }
}
