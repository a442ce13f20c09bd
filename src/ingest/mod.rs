// ABOUTME: Dataset ingestion for the public CSV and wearable JSON sources
// ABOUTME: Normalizes bilingual column names into one raw record shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Dataset ingestion.
//!
//! Two source shapes are accepted: the public tabular dataset, whose
//! column names vary between Portuguese and English exports, and the
//! wearable dataset, a JSON list of structured run entries. Both are
//! normalized into [`RawRecord`]s; the schema validator turns those into
//! validated [`fitlife_core::Record`]s afterwards.

mod public;
mod wearable;

pub use public::load_public_csv;
pub use wearable::load_wearable_json;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use fitlife_core::models::DataSource;

/// Canonical fields of an ingested row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Session identifier
    Id,
    /// Recording timestamp or date
    Timestamp,
    /// Participant age
    Age,
    /// Gender label
    Gender,
    /// Height (cm, or meters in dirty exports)
    Height,
    /// Weight in kilograms
    Weight,
    /// Average heart rate
    Bpm,
    /// Calories burned
    Calories,
    /// Step count
    Steps,
    /// Session duration in minutes
    Duration,
    /// Distance in kilometers
    Distance,
    /// Activity label
    Activity,
    /// Smoking-level label
    SmokingLevel,
    /// Health-condition label
    HealthCondition,
}

/// Map a source column name onto its canonical field.
///
/// Matching is case-insensitive and tolerant of the accented and
/// unaccented spellings seen across dataset exports. Unknown columns
/// map to `None` and are ignored.
#[must_use]
pub fn canonical_field(header: &str) -> Option<Field> {
    let normalized = header.trim().to_lowercase();
    match normalized.as_str() {
        "id" => Some(Field::Id),
        "data" | "date" | "dt" | "timestamp" => Some(Field::Timestamp),
        "idade" | "age" => Some(Field::Age),
        "gênero" | "genero" | "gender" => Some(Field::Gender),
        "altura" | "altura_cm" | "height" | "height_cm" => Some(Field::Height),
        "peso" | "peso_kg" | "weight" | "weight_kg" => Some(Field::Weight),
        "bpm" | "bpm_medio" | "bpm_médio" | "heart_rate" | "avg_heart_rate" => Some(Field::Bpm),
        "calorias queimadas" | "calorias_kcal" | "calories" | "calories_kcal" => {
            Some(Field::Calories)
        }
        "passos" | "steps" => Some(Field::Steps),
        "duração" | "duracao" | "duracao_min" | "duration" | "duration_min" => {
            Some(Field::Duration)
        }
        "distancia" | "distância" | "distancia_km" | "distance" | "distance_km" => {
            Some(Field::Distance)
        }
        "tipo de atividade" | "atividade" | "activity" | "activity_type" => Some(Field::Activity),
        "nível de fumante" | "nivel de fumante" | "nivel_fumante" | "smoking_level" => {
            Some(Field::SmokingLevel)
        }
        "condição de saúde" | "condicao de saude" | "condicao_saude" | "health_condition" => {
            Some(Field::HealthCondition)
        }
        _ => None,
    }
}

/// One row as ingested, before schema validation.
///
/// Every field is optional here; the validator decides what a usable
/// record requires.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Session identifier, if the row carried one
    pub id: Option<String>,
    /// Parsed timestamp, if the row carried a parseable one
    pub timestamp: Option<DateTime<Utc>>,
    /// Age in years
    pub age: Option<f64>,
    /// Gender label
    pub gender: Option<String>,
    /// Height as recorded (unit fixed during validation)
    pub height: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Average heart rate
    pub bpm: Option<f64>,
    /// Calories burned
    pub calories_kcal: Option<f64>,
    /// Step count
    pub steps: Option<f64>,
    /// Duration in minutes
    pub duration_min: Option<f64>,
    /// Distance in kilometers
    pub distance_km: Option<f64>,
    /// Activity label
    pub activity: Option<String>,
    /// Smoking-level label
    pub smoking_level: Option<String>,
    /// Health-condition label
    pub health_condition: Option<String>,
    /// Dataset the row came from
    pub source: DataSource,
}

impl RawRecord {
    /// An all-`None` row for the given source
    #[must_use]
    pub const fn empty(source: DataSource) -> Self {
        Self {
            id: None,
            timestamp: None,
            age: None,
            gender: None,
            height: None,
            weight_kg: None,
            bpm: None,
            calories_kcal: None,
            steps: None,
            duration_min: None,
            distance_km: None,
            activity: None,
            smoking_level: None,
            health_condition: None,
            source,
        }
    }
}

/// Parse a numeric cell, coercing unparseable values to `None`
#[must_use]
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_lowercase().as_str() {
        "nan" | "none" | "null" | "na" => None,
        _ => trimmed.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Parse a text cell, coercing empty and placeholder values to `None`
#[must_use]
pub fn parse_text(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.to_lowercase().as_str() {
        "nan" | "none" | "null" | "na" => None,
        _ => Some(trimmed.to_owned()),
    }
}

/// Parse a timestamp cell.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, and bare dates (interpreted
/// as midnight UTC). Anything else is `None`.
#[must_use]
pub fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Timelike;

    #[test]
    fn portuguese_and_english_headers_map_to_the_same_field() {
        assert_eq!(canonical_field("Idade"), Some(Field::Age));
        assert_eq!(canonical_field("age"), Some(Field::Age));
        assert_eq!(canonical_field("Calorias Queimadas"), Some(Field::Calories));
        assert_eq!(canonical_field("calories_kcal"), Some(Field::Calories));
        assert_eq!(canonical_field("Nível de Fumante"), Some(Field::SmokingLevel));
        assert_eq!(canonical_field("Tipo de Atividade"), Some(Field::Activity));
        assert_eq!(canonical_field("unrelated_column"), None);
    }

    #[test]
    fn placeholder_cells_coerce_to_none() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("  42.5 "), Some(42.5));
        assert_eq!(parse_text("None"), None);
        assert_eq!(parse_text(" Fumante Leve "), Some("Fumante Leve".to_owned()));
    }

    #[test]
    fn date_only_timestamps_become_midnight_utc() {
        let ts = parse_timestamp("2024-03-15").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn datetime_and_rfc3339_both_parse() {
        assert!(parse_timestamp("2024-03-15 08:30:00").is_some());
        assert!(parse_timestamp("2024-03-15T08:30:00Z").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }
}
