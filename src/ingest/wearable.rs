// ABOUTME: JSON loader for the wearable run dataset
// ABOUTME: Entries missing an activity label default to Running
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use fitlife_core::models::DataSource;

use super::{parse_timestamp, RawRecord};
use crate::errors::AppResult;

/// One wearable entry as it appears on disk.
///
/// Field aliases absorb the naming drift between device firmware
/// versions; everything except the id is optional.
#[derive(Debug, Deserialize)]
struct WearableEntry {
    id: Option<String>,
    #[serde(alias = "data", alias = "date", alias = "dt")]
    timestamp: Option<String>,
    #[serde(alias = "idade")]
    age: Option<f64>,
    #[serde(alias = "genero")]
    gender: Option<String>,
    #[serde(alias = "altura_cm", alias = "height_cm")]
    height: Option<f64>,
    #[serde(alias = "peso_kg", alias = "weight_kg")]
    weight: Option<f64>,
    #[serde(alias = "bpm_medio", alias = "bpm", alias = "avg_heart_rate")]
    heart_rate: Option<f64>,
    #[serde(alias = "calorias_kcal", alias = "calories_kcal")]
    calories: Option<f64>,
    #[serde(alias = "passos", alias = "steps")]
    step_count: Option<f64>,
    #[serde(alias = "duracao_min", alias = "duration_min")]
    duration: Option<f64>,
    #[serde(alias = "distancia_km", alias = "distance_km")]
    distance: Option<f64>,
    #[serde(alias = "atividade")]
    activity: Option<String>,
    #[serde(alias = "nivel_fumante")]
    smoking_level: Option<String>,
    #[serde(alias = "condicao_saude")]
    health_condition: Option<String>,
}

/// Load the wearable dataset from a JSON array of run entries.
///
/// Entries without an activity label are treated as runs, which is what
/// the device records in the first place.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a JSON array
/// of entries.
pub fn load_wearable_json(path: &Path) -> AppResult<Vec<RawRecord>> {
    let file = File::open(path)?;
    let entries: Vec<WearableEntry> = serde_json::from_reader(BufReader::new(file))?;

    let records: Vec<RawRecord> = entries.into_iter().map(into_raw).collect();
    info!(rows = records.len(), path = %path.display(), "loaded wearable dataset");
    Ok(records)
}

fn into_raw(entry: WearableEntry) -> RawRecord {
    RawRecord {
        id: entry.id,
        timestamp: entry.timestamp.as_deref().and_then(parse_timestamp),
        age: entry.age,
        gender: entry.gender,
        height: entry.height,
        weight_kg: entry.weight,
        bpm: entry.heart_rate,
        calories_kcal: entry.calories,
        steps: entry.step_count,
        duration_min: entry.duration,
        distance_km: entry.distance,
        activity: entry.activity.or_else(|| Some("Running".to_owned())),
        smoking_level: entry.smoking_level,
        health_condition: entry.health_condition,
        source: DataSource::Wearable,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn entries_load_with_activity_defaulting_to_running() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            r#"[{
                "id": "R0001",
                "data": "2024-02-01",
                "idade": 28,
                "genero": "M",
                "altura_cm": 178.0,
                "peso_kg": 74.0,
                "distancia_km": 10.2,
                "duracao_min": 55.0,
                "calorias_kcal": 640.0,
                "bpm_medio": 156.0,
                "passos": 11200,
                "nivel_fumante": "Não Fumante"
            }]"#
            .as_bytes(),
        )
        .unwrap();

        let records = load_wearable_json(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id.as_deref(), Some("R0001"));
        assert_eq!(r.activity.as_deref(), Some("Running"));
        assert_eq!(r.bpm, Some(156.0));
        assert_eq!(r.source, DataSource::Wearable);
    }

    #[test]
    fn malformed_json_fails_the_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"an array\"}").unwrap();
        assert!(load_wearable_json(file.path()).is_err());
    }
}
