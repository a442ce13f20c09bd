// ABOUTME: Observation records for the fitness datasets, raw and feature-enriched
// ABOUTME: Records are immutable once validated; derivation happens exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AgeBracket;

/// Which dataset an observation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Public tabular dataset (bilingual column names, normalized on ingest)
    Public,
    /// Wearable dataset (structured run entries)
    Wearable,
}

/// One validated observation.
///
/// Optional fields carry `None` when the source row had no value; the schema
/// validator has already enforced the physiological ranges on everything
/// that is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Session identifier (provider-specific, non-empty)
    pub id: String,
    /// When the session was recorded (UTC)
    pub timestamp: DateTime<Utc>,
    /// Participant age in years, within [5, 120]
    pub age: u32,
    /// Participant gender label, as recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Height in centimeters, within [120, 230] when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Weight in kilograms, within [30, 250] when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Average heart rate in beats per minute, within [30, 220] when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,
    /// Calories burned during the session (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_kcal: Option<f64>,
    /// Step count for the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    /// Session duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    /// Distance covered in kilometers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Free-text activity label (e.g. "Running", "Corrida")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    /// Free-text smoking-level label (e.g. "Fumante Leve", "Non-Smoker")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking_level: Option<String>,
    /// Free-text health condition label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_condition: Option<String>,
    /// Dataset the record came from
    pub source: DataSource,
}

/// A [`Record`] enriched with derived features.
///
/// Produced exactly once by the feature deriver and never mutated
/// afterwards. `None` on `pace_min_per_km` / `cadence_steps_per_min` / `bmi`
/// is the undefined sentinel for guarded divisions; aggregates skip it
/// per-metric while keeping the record for every other metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRecord {
    /// The validated source observation
    pub record: Record,
    /// Pace in minutes per kilometer; undefined when distance is zero or missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    /// Cadence in steps per minute; undefined when duration is zero or missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_steps_per_min: Option<f64>,
    /// Body mass index; undefined when height or weight is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    /// True when the activity label indicates running or jogging
    pub is_runner: bool,
    /// True when the smoking label indicates an active smoker
    pub is_smoker: bool,
    /// True when any practitioner rule matches (sport activity, steps, or duration)
    pub is_practitioner: bool,
    /// Age bracket assigned from the configured bin edges
    pub age_bracket: AgeBracket,
}

impl DerivedRecord {
    /// Session identifier passthrough
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// When the session was recorded
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.record.timestamp
    }
}
