// ABOUTME: Metric selectors mapping derived records to the numeric values under analysis
// ABOUTME: Undefined metric values stay None so aggregates can skip them per-metric
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DerivedRecord;

/// A numeric metric extracted from a [`DerivedRecord`].
///
/// Extraction returns `None` for records where the metric is undefined;
/// such records are excluded from that metric's aggregate but retained for
/// every other metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Pace in minutes per kilometer
    Pace,
    /// Average heart rate in beats per minute
    Bpm,
    /// Calories burned (kcal)
    Calories,
    /// Distance in kilometers
    Distance,
    /// Duration in minutes
    Duration,
    /// Cadence in steps per minute
    Cadence,
    /// Body mass index
    Bmi,
    /// Step count
    Steps,
}

impl Metric {
    /// Extract the metric value, `None` when undefined for this record
    pub fn value(self, r: &DerivedRecord) -> Option<f64> {
        match self {
            Self::Pace => r.pace_min_per_km,
            Self::Bpm => r.record.bpm,
            Self::Calories => r.record.calories_kcal,
            Self::Distance => r.record.distance_km,
            Self::Duration => r.record.duration_min,
            Self::Cadence => r.cadence_steps_per_min,
            Self::Bmi => r.bmi,
            Self::Steps => r.record.steps.map(|s| s as f64),
        }
    }

    /// Column name used in summary tables
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pace => "pace_min_per_km",
            Self::Bpm => "bpm",
            Self::Calories => "calories_kcal",
            Self::Distance => "distance_km",
            Self::Duration => "duration_min",
            Self::Cadence => "cadence_steps_per_min",
            Self::Bmi => "bmi",
            Self::Steps => "steps",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
