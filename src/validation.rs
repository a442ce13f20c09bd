// ABOUTME: Schema validation turning raw ingested rows into validated Records
// ABOUTME: Invalid rows are dropped and counted per reason; duplicates deduped by (id, timestamp)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Schema validation.
//!
//! The validator enforces the physiological ranges the analyses assume:
//! required id, timestamp, and age; bounded bpm, height, and weight when
//! present; non-negative session quantities. Rows that fail a required
//! check are dropped and tallied by reason, never panicked on. Heights
//! recorded in meters (dirty exports) are converted to centimeters
//! before the range check.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fitlife_core::constants::{age, heart_rate, height, weight};
use fitlife_core::models::{DataSource, Record};

use crate::ingest::RawRecord;

/// Why a row was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Missing or empty session identifier
    MissingId,
    /// Missing or unparseable timestamp
    MissingTimestamp,
    /// Missing age or age outside [5, 120]
    InvalidAge,
    /// Heart rate outside [30, 220]
    InvalidBpm,
    /// Height outside [120, 230] cm after unit normalization
    InvalidHeight,
    /// Weight outside [30, 250] kg
    InvalidWeight,
    /// Negative duration, calories, steps, or distance
    NegativeQuantity,
    /// Wearable entry without a positive distance
    MissingDistance,
    /// Same (id, timestamp) already seen; first occurrence wins
    Duplicate,
}

/// Per-reason tally of dropped rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Rows that arrived
    pub n_input: usize,
    /// Rows that passed every check
    pub n_valid: usize,
    /// Reject tallies, one per reason that occurred
    pub rejections: Vec<(RejectReason, usize)>,
}

impl ValidationReport {
    fn bump(&mut self, reason: RejectReason) {
        if let Some(entry) = self.rejections.iter_mut().find(|(r, _)| *r == reason) {
            entry.1 += 1;
        } else {
            self.rejections.push((reason, 1));
        }
    }

    /// Total rows dropped
    #[must_use]
    pub fn n_rejected(&self) -> usize {
        self.rejections.iter().map(|(_, n)| n).sum()
    }
}

/// Validate a batch of raw rows.
///
/// Returns the validated records in input order together with the
/// rejection report. Duplicate (id, timestamp) pairs keep the first
/// occurrence.
#[must_use]
pub fn validate_records(raw: Vec<RawRecord>) -> (Vec<Record>, ValidationReport) {
    let mut report = ValidationReport {
        n_input: raw.len(),
        ..ValidationReport::default()
    };
    let mut seen: HashSet<(String, i64)> = HashSet::new();
    let mut valid = Vec::with_capacity(raw.len());

    for row in raw {
        match validate_row(row) {
            Ok(record) => {
                let key = (record.id.clone(), record.timestamp.timestamp());
                if seen.insert(key) {
                    valid.push(record);
                } else {
                    report.bump(RejectReason::Duplicate);
                }
            }
            Err(reason) => report.bump(reason),
        }
    }

    report.n_valid = valid.len();
    if report.n_rejected() > 0 {
        warn!(
            rejected = report.n_rejected(),
            input = report.n_input,
            "dropped rows during validation"
        );
    }
    info!(valid = report.n_valid, "validation finished");
    (valid, report)
}

/// Convert heights recorded in meters into centimeters.
fn normalize_height(value: f64) -> f64 {
    if value < height::METERS_THRESHOLD {
        value * 100.0
    } else {
        value
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn validate_row(row: RawRecord) -> Result<Record, RejectReason> {
    let id = row.id.filter(|s| !s.is_empty()).ok_or(RejectReason::MissingId)?;
    let timestamp = row.timestamp.ok_or(RejectReason::MissingTimestamp)?;

    let age_years = row.age.ok_or(RejectReason::InvalidAge)?;
    if age_years < f64::from(age::MIN_YEARS) || age_years > f64::from(age::MAX_YEARS) {
        return Err(RejectReason::InvalidAge);
    }

    if let Some(bpm) = row.bpm {
        if !(heart_rate::MIN_BPM..=heart_rate::MAX_BPM).contains(&bpm) {
            return Err(RejectReason::InvalidBpm);
        }
    }

    let height_cm = row.height.map(normalize_height);
    if let Some(h) = height_cm {
        if !(height::MIN_CM..=height::MAX_CM).contains(&h) {
            return Err(RejectReason::InvalidHeight);
        }
    }

    if let Some(w) = row.weight_kg {
        if !(weight::MIN_KG..=weight::MAX_KG).contains(&w) {
            return Err(RejectReason::InvalidWeight);
        }
    }

    for quantity in [row.duration_min, row.calories_kcal, row.steps, row.distance_km] {
        if quantity.is_some_and(|v| v < 0.0) {
            return Err(RejectReason::NegativeQuantity);
        }
    }

    // Wearable entries are run logs; a run without distance is noise.
    if row.source == DataSource::Wearable && !row.distance_km.is_some_and(|d| d > 0.0) {
        return Err(RejectReason::MissingDistance);
    }

    Ok(Record {
        id,
        timestamp,
        age: age_years as u32,
        gender: row.gender,
        height_cm,
        weight_kg: row.weight_kg,
        bpm: row.bpm,
        calories_kcal: row.calories_kcal,
        steps: row.steps.map(|s| s as u64),
        duration_min: row.duration_min,
        distance_km: row.distance_km,
        activity: row.activity,
        smoking_level: row.smoking_level,
        health_condition: row.health_condition,
        source: row.source,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(id: &str, age: f64) -> RawRecord {
        RawRecord {
            id: Some(id.to_owned()),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            age: Some(age),
            ..RawRecord::empty(DataSource::Public)
        }
    }

    #[test]
    fn valid_row_passes_and_is_counted() {
        let (records, report) = validate_records(vec![raw("a", 30.0)]);
        assert_eq!(records.len(), 1);
        assert_eq!(report.n_valid, 1);
        assert_eq!(report.n_rejected(), 0);
    }

    #[test]
    fn out_of_range_bpm_is_dropped_with_reason() {
        let mut row = raw("a", 30.0);
        row.bpm = Some(250.0);
        let (records, report) = validate_records(vec![row]);
        assert!(records.is_empty());
        assert_eq!(report.rejections, vec![(RejectReason::InvalidBpm, 1)]);
    }

    #[test]
    fn meter_heights_are_converted_before_the_range_check() {
        let mut row = raw("a", 30.0);
        row.height = Some(1.75);
        let (records, _) = validate_records(vec![row]);
        assert_eq!(records[0].height_cm, Some(175.0));
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let (records, _) = validate_records(vec![raw("a", 5.0), raw("b", 120.0)]);
        assert_eq!(records.len(), 2);
        let (records, report) = validate_records(vec![raw("c", 4.0), raw("d", 121.0)]);
        assert!(records.is_empty());
        assert_eq!(report.rejections, vec![(RejectReason::InvalidAge, 2)]);
    }

    #[test]
    fn duplicates_keep_the_first_occurrence() {
        let mut first = raw("a", 30.0);
        first.bpm = Some(100.0);
        let mut second = raw("a", 30.0);
        second.bpm = Some(150.0);
        let (records, report) = validate_records(vec![first, second]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bpm, Some(100.0));
        assert_eq!(report.rejections, vec![(RejectReason::Duplicate, 1)]);
    }

    #[test]
    fn wearable_entries_require_positive_distance() {
        let mut row = raw("a", 30.0);
        row.source = DataSource::Wearable;
        row.distance_km = Some(0.0);
        let (records, report) = validate_records(vec![row]);
        assert!(records.is_empty());
        assert_eq!(report.rejections, vec![(RejectReason::MissingDistance, 1)]);
    }
}
