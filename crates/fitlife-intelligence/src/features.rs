// ABOUTME: Feature deriver computing pace, cadence, BMI, boolean flags, and age brackets
// ABOUTME: Pure function of a validated record; guarded divisions return None, never NaN
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Feature derivation.
//!
//! The deriver assumes clean input: the schema validator has already
//! rejected negative distances/durations and out-of-range physiological
//! values, so nothing in this module returns an error for domain-valid
//! records.

use fitlife_core::models::{AgeBracket, DerivedRecord, Record};
use fitlife_core::AnalysisConfig;
use rayon::prelude::*;
use tracing::debug;

/// Guarded division: `None` when the denominator is not strictly positive.
///
/// This is the undefined sentinel required by the pace/cadence contract;
/// NaN must never leak into aggregates.
fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

/// True when the activity label indicates running or jogging.
///
/// Case-insensitive substring match over the bilingual label vocabulary
/// ("Running", "Jogging", and the Portuguese "Corrida").
pub fn is_runner_label(activity: &str) -> bool {
    let lowered = activity.to_lowercase();
    ["running", "jogging", "corrida"]
        .iter()
        .any(|k| lowered.contains(k))
}

/// True when the smoking-level label indicates an active smoker.
///
/// Labels containing a non-smoker or ex-smoker marker are explicitly
/// excluded, in both label languages ("Não Fumante", "Ex-fumante",
/// "Non-Smoker", "Ex-Smoker").
pub fn is_smoker_label(smoking_level: &str) -> bool {
    let lowered = smoking_level.to_lowercase();
    let mentions_smoking = lowered.contains("fumante") || lowered.contains("smoker");
    let negated = lowered.contains("não")
        || lowered.contains("nao ")
        || lowered.contains("non")
        || lowered.contains("ex-")
        || lowered.contains("ex ");
    mentions_smoking && !negated
}

/// Practitioner classification: a monotone OR over three conditions.
///
/// Any one of {sport activity, steps >= threshold, duration >= threshold}
/// suffices; flipping one condition from false to true can never clear the
/// flag.
fn is_practitioner(record: &Record, config: &AnalysisConfig) -> bool {
    let by_activity = record
        .activity
        .as_deref()
        .is_some_and(|a| config.is_sport_activity(a));
    let by_steps = record
        .steps
        .is_some_and(|s| s >= config.practitioner_rules.min_steps);
    let by_duration = record
        .duration_min
        .is_some_and(|d| d >= config.practitioner_rules.min_duration_min);
    by_activity || by_steps || by_duration
}

/// Derive all features for one validated record.
///
/// Deterministic pure function of the input; never raises for domain-valid
/// records. Ages beyond the final bin edge cannot occur here because the
/// validator caps ages at 120, so the bracket fallback is unreachable in
/// practice.
pub fn derive_record(record: &Record, config: &AnalysisConfig) -> DerivedRecord {
    let pace = record
        .duration_min
        .zip(record.distance_km)
        .and_then(|(duration, distance)| safe_div(duration, distance));
    let cadence = record
        .steps
        .zip(record.duration_min)
        .and_then(|(steps, duration)| safe_div(steps as f64, duration));
    let bmi = record
        .weight_kg
        .zip(record.height_cm)
        .and_then(|(weight, height_cm)| {
            let height_m = height_cm / 100.0;
            safe_div(weight, height_m * height_m)
        });
    let age_bracket = AgeBracket::from_age_with_edges(record.age, &config.age_bin_edges)
        .unwrap_or(AgeBracket::Over65);

    DerivedRecord {
        pace_min_per_km: pace,
        cadence_steps_per_min: cadence,
        bmi,
        is_runner: record.activity.as_deref().is_some_and(is_runner_label),
        is_smoker: record.smoking_level.as_deref().is_some_and(is_smoker_label),
        is_practitioner: is_practitioner(record, config),
        age_bracket,
        record: record.clone(),
    }
}

/// Derive features for a whole collection, in parallel.
pub fn derive_all(records: &[Record], config: &AnalysisConfig) -> Vec<DerivedRecord> {
    let derived: Vec<DerivedRecord> = records
        .par_iter()
        .map(|r| derive_record(r, config))
        .collect();
    debug!(
        total = derived.len(),
        runners = derived.iter().filter(|r| r.is_runner).count(),
        smokers = derived.iter().filter(|r| r.is_smoker).count(),
        practitioners = derived.iter().filter(|r| r.is_practitioner).count(),
        "derived features"
    );
    derived
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;
    use fitlife_core::models::DataSource;

    fn base_record() -> Record {
        Record {
            id: "r1".to_owned(),
            timestamp: Utc::now(),
            age: 30,
            gender: None,
            height_cm: Some(170.0),
            weight_kg: Some(70.0),
            bpm: Some(120.0),
            calories_kcal: Some(350.0),
            steps: Some(1800),
            duration_min: Some(30.0),
            distance_km: Some(5.0),
            activity: Some("Running".to_owned()),
            smoking_level: Some("Non-Smoker".to_owned()),
            health_condition: None,
            source: DataSource::Public,
        }
    }

    #[test]
    fn pace_and_cadence_are_guarded_divisions() {
        let cfg = AnalysisConfig::default();
        let derived = derive_record(&base_record(), &cfg);
        assert!((derived.pace_min_per_km.unwrap() - 6.0).abs() < 1e-9);
        assert!((derived.cadence_steps_per_min.unwrap() - 60.0).abs() < 1e-9);

        let mut zero_distance = base_record();
        zero_distance.distance_km = Some(0.0);
        let derived = derive_record(&zero_distance, &cfg);
        assert!(derived.pace_min_per_km.is_none(), "zero distance => undefined pace");

        let mut zero_duration = base_record();
        zero_duration.duration_min = Some(0.0);
        let derived = derive_record(&zero_duration, &cfg);
        assert!(derived.cadence_steps_per_min.is_none());
        // Pace guards on distance only: zero minutes over 5 km is a
        // defined (if implausible) pace of zero.
        assert_eq!(derived.pace_min_per_km, Some(0.0));
    }

    #[test]
    fn bmi_matches_reference_value() {
        let cfg = AnalysisConfig::default();
        let derived = derive_record(&base_record(), &cfg);
        // 70 kg at 1.70 m => 24.22
        assert!((derived.bmi.unwrap() - 24.22).abs() < 0.01);
    }

    #[test]
    fn runner_label_matches_bilingual_variants() {
        assert!(is_runner_label("Running"));
        assert!(is_runner_label("light jogging"));
        assert!(is_runner_label("Corrida matinal"));
        assert!(!is_runner_label("Walking"));
    }

    #[test]
    fn smoker_label_excludes_non_and_ex_smokers() {
        assert!(is_smoker_label("Fumante Leve"));
        assert!(is_smoker_label("Heavy Smoker"));
        assert!(!is_smoker_label("Não Fumante"));
        assert!(!is_smoker_label("Ex-fumante"));
        assert!(!is_smoker_label("Non-Smoker"));
        assert!(!is_smoker_label("Ex-Smoker"));
    }

    #[test]
    fn practitioner_is_monotone_or() {
        let cfg = AnalysisConfig::default();
        let mut record = base_record();
        record.activity = Some("Chess".to_owned());
        record.steps = Some(10);
        record.duration_min = Some(5.0);
        assert!(!derive_record(&record, &cfg).is_practitioner);

        // Each condition alone suffices.
        let mut by_activity = record.clone();
        by_activity.activity = Some("Swimming".to_owned());
        assert!(derive_record(&by_activity, &cfg).is_practitioner);

        let mut by_steps = record.clone();
        by_steps.steps = Some(1000);
        assert!(derive_record(&by_steps, &cfg).is_practitioner);

        let mut by_duration = record;
        by_duration.duration_min = Some(20.0);
        assert!(derive_record(&by_duration, &cfg).is_practitioner);
    }

    #[test]
    fn derivation_is_deterministic() {
        let cfg = AnalysisConfig::default();
        let record = base_record();
        assert_eq!(derive_record(&record, &cfg), derive_record(&record, &cfg));
    }
}
