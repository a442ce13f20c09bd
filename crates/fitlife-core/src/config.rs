// ABOUTME: Analysis configuration passed explicitly into every comparator call
// ABOUTME: Holds age bin edges, sport activity sets, practitioner rules, and alpha
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Analysis configuration.
//!
//! Every analysis receives an immutable [`AnalysisConfig`] value instead of
//! reading ambient global state, which keeps the comparator engine a pure
//! function and trivially testable.

use serde::{Deserialize, Serialize};

use crate::constants::{statistics, AGE_BIN_EDGES};
use crate::errors::ConfigError;

/// Rules that classify a record as a physical-activity practitioner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PractitionerRules {
    /// Minimum step count that qualifies on its own
    pub min_steps: u64,
    /// Minimum activity duration in minutes that qualifies on its own
    pub min_duration_min: f64,
}

impl Default for PractitionerRules {
    fn default() -> Self {
        Self {
            min_steps: 1000,
            min_duration_min: 20.0,
        }
    }
}

/// Immutable configuration for the comparator engine and feature deriver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Age bracket bin edges; each bracket covers `(edge[i], edge[i+1]]`
    /// with the first bracket including age zero
    pub age_bin_edges: [u32; 8],
    /// Activity labels counted as sport practice (matched case-insensitively)
    pub sport_activities: Vec<String>,
    /// Thresholds for the practitioner classification
    pub practitioner_rules: PractitionerRules,
    /// Significance level for every hypothesis test
    pub significance_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            age_bin_edges: AGE_BIN_EDGES,
            sport_activities: [
                "Running",
                "Walking",
                "Cycling",
                "Swimming",
                "Jogging",
                "Hiking",
                "Yoga",
                "Dancing",
                "Tennis",
                "Basketball",
            ]
            .iter()
            .map(|s| (*s).to_owned())
            .collect(),
            practitioner_rules: PractitionerRules::default(),
            significance_level: statistics::SIGNIFICANCE_LEVEL,
        }
    }
}

impl AnalysisConfig {
    /// Validate the configuration, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::InvalidRange(
                "significance_level must be within (0, 1)",
            ));
        }
        if self.sport_activities.is_empty() {
            return Err(ConfigError::MissingField("sport_activities"));
        }
        if !self.age_bin_edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::InvalidBinEdges(
                "edges must be strictly increasing",
            ));
        }
        if self.age_bin_edges[0] != 0 || self.age_bin_edges[7] < 120 {
            return Err(ConfigError::InvalidBinEdges(
                "edges must cover ages 0 through 120",
            ));
        }
        if self.practitioner_rules.min_duration_min < 0.0 {
            return Err(ConfigError::InvalidRange(
                "min_duration_min must be non-negative",
            ));
        }
        Ok(())
    }

    /// True when the activity label belongs to the configured sport set
    /// (case-insensitive substring match, mirroring the label heuristics
    /// used for the runner and smoker flags)
    pub fn is_sport_activity(&self, activity: &str) -> bool {
        let lowered = activity.to_lowercase();
        self.sport_activities
            .iter()
            .any(|sport| lowered.contains(&sport.to_lowercase()))
    }
}
