// ABOUTME: Physiological ranges and validation limits for record validation
// ABOUTME: Single source of truth for the bounds enforced by the schema validator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Physiological constants used by validation and configuration defaults.

/// Heart rate bounds in beats per minute
pub mod heart_rate {
    /// Minimum plausible resting heart rate
    pub const MIN_BPM: f64 = 30.0;
    /// Maximum plausible heart rate during exertion
    pub const MAX_BPM: f64 = 220.0;
}

/// Age bounds in years
pub mod age {
    /// Minimum age accepted by the schema validator
    pub const MIN_YEARS: u32 = 5;
    /// Maximum age accepted by the schema validator
    pub const MAX_YEARS: u32 = 120;
}

/// Height bounds in centimeters
pub mod height {
    /// Minimum plausible adult or child height
    pub const MIN_CM: f64 = 120.0;
    /// Maximum plausible height
    pub const MAX_CM: f64 = 230.0;
    /// Heights below this value were recorded in meters and need conversion
    pub const METERS_THRESHOLD: f64 = 10.0;
}

/// Weight bounds in kilograms
pub mod weight {
    /// Minimum plausible weight
    pub const MIN_KG: f64 = 30.0;
    /// Maximum plausible weight
    pub const MAX_KG: f64 = 250.0;
}

/// Statistical defaults shared by every analysis
pub mod statistics {
    /// Fixed significance level for all hypothesis tests
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
    /// Smallest group size that yields a meaningful test statistic
    pub const MIN_GROUP_SIZE: usize = 2;
}

/// Fixed age bracket bin edges (upper edge inclusive, last bracket open-ended)
pub const AGE_BIN_EDGES: [u32; 8] = [0, 17, 24, 34, 44, 54, 64, 120];
