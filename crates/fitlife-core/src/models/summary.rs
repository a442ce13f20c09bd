// ABOUTME: Aggregate outputs of the comparator engine: group summaries and test results
// ABOUTME: Insufficient samples are an explicit result state, never a spurious p-value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use serde::{Deserialize, Serialize};

/// Per-group aggregate for one named metric.
///
/// A group with no defined observations for the metric keeps `n = 0` and
/// `None` statistics rather than propagating NaN into downstream tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group label (e.g. "smoker", "non-smoker", "18-24")
    pub group: String,
    /// Metric column name
    pub metric: String,
    /// Number of observations with a defined metric value
    pub n: usize,
    /// Arithmetic mean
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    /// Median
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    /// Sample standard deviation (n-1 denominator)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    /// Smallest observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Outcome of one hypothesis test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// The test ran; p >= alpha is reported as not significant, never suppressed
    Completed {
        /// Test statistic (U, chi-square, D, or t depending on the test)
        statistic: f64,
        /// Two-sided p-value
        p_value: f64,
        /// True iff `p_value < alpha`
        significant: bool,
        /// Standardized effect size (Cohen's d) where applicable
        #[serde(skip_serializing_if = "Option::is_none")]
        effect_size: Option<f64>,
    },
    /// A group had fewer than two observations; no statistic is computed
    InsufficientSample {
        /// Label of the undersized group
        group: String,
        /// Observation count that fell short
        n: usize,
    },
}

/// Result of one hypothesis test over one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name (e.g. "mann-whitney-u", "chi-square")
    pub test: String,
    /// Metric the test was run on
    pub metric: String,
    /// Significance threshold the p-value was compared against
    pub alpha: f64,
    /// What happened
    pub outcome: TestOutcome,
}

impl TestResult {
    /// Build a completed result, deriving the significance flag from alpha
    pub fn completed(
        test: impl Into<String>,
        metric: impl Into<String>,
        alpha: f64,
        statistic: f64,
        p_value: f64,
        effect_size: Option<f64>,
    ) -> Self {
        Self {
            test: test.into(),
            metric: metric.into(),
            alpha,
            outcome: TestOutcome::Completed {
                statistic,
                p_value,
                significant: p_value < alpha,
                effect_size,
            },
        }
    }

    /// Build an insufficient-sample result for the named group
    pub fn insufficient(
        test: impl Into<String>,
        metric: impl Into<String>,
        alpha: f64,
        group: impl Into<String>,
        n: usize,
    ) -> Self {
        Self {
            test: test.into(),
            metric: metric.into(),
            alpha,
            outcome: TestOutcome::InsufficientSample {
                group: group.into(),
                n,
            },
        }
    }

    /// True iff the test completed and crossed the significance threshold
    pub const fn is_significant(&self) -> bool {
        matches!(
            self.outcome,
            TestOutcome::Completed {
                significant: true,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_flag_follows_alpha() {
        let sig = TestResult::completed("mann-whitney-u", "bpm", 0.05, 21.0, 0.02, None);
        assert!(sig.is_significant());

        let ns = TestResult::completed("mann-whitney-u", "bpm", 0.05, 11.0, 0.72, None);
        assert!(!ns.is_significant());
    }

    #[test]
    fn insufficient_sample_is_never_significant() {
        let r = TestResult::insufficient("mann-whitney-u", "pace_min_per_km", 0.05, "smoker", 1);
        assert!(!r.is_significant());
    }
}
