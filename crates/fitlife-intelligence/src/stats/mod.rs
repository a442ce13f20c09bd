// ABOUTME: Descriptive statistics over metric samples with undefined values skipped
// ABOUTME: Hosts the hypothesis tests and the special functions backing their p-values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Descriptive statistics and hypothesis tests.

use fitlife_core::models::{DerivedRecord, GroupSummary, Metric};
use serde::{Deserialize, Serialize};

pub mod hypothesis;
mod special;

pub use hypothesis::{
    chi_square_independence, cohens_d, ks_two_sample, mann_whitney_u, students_t, StatError,
    TestStatistic,
};

/// Descriptive statistics over a non-empty sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptives {
    /// Sample size
    pub n: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub median: f64,
    /// Sample standard deviation (n-1 denominator); `None` for n < 2
    pub std_dev: Option<f64>,
    /// Smallest observation
    pub min: f64,
    /// Largest observation
    pub max: f64,
}

/// Compute descriptive statistics; `None` for an empty sample.
pub fn describe(values: &[f64]) -> Option<Descriptives> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = (n >= 2).then(|| {
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    });
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        f64::midpoint(sorted[n / 2 - 1], sorted[n / 2])
    };
    Some(Descriptives {
        n,
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
    })
}

/// Extract the defined values of one metric from a record collection.
///
/// Records with an undefined metric are excluded here but remain available
/// for every other metric.
pub fn collect_metric(records: &[&DerivedRecord], metric: Metric) -> Vec<f64> {
    records.iter().filter_map(|r| metric.value(r)).collect()
}

/// Build a [`GroupSummary`] for one group and metric.
pub fn summarize_group(group: &str, metric: Metric, values: &[f64]) -> GroupSummary {
    describe(values).map_or_else(
        || GroupSummary {
            group: group.to_owned(),
            metric: metric.name().to_owned(),
            n: 0,
            mean: None,
            median: None,
            std_dev: None,
            min: None,
            max: None,
        },
        |d| GroupSummary {
            group: group.to_owned(),
            metric: metric.name().to_owned(),
            n: d.n,
            mean: Some(d.mean),
            median: Some(d.median),
            std_dev: d.std_dev,
            min: Some(d.min),
            max: Some(d.max),
        },
    )
}

/// One point of an empirical cumulative distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcdfPoint {
    /// Observation value
    pub value: f64,
    /// Fraction of the sample at or below `value`
    pub fraction: f64,
}

/// Empirical cumulative distribution of a sample, one point per distinct value.
pub fn ecdf(values: &[f64]) -> Vec<EcdfPoint> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    let mut points: Vec<EcdfPoint> = Vec::new();
    for (i, v) in sorted.iter().enumerate() {
        let fraction = (i + 1) as f64 / n;
        match points.last_mut() {
            Some(last) if (last.value - *v).abs() < f64::EPSILON => last.fraction = fraction,
            _ => points.push(EcdfPoint {
                value: *v,
                fraction,
            }),
        }
    }
    points
}
