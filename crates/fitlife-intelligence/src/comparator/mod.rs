// ABOUTME: Generic group-comparison routine shared by the four fixed analyses
// ABOUTME: Partition, aggregate per metric, test; insufficient samples flagged explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! The comparator engine.
//!
//! All four analyses share one shape: partition the records with a
//! predicate, aggregate each metric per group, and run a hypothesis test
//! per metric. [`compare_two_groups`] implements that shape once; the
//! analyses in [`analyses`] parameterize it with their grouping predicate,
//! metric list, and test selector.

mod analyses;

use serde::{Deserialize, Serialize};

use fitlife_core::models::{DerivedRecord, GroupSummary, Metric, TestResult};
use fitlife_core::AnalysisConfig;

use crate::stats::{self, mann_whitney_u, StatError};

pub use analyses::{
    bpm_practitioners_vs_nonpractitioners, practice_by_age_bracket, run_all_analyses,
    runners_vs_nonrunners, smokers_vs_nonsmokers, AgeBracketRow, AnalysisSuite,
    BpmPractitionerAnalysis, BracketComparison, PracticeByAgeAnalysis, RunnerAnalysis,
    SmokerAnalysis,
};

/// Name under which the rank-based two-sample test is reported
pub const MANN_WHITNEY: &str = "mann-whitney-u";

/// Summaries and tests for one two-group comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    /// Label of the first group
    pub group_a: String,
    /// Label of the second group
    pub group_b: String,
    /// One summary per (group, metric) pair, groups interleaved per metric
    pub summaries: Vec<GroupSummary>,
    /// One test result per metric
    pub tests: Vec<TestResult>,
}

/// Split a record collection by a predicate.
///
/// The partition is complete and disjoint: every record lands in exactly
/// one of the two groups.
pub fn partition<'a, F>(
    records: &'a [DerivedRecord],
    predicate: F,
) -> (Vec<&'a DerivedRecord>, Vec<&'a DerivedRecord>)
where
    F: Fn(&DerivedRecord) -> bool,
{
    records.iter().partition(|r| predicate(r))
}

/// Map a test error onto the explicit insufficient-sample result state.
fn insufficient_result(
    test: &str,
    metric: Metric,
    alpha: f64,
    label_a: &str,
    label_b: &str,
    n_a: usize,
    n_b: usize,
) -> TestResult {
    let (group, n) = if n_a <= n_b {
        (label_a, n_a)
    } else {
        (label_b, n_b)
    };
    TestResult::insufficient(test, metric.name(), alpha, group, n)
}

/// Compare two groups over a metric list with the rank-based test.
///
/// For every metric: records with an undefined value are excluded from that
/// metric only. Groups smaller than two defined observations yield an
/// insufficient-sample result instead of a p-value.
pub fn compare_two_groups(
    label_a: &str,
    label_b: &str,
    group_a: &[&DerivedRecord],
    group_b: &[&DerivedRecord],
    metrics: &[Metric],
    config: &AnalysisConfig,
) -> GroupComparison {
    let alpha = config.significance_level;
    let mut summaries = Vec::with_capacity(metrics.len() * 2);
    let mut tests = Vec::with_capacity(metrics.len());

    for &metric in metrics {
        let values_a = stats::collect_metric(group_a, metric);
        let values_b = stats::collect_metric(group_b, metric);
        summaries.push(stats::summarize_group(label_a, metric, &values_a));
        summaries.push(stats::summarize_group(label_b, metric, &values_b));

        let test = match mann_whitney_u(&values_a, &values_b) {
            Ok(t) => TestResult::completed(
                MANN_WHITNEY,
                metric.name(),
                alpha,
                t.statistic,
                t.p_value,
                None,
            ),
            Err(StatError::InsufficientSample { .. } | StatError::DegenerateTable) => {
                insufficient_result(
                    MANN_WHITNEY,
                    metric,
                    alpha,
                    label_a,
                    label_b,
                    values_a.len(),
                    values_b.len(),
                )
            }
        };
        tests.push(test);
    }

    GroupComparison {
        group_a: label_a.to_owned(),
        group_b: label_b.to_owned(),
        summaries,
        tests,
    }
}
