// ABOUTME: Reporting layer turning comparator outputs into tables and chart-ready data
// ABOUTME: Chart rendering and table display are external; this produces their inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Tabular summaries and chart-ready data.

use std::fmt;

use serde::{Deserialize, Serialize};

use fitlife_core::models::{GroupSummary, TestOutcome, TestResult};

use crate::comparator::{AgeBracketRow, PracticeByAgeAnalysis};
use crate::stats::EcdfPoint;

/// Empirical cumulative distribution for one group, ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcdfSeries {
    /// Group label
    pub group: String,
    /// Distribution points in ascending value order
    pub points: Vec<EcdfPoint>,
}

/// A rendered summary table: headers plus string rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Table title
    pub title: String,
    /// Column names
    pub headers: Vec<String>,
    /// Row values, one string per column
    pub rows: Vec<Vec<String>>,
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |v| format!("{v:.2}"))
}

impl SummaryTable {
    /// Build a table from (group, metric) summaries
    pub fn from_group_summaries(title: &str, summaries: &[GroupSummary]) -> Self {
        let headers = ["metric", "group", "n", "mean", "median", "std", "min", "max"]
            .iter()
            .map(|h| (*h).to_owned())
            .collect();
        let rows = summaries
            .iter()
            .map(|s| {
                vec![
                    s.metric.clone(),
                    s.group.clone(),
                    s.n.to_string(),
                    fmt_opt(s.mean),
                    fmt_opt(s.median),
                    fmt_opt(s.std_dev),
                    fmt_opt(s.min),
                    fmt_opt(s.max),
                ]
            })
            .collect();
        Self {
            title: title.to_owned(),
            headers,
            rows,
        }
    }

    /// Build the practice-rate table for analysis 3
    pub fn from_practice_rows(title: &str, analysis: &PracticeByAgeAnalysis) -> Self {
        let headers = [
            "age_bracket",
            "n_total",
            "n_practitioners",
            "practice_rate_pct",
            "mean_duration_min",
            "mean_distance_km",
            "mean_calories_kcal",
            "mean_bpm",
        ]
        .iter()
        .map(|h| (*h).to_owned())
        .collect();
        let rows = analysis.rows.iter().map(practice_row).collect();
        Self {
            title: title.to_owned(),
            headers,
            rows,
        }
    }

    /// Build a table listing every test result of an analysis
    pub fn from_test_results(title: &str, tests: &[TestResult]) -> Self {
        let headers = ["test", "metric", "statistic", "p_value", "alpha", "verdict"]
            .iter()
            .map(|h| (*h).to_owned())
            .collect();
        let rows = tests
            .iter()
            .map(|t| match &t.outcome {
                TestOutcome::Completed {
                    statistic,
                    p_value,
                    significant,
                    ..
                } => vec![
                    t.test.clone(),
                    t.metric.clone(),
                    format!("{statistic:.4}"),
                    format!("{p_value:.4}"),
                    format!("{:.2}", t.alpha),
                    if *significant {
                        "significant".to_owned()
                    } else {
                        "not significant".to_owned()
                    },
                ],
                TestOutcome::InsufficientSample { group, n } => vec![
                    t.test.clone(),
                    t.metric.clone(),
                    "-".to_owned(),
                    "-".to_owned(),
                    format!("{:.2}", t.alpha),
                    format!("insufficient sample ({group}: n={n})"),
                ],
            })
            .collect();
        Self {
            title: title.to_owned(),
            headers,
            rows,
        }
    }

    /// Serialize the table as CSV (header row first)
    pub fn to_csv_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.headers.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }
}

fn practice_row(row: &AgeBracketRow) -> Vec<String> {
    vec![
        row.bracket.label().to_owned(),
        row.n_total.to_string(),
        row.n_practitioners.to_string(),
        format!("{:.1}", row.practice_rate_pct),
        fmt_opt(row.mean_duration_min),
        fmt_opt(row.mean_distance_km),
        fmt_opt(row.mean_calories_kcal),
        fmt_opt(row.mean_bpm),
    ]
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }
        writeln!(f, "{}", self.title)?;
        for (i, h) in self.headers.iter().enumerate() {
            write!(f, "{h:<width$}  ", width = widths[i])?;
        }
        writeln!(f)?;
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                write!(f, "{cell:<width$}  ", width = widths[i])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rendering_includes_headers_and_rows() {
        let table = SummaryTable::from_test_results(
            "tests",
            &[TestResult::completed(
                "mann-whitney-u",
                "bpm",
                0.05,
                21.0,
                0.0226,
                None,
            )],
        );
        let csv = table.to_csv_string();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("test,metric,statistic,p_value,alpha,verdict")
        );
        assert!(csv.contains("significant"));
    }

    #[test]
    fn insufficient_sample_is_reported_not_suppressed() {
        let table = SummaryTable::from_test_results(
            "tests",
            &[TestResult::insufficient(
                "mann-whitney-u",
                "pace_min_per_km",
                0.05,
                "smoker",
                1,
            )],
        );
        assert!(table.to_csv_string().contains("insufficient sample (smoker: n=1)"));
    }
}
