// ABOUTME: The four fixed analyses: smokers, runners, practice by age, practitioner bpm
// ABOUTME: Each is a stateless pure transform of (records, config) into summaries and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use serde::{Deserialize, Serialize};
use tracing::debug;

use fitlife_core::models::{AgeBracket, DerivedRecord, Metric, TestResult};
use fitlife_core::{AnalysisConfig, AppResult};

use super::{compare_two_groups, partition, GroupComparison};
use crate::report::EcdfSeries;
use crate::stats::{self, chi_square_independence, cohens_d, ks_two_sample, students_t, StatError};

const CHI_SQUARE: &str = "chi-square";
const KOLMOGOROV_SMIRNOV: &str = "kolmogorov-smirnov";
const STUDENTS_T: &str = "students-t";

/// Analysis 1: smokers vs non-smokers over sport activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmokerAnalysis {
    /// Number of records left after restricting to sport activities
    pub n_sport_records: usize,
    /// Pace, bpm, and calories compared with the rank-based test
    pub comparison: GroupComparison,
}

/// Analysis 1: restrict to sport activities, group by `is_smoker`, compare
/// pace, heart rate, and calories with the rank-based two-sample test.
pub fn smokers_vs_nonsmokers(
    records: &[DerivedRecord],
    config: &AnalysisConfig,
) -> SmokerAnalysis {
    let sport: Vec<DerivedRecord> = records
        .iter()
        .filter(|r| {
            r.record
                .activity
                .as_deref()
                .is_some_and(|a| config.is_sport_activity(a))
        })
        .cloned()
        .collect();
    let (smokers, non_smokers) = partition(&sport, |r| r.is_smoker);
    debug!(
        sport = sport.len(),
        smokers = smokers.len(),
        "analysis 1: smokers vs non-smokers"
    );
    SmokerAnalysis {
        n_sport_records: sport.len(),
        comparison: compare_two_groups(
            "smoker",
            "non-smoker",
            &smokers,
            &non_smokers,
            &[Metric::Pace, Metric::Bpm, Metric::Calories],
            config,
        ),
    }
}

/// Analysis 2: runners vs non-runners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerAnalysis {
    /// Pace, bpm, distance, duration, and calories compared per group
    pub comparison: GroupComparison,
    /// Empirical cumulative distribution of pace, one series per group
    pub pace_ecdf: Vec<EcdfSeries>,
    /// Distribution-shape test on pace between the two groups
    pub pace_ks: TestResult,
}

/// Analysis 2: group by `is_runner`, compare pace/bpm/distance/duration/
/// calories with the rank-based test, and emit the pace ECDF per group for
/// visualization plus a Kolmogorov-Smirnov test on the pace distributions.
pub fn runners_vs_nonrunners(
    records: &[DerivedRecord],
    config: &AnalysisConfig,
) -> RunnerAnalysis {
    let (runners, non_runners) = partition(records, |r| r.is_runner);
    debug!(
        runners = runners.len(),
        non_runners = non_runners.len(),
        "analysis 2: runners vs non-runners"
    );
    let comparison = compare_two_groups(
        "runner",
        "non-runner",
        &runners,
        &non_runners,
        &[
            Metric::Pace,
            Metric::Bpm,
            Metric::Distance,
            Metric::Duration,
            Metric::Calories,
        ],
        config,
    );

    let pace_runners = stats::collect_metric(&runners, Metric::Pace);
    let pace_non_runners = stats::collect_metric(&non_runners, Metric::Pace);
    let pace_ecdf = vec![
        EcdfSeries {
            group: "runner".to_owned(),
            points: stats::ecdf(&pace_runners),
        },
        EcdfSeries {
            group: "non-runner".to_owned(),
            points: stats::ecdf(&pace_non_runners),
        },
    ];
    let alpha = config.significance_level;
    let pace_ks = match ks_two_sample(&pace_runners, &pace_non_runners) {
        Ok(t) => TestResult::completed(
            KOLMOGOROV_SMIRNOV,
            Metric::Pace.name(),
            alpha,
            t.statistic,
            t.p_value,
            None,
        ),
        Err(_) => {
            let (group, n) = if pace_runners.len() <= pace_non_runners.len() {
                ("runner", pace_runners.len())
            } else {
                ("non-runner", pace_non_runners.len())
            };
            TestResult::insufficient(KOLMOGOROV_SMIRNOV, Metric::Pace.name(), alpha, group, n)
        }
    };

    RunnerAnalysis {
        comparison,
        pace_ecdf,
        pace_ks,
    }
}

/// One row of the practice-by-age table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBracketRow {
    /// Age bracket the row describes
    pub bracket: AgeBracket,
    /// Total records in the bracket
    pub n_total: usize,
    /// Records flagged as practitioners
    pub n_practitioners: usize,
    /// Practitioner rate as a percentage of the bracket
    pub practice_rate_pct: f64,
    /// Mean session duration in minutes, when any value is defined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_duration_min: Option<f64>,
    /// Mean distance in kilometers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_distance_km: Option<f64>,
    /// Mean calories burned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_calories_kcal: Option<f64>,
    /// Mean heart rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_bpm: Option<f64>,
}

/// Analysis 3: practice rate by age bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeByAgeAnalysis {
    /// One row per age bracket, ascending; empty brackets keep zero counts
    pub rows: Vec<AgeBracketRow>,
    /// Independence of practice status from age bracket
    pub chi_square: TestResult,
}

fn mean_of(records: &[&DerivedRecord], metric: Metric) -> Option<f64> {
    let values = stats::collect_metric(records, metric);
    stats::describe(&values).map(|d| d.mean)
}

/// Analysis 3: per age bracket, practitioner rate and mean duration/
/// distance/calories/bpm, plus a chi-square independence test of practice
/// status against the bracket.
pub fn practice_by_age_bracket(
    records: &[DerivedRecord],
    config: &AnalysisConfig,
) -> PracticeByAgeAnalysis {
    let mut rows = Vec::with_capacity(AgeBracket::ALL.len());
    let mut table: Vec<Vec<f64>> = Vec::with_capacity(AgeBracket::ALL.len());

    for bracket in AgeBracket::ALL {
        let members: Vec<&DerivedRecord> = records
            .iter()
            .filter(|r| r.age_bracket == bracket)
            .collect();
        let n_total = members.len();
        let n_practitioners = members.iter().filter(|r| r.is_practitioner).count();
        let practice_rate_pct = if n_total == 0 {
            0.0
        } else {
            n_practitioners as f64 / n_total as f64 * 100.0
        };
        table.push(vec![
            n_practitioners as f64,
            (n_total - n_practitioners) as f64,
        ]);
        rows.push(AgeBracketRow {
            bracket,
            n_total,
            n_practitioners,
            practice_rate_pct,
            mean_duration_min: mean_of(&members, Metric::Duration),
            mean_distance_km: mean_of(&members, Metric::Distance),
            mean_calories_kcal: mean_of(&members, Metric::Calories),
            mean_bpm: mean_of(&members, Metric::Bpm),
        });
    }
    debug!(brackets = rows.len(), "analysis 3: practice by age bracket");

    let alpha = config.significance_level;
    let chi_square = match chi_square_independence(&table) {
        Ok(t) => TestResult::completed(
            CHI_SQUARE,
            "practice_rate",
            alpha,
            t.statistic,
            t.p_value,
            None,
        ),
        Err(StatError::DegenerateTable | StatError::InsufficientSample { .. }) => {
            let populated = rows.iter().filter(|r| r.n_total > 0).count();
            TestResult::insufficient(CHI_SQUARE, "practice_rate", alpha, "age brackets", populated)
        }
    };

    PracticeByAgeAnalysis { rows, chi_square }
}

/// Per-bracket slice of the practitioner heart-rate comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketComparison {
    /// Age bracket the slice covers
    pub bracket: AgeBracket,
    /// Heart-rate comparison restricted to this bracket
    pub comparison: GroupComparison,
}

/// Analysis 4: heart rate of practitioners vs non-practitioners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmPractitionerAnalysis {
    /// Global comparison over all records
    pub global: GroupComparison,
    /// Parametric companion test on the same global groups
    pub t_test: TestResult,
    /// Standardized effect size (difference of means over pooled std dev)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohens_d: Option<f64>,
    /// The same comparison stratified by age bracket (populated brackets only)
    pub by_bracket: Vec<BracketComparison>,
}

/// Analysis 4: compare heart rate between practitioners and
/// non-practitioners globally (rank-based test, Student's t, Cohen's d to
/// express practical significance) and stratified by age bracket.
pub fn bpm_practitioners_vs_nonpractitioners(
    records: &[DerivedRecord],
    config: &AnalysisConfig,
) -> BpmPractitionerAnalysis {
    let alpha = config.significance_level;
    let (practitioners, non_practitioners) = partition(records, |r| r.is_practitioner);
    debug!(
        practitioners = practitioners.len(),
        non_practitioners = non_practitioners.len(),
        "analysis 4: practitioner heart rate"
    );

    let bpm_p = stats::collect_metric(&practitioners, Metric::Bpm);
    let bpm_n = stats::collect_metric(&non_practitioners, Metric::Bpm);
    let effect = cohens_d(&bpm_p, &bpm_n);

    let mut global = compare_two_groups(
        "practitioner",
        "non-practitioner",
        &practitioners,
        &non_practitioners,
        &[Metric::Bpm],
        config,
    );
    // Attach the effect size to the completed rank test.
    if let Some(test) = global.tests.first_mut() {
        if let fitlife_core::models::TestOutcome::Completed { effect_size, .. } = &mut test.outcome
        {
            *effect_size = effect;
        }
    }

    let t_test = match students_t(&bpm_p, &bpm_n) {
        Ok(t) => TestResult::completed(
            STUDENTS_T,
            Metric::Bpm.name(),
            alpha,
            t.statistic,
            t.p_value,
            effect,
        ),
        Err(_) => {
            let (group, n) = if bpm_p.len() <= bpm_n.len() {
                ("practitioner", bpm_p.len())
            } else {
                ("non-practitioner", bpm_n.len())
            };
            TestResult::insufficient(STUDENTS_T, Metric::Bpm.name(), alpha, group, n)
        }
    };

    let by_bracket = AgeBracket::ALL
        .iter()
        .filter_map(|&bracket| {
            let members: Vec<DerivedRecord> = records
                .iter()
                .filter(|r| r.age_bracket == bracket)
                .cloned()
                .collect();
            if members.is_empty() {
                return None;
            }
            let (p, n) = partition(&members, |r| r.is_practitioner);
            Some(BracketComparison {
                bracket,
                comparison: compare_two_groups(
                    "practitioner",
                    "non-practitioner",
                    &p,
                    &n,
                    &[Metric::Bpm],
                    config,
                ),
            })
        })
        .collect();

    BpmPractitionerAnalysis {
        global,
        t_test,
        cohens_d: effect,
        by_bracket,
    }
}

/// Output of one full batch run: all four analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuite {
    /// Records the suite was computed over
    pub n_records: usize,
    /// Analysis 1
    pub smokers: SmokerAnalysis,
    /// Analysis 2
    pub runners: RunnerAnalysis,
    /// Analysis 3
    pub practice_by_age: PracticeByAgeAnalysis,
    /// Analysis 4
    pub bpm_practitioners: BpmPractitionerAnalysis,
}

/// Run all four analyses over a record collection.
///
/// Validates the configuration up front; everything after that is
/// infallible by construction.
pub fn run_all_analyses(
    records: &[DerivedRecord],
    config: &AnalysisConfig,
) -> AppResult<AnalysisSuite> {
    config.validate()?;
    Ok(AnalysisSuite {
        n_records: records.len(),
        smokers: smokers_vs_nonsmokers(records, config),
        runners: runners_vs_nonrunners(records, config),
        practice_by_age: practice_by_age_bracket(records, config),
        bpm_practitioners: bpm_practitioners_vs_nonpractitioners(records, config),
    })
}
