// ABOUTME: Feature derivation, descriptive statistics, and the comparator engine
// ABOUTME: Pure transforms over immutable record collections; no ambient state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

#![deny(unsafe_code)]

//! # FitLife Intelligence
//!
//! Statistical core of the pipeline. Everything here is a stateless pure
//! function of `(records, config)`: the feature deriver enriches validated
//! records exactly once, and the comparator engine partitions the enriched
//! collection and computes aggregates plus hypothesis tests for the four
//! fixed analyses.
//!
//! ## Modules
//!
//! - **features**: pace, cadence, BMI, boolean flags, age bracket assignment
//! - **stats**: descriptive statistics, ECDF, and hypothesis tests
//! - **comparator**: the generic group-comparison routine and the four analyses
//! - **report**: summary tables and chart-ready series for the reporting layer

/// Feature derivation from validated records
pub mod features;

/// Descriptive statistics and hypothesis tests
pub mod stats;

/// The comparator engine and the four fixed analyses
pub mod comparator;

/// Tabular summaries and chart-ready data
pub mod report;

pub use comparator::{
    bpm_practitioners_vs_nonpractitioners, practice_by_age_bracket, run_all_analyses,
    runners_vs_nonrunners, smokers_vs_nonsmokers, AnalysisSuite, BpmPractitionerAnalysis,
    GroupComparison, PracticeByAgeAnalysis, RunnerAnalysis, SmokerAnalysis,
};
pub use features::{derive_all, derive_record};
pub use report::{EcdfSeries, SummaryTable};
