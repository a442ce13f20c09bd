// ABOUTME: Core data models for the FitLife Insights pipeline
// ABOUTME: Records, age brackets, group summaries, test results, and filter selections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Core data models.
//!
//! The lifecycle is strictly one-directional: raw [`Record`]s come from the
//! ingestion layer, are enriched exactly once into [`DerivedRecord`]s, and
//! are then consumed read-only by the comparator engine. Summaries and test
//! results are transient and recomputed on each filter change.

mod bracket;
mod filter;
mod metric;
mod record;
mod summary;

pub use bracket::AgeBracket;
pub use filter::{FilterSelection, SmokerFilter};
pub use metric::Metric;
pub use record::{DataSource, DerivedRecord, Record};
pub use summary::{GroupSummary, TestOutcome, TestResult};
