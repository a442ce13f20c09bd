// ABOUTME: Core types and constants for the FitLife Insights pipeline
// ABOUTME: Foundation crate with records, summaries, analysis config, and error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

#![deny(unsafe_code)]

//! # FitLife Core
//!
//! Foundation crate providing shared types for the FitLife Insights
//! statistics pipeline. This crate is designed to change infrequently,
//! enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ConfigError`
//! - **constants**: Physiological ranges and validation limits
//! - **config**: Immutable analysis configuration passed into every analysis call
//! - **models**: Core data models (`Record`, `DerivedRecord`, `GroupSummary`, `TestResult`)

/// Unified error handling for the pipeline
pub mod errors;

/// Physiological ranges and validation limits
pub mod constants;

/// Immutable analysis configuration (bin edges, sport sets, significance level)
pub mod config;

/// Core data models (records, brackets, summaries, test results, filters)
pub mod models;

pub use config::{AnalysisConfig, PractitionerRules};
pub use errors::{AppError, AppResult, ConfigError};
pub use models::{
    AgeBracket, DataSource, DerivedRecord, FilterSelection, GroupSummary, Metric, Record,
    SmokerFilter, TestOutcome, TestResult,
};
