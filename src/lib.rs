// ABOUTME: FitLife Insights pipeline crate: ingestion, validation, caching, modeling, CLI
// ABOUTME: Wires the core models and the intelligence engine into a batch pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

#![deny(unsafe_code)]

//! # FitLife Insights
//!
//! Descriptive-statistics pipeline for fitness and wearable datasets:
//! load, validate, derive features, run the four fixed comparisons, and
//! emit summary tables. The statistical core lives in
//! [`fitlife_intelligence`]; shared models live in [`fitlife_core`].

/// Pipeline error types
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Dataset ingestion (public CSV, wearable JSON)
pub mod ingest;

/// Schema validation of ingested records
pub mod validation;

/// Memoized analysis results keyed by filter selection
pub mod cache;

/// Gradient-boosting prediction bonus
pub mod modeling;

pub use errors::{AppError, AppResult};
