// ABOUTME: Error taxonomy for the pipeline crate built on thiserror
// ABOUTME: Wraps IO, parsing, and core errors behind one AppError with automatic From conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Pipeline error types.

use thiserror::Error;

/// Result alias used throughout the pipeline crate
pub type AppResult<T> = Result<T, AppError>;

/// All errors the pipeline can surface
#[derive(Debug, Error)]
pub enum AppError {
    /// File could not be opened, read, or written
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input or serialization failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset could not be ingested
    #[error("ingest error: {0}")]
    Ingest(String),

    /// Model training or evaluation failed
    #[error("modeling error: {0}")]
    Modeling(String),

    /// Error bubbled up from the core or intelligence layers
    #[error(transparent)]
    Core(#[from] fitlife_core::AppError),
}

impl AppError {
    /// Create an ingest error from any displayable message
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest(msg.into())
    }

    /// Create a modeling error from any displayable message
    pub fn modeling(msg: impl Into<String>) -> Self {
        Self::Modeling(msg.into())
    }
}
