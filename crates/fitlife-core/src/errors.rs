// ABOUTME: Error types shared across the FitLife Insights workspace
// ABOUTME: Defines AppError, the AppResult alias, and configuration validation errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Unified error handling for the pipeline.
//!
//! Expected data conditions (empty groups, undefined metrics) are never
//! errors; they are encoded as explicit result states on the model types.
//! Only programmer errors and I/O boundary failures surface here.

use thiserror::Error;

/// Result alias used throughout the workspace
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid analysis configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caller passed structurally invalid input (programmer error)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Convenience constructor for invalid-input errors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., alpha not within (0, 1))
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),

    /// Required configuration field is missing or empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Age bin edges are not strictly increasing or do not cover the valid ages
    #[error("invalid age bin edges: {0}")]
    InvalidBinEdges(&'static str),
}
