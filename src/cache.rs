// ABOUTME: Memoized analysis results keyed by filter selection
// ABOUTME: Recomputation happens only for unseen filter keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Analysis result cache.
//!
//! Interactive consumers re-request the same filtered views repeatedly;
//! the suite for a given [`FilterSelection`] is deterministic over a
//! fixed dataset, so results are memoized per filter key.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use fitlife_core::models::{DerivedRecord, FilterSelection};
use fitlife_core::AnalysisConfig;
use fitlife_intelligence::{run_all_analyses, AnalysisSuite};

use crate::errors::AppResult;

/// Concurrent cache of analysis suites keyed by filter selection
pub struct AnalysisCache {
    config: AnalysisConfig,
    entries: DashMap<FilterSelection, Arc<AnalysisSuite>>,
}

impl AnalysisCache {
    /// Create a cache for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation.
    pub fn new(config: AnalysisConfig) -> AppResult<Self> {
        config.validate().map_err(fitlife_core::AppError::from)?;
        Ok(Self {
            config,
            entries: DashMap::new(),
        })
    }

    /// Return the suite for the filter, computing it on first request.
    ///
    /// # Errors
    ///
    /// Returns an error when the analysis itself fails.
    pub fn get_or_compute(
        &self,
        filter: &FilterSelection,
        records: &[DerivedRecord],
    ) -> AppResult<Arc<AnalysisSuite>> {
        if let Some(hit) = self.entries.get(filter) {
            debug!("analysis cache hit");
            return Ok(Arc::clone(&hit));
        }

        let subset = filter.apply(records);
        let suite = Arc::new(run_all_analyses(&subset, &self.config)?);
        self.entries.insert(filter.clone(), Arc::clone(&suite));
        debug!(n_records = subset.len(), "analysis cache fill");
        Ok(suite)
    }

    /// Number of cached filter keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached suite (e.g. after the dataset changes)
    pub fn clear(&self) {
        self.entries.clear();
    }
}
