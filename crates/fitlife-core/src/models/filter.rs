// ABOUTME: Filter selection applied by the interactive layer before each analysis run
// ABOUTME: Applying a filter is a pure restriction; selections are hashable cache keys
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AgeBracket, DerivedRecord};

/// Smoker-status restriction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokerFilter {
    /// Keep every record
    #[default]
    All,
    /// Keep only records flagged `is_smoker`
    SmokersOnly,
    /// Keep only records not flagged `is_smoker`
    NonSmokersOnly,
}

/// Effective filter selection from the interactive layer.
///
/// Implements `Hash`/`Eq` so the result cache can key memoized analysis
/// outputs on the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Restrict to these age brackets; `None` keeps all brackets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_brackets: Option<BTreeSet<AgeBracket>>,
    /// Smoker-status restriction
    #[serde(default)]
    pub smoker: SmokerFilter,
    /// Inclusive start of the date range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the date range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl FilterSelection {
    /// True when the record passes every active restriction
    pub fn matches(&self, r: &DerivedRecord) -> bool {
        if let Some(brackets) = &self.age_brackets {
            if !brackets.contains(&r.age_bracket) {
                return false;
            }
        }
        match self.smoker {
            SmokerFilter::All => {}
            SmokerFilter::SmokersOnly if !r.is_smoker => return false,
            SmokerFilter::NonSmokersOnly if r.is_smoker => return false,
            _ => {}
        }
        let date = r.timestamp().date_naive();
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }

    /// Pure restriction of the input collection
    pub fn apply(&self, records: &[DerivedRecord]) -> Vec<DerivedRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// True when no restriction is active
    pub fn is_empty(&self) -> bool {
        self.age_brackets.is_none()
            && self.smoker == SmokerFilter::All
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}
