// ABOUTME: Categorical age brackets over the fixed bin edges used by every analysis
// ABOUTME: Bracket assignment is total over validated ages with no gaps or overlaps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::AGE_BIN_EDGES;

/// Age bracket over the fixed edges {0,17,24,34,44,54,64,120}.
///
/// Brackets are upper-inclusive (`(17, 24]` holds ages 18 through 24),
/// except the first one, which also includes age zero. Assignment is total:
/// every validated age maps to exactly one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBracket {
    /// Ages 0 through 17
    Under18,
    /// Ages 18 through 24
    From18To24,
    /// Ages 25 through 34
    From25To34,
    /// Ages 35 through 44
    From35To44,
    /// Ages 45 through 54
    From45To54,
    /// Ages 55 through 64
    From55To64,
    /// Ages 65 through 120
    Over65,
}

impl AgeBracket {
    /// All brackets in ascending age order
    pub const ALL: [Self; 7] = [
        Self::Under18,
        Self::From18To24,
        Self::From25To34,
        Self::From35To44,
        Self::From45To54,
        Self::From55To64,
        Self::Over65,
    ];

    /// Assign a bracket using the default edges.
    ///
    /// Returns `None` only for ages beyond the last edge; the schema
    /// validator rejects those upstream.
    pub fn from_age(age: u32) -> Option<Self> {
        Self::from_age_with_edges(age, &AGE_BIN_EDGES)
    }

    /// Assign a bracket using explicit bin edges from the analysis config
    pub fn from_age_with_edges(age: u32, edges: &[u32; 8]) -> Option<Self> {
        edges[1..]
            .iter()
            .position(|upper| age <= *upper)
            .map(|idx| Self::ALL[idx])
    }

    /// Human-readable label used in summary tables and charts
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under18 => "<=17",
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::Over65 => "65+",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn assignment_is_total_over_valid_ages() {
        for age in 0..=120 {
            assert!(
                AgeBracket::from_age(age).is_some(),
                "age {age} must map to a bracket"
            );
        }
        assert!(AgeBracket::from_age(121).is_none());
    }

    #[test]
    fn brackets_partition_without_overlap() {
        // Edge ages land in exactly one bracket each.
        assert_eq!(AgeBracket::from_age(17), Some(AgeBracket::Under18));
        assert_eq!(AgeBracket::from_age(18), Some(AgeBracket::From18To24));
        assert_eq!(AgeBracket::from_age(24), Some(AgeBracket::From18To24));
        assert_eq!(AgeBracket::from_age(25), Some(AgeBracket::From25To34));
        assert_eq!(AgeBracket::from_age(64), Some(AgeBracket::From55To64));
        assert_eq!(AgeBracket::from_age(65), Some(AgeBracket::Over65));
        assert_eq!(AgeBracket::from_age(120), Some(AgeBracket::Over65));
    }

    #[test]
    fn one_age_per_bracket_yields_seven_distinct_brackets() {
        let brackets: Vec<_> = [10u32, 20, 30, 40, 50, 60, 70]
            .iter()
            .map(|age| AgeBracket::from_age(*age).unwrap())
            .collect();
        let mut unique = brackets.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 7);
        assert_eq!(unique, AgeBracket::ALL.to_vec());
    }
}
