// ABOUTME: Two-sample and contingency hypothesis tests with two-sided p-values
// ABOUTME: Mann-Whitney U, chi-square independence, KS two-sample, Student's t, Cohen's d
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Hypothesis tests.
//!
//! Each test takes samples that already had undefined metric values
//! stripped. Groups smaller than two observations are refused with
//! [`StatError::InsufficientSample`]; the comparator turns that into an
//! explicit result state instead of a spurious p-value.

use thiserror::Error;

use super::special::{beta_inc, gamma_q, normal_cdf};
use fitlife_core::constants::statistics::MIN_GROUP_SIZE;

/// Errors for statistically unanswerable inputs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatError {
    /// A group has fewer observations than the test can work with
    #[error("group has {n} observations, need at least {min}")]
    InsufficientSample {
        /// Observation count that fell short
        n: usize,
        /// Minimum required
        min: usize,
    },
    /// Contingency table is empty or degenerate (fewer than 2 rows/columns)
    #[error("degenerate contingency table")]
    DegenerateTable,
}

/// Statistic and two-sided p-value of a completed test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestStatistic {
    /// Test statistic
    pub statistic: f64,
    /// Two-sided p-value, clamped to [0, 1]
    pub p_value: f64,
}

fn check_sizes(a: &[f64], b: &[f64]) -> Result<(), StatError> {
    for n in [a.len(), b.len()] {
        if n < MIN_GROUP_SIZE {
            return Err(StatError::InsufficientSample {
                n,
                min: MIN_GROUP_SIZE,
            });
        }
    }
    Ok(())
}

/// Average ranks over the pooled sample, with tied values sharing their rank.
/// Returns (ranks aligned with the pooled order, tie correction term Σ(t³−t)).
fn average_ranks(pooled: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..pooled.len()).collect();
    order.sort_by(|&i, &j| pooled[i].total_cmp(&pooled[j]));

    let mut ranks = vec![0.0; pooled.len()];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len()
            && (pooled[order[j + 1]] - pooled[order[i]]).abs() < f64::EPSILON
        {
            j += 1;
        }
        // Ranks are 1-based; tied values share the average of their span.
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        let t = (j - i + 1) as f64;
        if t > 1.0 {
            tie_term += t * t * t - t;
        }
        i = j + 1;
    }
    (ranks, tie_term)
}

/// Two-sided Mann-Whitney U test (rank-based, robust to non-normal
/// distributions and insensitive to outliers).
///
/// Uses the normal approximation with tie correction and continuity
/// correction; the returned statistic is U of the first sample.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<TestStatistic, StatError> {
    check_sizes(a, b)?;
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let n = n1 + n2;

    let pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    let (ranks, tie_term) = average_ranks(&pooled);
    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;

    let mean_u = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        // Every pooled value is tied; the groups are indistinguishable.
        return Ok(TestStatistic {
            statistic: u1,
            p_value: 1.0,
        });
    }
    // Continuity correction shrinks |diff| toward zero, never past it.
    let diff = u1 - mean_u;
    let z = (diff.abs() - 0.5).max(0.0) / variance.sqrt();
    let p_value = (2.0 * (1.0 - normal_cdf(z))).clamp(0.0, 1.0);
    Ok(TestStatistic {
        statistic: u1,
        p_value,
    })
}

/// Chi-square test of independence over an r x c contingency table of counts.
///
/// Rows with an all-zero margin contribute nothing; a table with fewer than
/// two non-empty rows or columns is degenerate.
pub fn chi_square_independence(table: &[Vec<f64>]) -> Result<TestStatistic, StatError> {
    let rows = table.len();
    let cols = table.first().map_or(0, Vec::len);
    if rows < 2 || cols < 2 || table.iter().any(|r| r.len() != cols) {
        return Err(StatError::DegenerateTable);
    }

    let row_sums: Vec<f64> = table.iter().map(|r| r.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..cols)
        .map(|c| table.iter().map(|r| r[c]).sum())
        .collect();
    let total: f64 = row_sums.iter().sum();
    if total <= 0.0 {
        return Err(StatError::DegenerateTable);
    }
    let live_rows = row_sums.iter().filter(|s| **s > 0.0).count();
    let live_cols = col_sums.iter().filter(|s| **s > 0.0).count();
    if live_rows < 2 || live_cols < 2 {
        return Err(StatError::DegenerateTable);
    }

    let mut statistic = 0.0;
    for (r, row) in table.iter().enumerate() {
        for (c, observed) in row.iter().enumerate() {
            let expected = row_sums[r] * col_sums[c] / total;
            if expected > 0.0 {
                statistic += (observed - expected).powi(2) / expected;
            }
        }
    }
    let dof = (live_rows - 1) * (live_cols - 1);
    let p_value = gamma_q(dof as f64 / 2.0, statistic / 2.0);
    Ok(TestStatistic { statistic, p_value })
}

/// Two-sample Kolmogorov-Smirnov test with the asymptotic p-value.
pub fn ks_two_sample(a: &[f64], b: &[f64]) -> Result<TestStatistic, StatError> {
    check_sizes(a, b)?;
    let mut sa = a.to_vec();
    let mut sb = b.to_vec();
    sa.sort_by(f64::total_cmp);
    sb.sort_by(f64::total_cmp);

    let (n1, n2) = (sa.len(), sb.len());
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < n1 && j < n2 {
        let x = sa[i].min(sb[j]);
        while i < n1 && sa[i] <= x {
            i += 1;
        }
        while j < n2 && sb[j] <= x {
            j += 1;
        }
        let f1 = i as f64 / n1 as f64;
        let f2 = j as f64 / n2 as f64;
        d = d.max((f1 - f2).abs());
    }

    let ne = (n1 * n2) as f64 / (n1 + n2) as f64;
    let lambda = (ne.sqrt() + 0.12 + 0.11 / ne.sqrt()) * d;
    Ok(TestStatistic {
        statistic: d,
        p_value: ks_probability(lambda),
    })
}

/// Asymptotic KS tail probability `Q_KS(lambda)`.
///
/// The alternating series only converges for lambda away from zero; when
/// it does not converge the distributions are indistinguishable and the
/// probability is 1.
fn ks_probability(lambda: f64) -> f64 {
    if lambda < 1e-3 {
        return 1.0;
    }
    let mut sum: f64 = 0.0;
    let mut sign = 1.0;
    for k in 1..=100_i32 {
        let term = sign * (-2.0 * f64::from(k * k) * lambda * lambda).exp();
        sum += term;
        sign = -sign;
        if term.abs() < 1e-12 {
            return (2.0 * sum).clamp(0.0, 1.0);
        }
    }
    1.0
}

/// Two-sample Student's t-test with pooled variance, two-sided p-value.
pub fn students_t(a: &[f64], b: &[f64]) -> Result<TestStatistic, StatError> {
    check_sizes(a, b)?;
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;
    let var1 = a.iter().map(|v| (v - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = b.iter().map(|v| (v - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);
    let df = n1 + n2 - 2.0;
    let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
    let se = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    if se <= 0.0 {
        // Both samples are constant; identical means are maximally
        // unsurprising, different means maximally surprising.
        let p = if (mean1 - mean2).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        };
        return Ok(TestStatistic {
            statistic: 0.0,
            p_value: p,
        });
    }
    let t = (mean1 - mean2) / se;
    let p_value = beta_inc(df / 2.0, 0.5, df / (df + t * t)).clamp(0.0, 1.0);
    Ok(TestStatistic {
        statistic: t,
        p_value,
    })
}

/// Cohen's d: difference of means over the pooled standard deviation.
///
/// Symmetric up to sign: swapping the groups negates the value. `None`
/// when a group is too small or the pooled deviation is zero.
pub fn cohens_d(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() < MIN_GROUP_SIZE || b.len() < MIN_GROUP_SIZE {
        return None;
    }
    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean1 = a.iter().sum::<f64>() / n1;
    let mean2 = b.iter().sum::<f64>() / n2;
    let var1 = a.iter().map(|v| (v - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
    let var2 = b.iter().map(|v| (v - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);
    let pooled = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();
    (pooled > 0.0).then(|| (mean1 - mean2) / pooled)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const SMOKER_BPM: [f64; 3] = [140.0, 142.0, 141.0];
    const NON_SMOKER_BPM: [f64; 7] = [130.0, 131.0, 129.0, 132.0, 128.0, 133.0, 127.0];

    #[test]
    fn mann_whitney_separated_groups() {
        // All smoker values exceed all non-smoker values: U is maximal.
        let r = mann_whitney_u(&SMOKER_BPM, &NON_SMOKER_BPM).unwrap();
        assert!((r.statistic - 21.0).abs() < 1e-9);
        assert!(r.p_value > 0.0 && r.p_value < 0.05, "p = {}", r.p_value);
    }

    #[test]
    fn mann_whitney_identical_groups_not_significant() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = mann_whitney_u(&a, &a).unwrap();
        assert!(r.p_value > 0.9, "p = {}", r.p_value);
    }

    #[test]
    fn mann_whitney_all_tied_values() {
        let a = [3.0, 3.0, 3.0];
        let b = [3.0, 3.0, 3.0, 3.0];
        let r = mann_whitney_u(&a, &b).unwrap();
        assert!((r.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mann_whitney_zero_rank_difference_gives_p_one() {
        // Interleaved values: U equals its null mean, so diff is exactly 0
        // and the continuity correction must not push z below zero.
        let a = [1.0, 4.0];
        let b = [2.0, 3.0];
        let r = mann_whitney_u(&a, &b).unwrap();
        assert!((r.p_value - 1.0).abs() < 1e-6, "p = {}", r.p_value);
    }

    #[test]
    fn mann_whitney_rejects_tiny_groups() {
        assert_eq!(
            mann_whitney_u(&[1.0], &[2.0, 3.0]),
            Err(StatError::InsufficientSample { n: 1, min: 2 })
        );
    }

    #[test]
    fn chi_square_uniform_table_not_significant() {
        let table = vec![vec![50.0, 50.0], vec![50.0, 50.0]];
        let r = chi_square_independence(&table).unwrap();
        assert!(r.statistic.abs() < 1e-9);
        assert!((r.p_value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn chi_square_skewed_table_significant() {
        let table = vec![vec![90.0, 10.0], vec![10.0, 90.0]];
        let r = chi_square_independence(&table).unwrap();
        assert!(r.statistic > 100.0);
        assert!(r.p_value < 1e-6);
    }

    #[test]
    fn chi_square_rejects_degenerate_tables() {
        assert_eq!(
            chi_square_independence(&[vec![1.0, 2.0]]),
            Err(StatError::DegenerateTable)
        );
        assert_eq!(
            chi_square_independence(&[vec![0.0, 0.0], vec![0.0, 0.0]]),
            Err(StatError::DegenerateTable)
        );
    }

    #[test]
    fn ks_detects_shifted_distributions() {
        let a: Vec<f64> = (0..50).map(f64::from).collect();
        let b: Vec<f64> = (0..50).map(|v| f64::from(v) + 100.0).collect();
        let r = ks_two_sample(&a, &b).unwrap();
        assert!((r.statistic - 1.0).abs() < 1e-9);
        assert!(r.p_value < 1e-6);
    }

    #[test]
    fn ks_identical_samples_not_significant() {
        let a = [5.0, 5.0, 6.0];
        let r = ks_two_sample(&a, &a).unwrap();
        assert!(r.statistic.abs() < 1e-12);
        assert!((r.p_value - 1.0).abs() < 1e-9, "p = {}", r.p_value);
    }

    #[test]
    fn students_t_reference_value() {
        let r = students_t(&SMOKER_BPM, &NON_SMOKER_BPM).unwrap();
        // Smokers run ~11 bpm higher with ~2 bpm spread: strongly significant.
        assert!(r.statistic > 5.0);
        assert!(r.p_value < 0.01);
    }

    #[test]
    fn cohens_d_is_antisymmetric() {
        let d_ab = cohens_d(&SMOKER_BPM, &NON_SMOKER_BPM).unwrap();
        let d_ba = cohens_d(&NON_SMOKER_BPM, &SMOKER_BPM).unwrap();
        assert!((d_ab + d_ba).abs() < 1e-12);
        assert!(d_ab > 0.0);
    }

    #[test]
    fn cohens_d_degenerate_cases() {
        assert!(cohens_d(&[1.0], &[2.0, 3.0]).is_none());
        assert!(cohens_d(&[2.0, 2.0], &[2.0, 2.0]).is_none());
    }
}
