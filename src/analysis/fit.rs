//! Chi-squared goodness-of-fit against a fair die.
//!
//! The statistic itself is computed here. Turning it into a probability
//! goes through the [`ChiSquaredCdf`] trait so the numeric backend can be
//! swapped or stubbed.

use crate::error::AnalysisError;
use crate::models::{FitResult, RollSet};
use special::Gamma;
use tracing::{debug, info, warn};

/// Default significance level for the fairness verdict.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Rolls per side recommended for a meaningful test.
pub const ROLLS_PER_SIDE: usize = 10;

/// Cumulative distribution function of the chi-squared distribution.
pub trait ChiSquaredCdf {
    /// Probability that a chi-squared variable with `degrees_of_freedom`
    /// is at most `statistic`. Always in `[0, 1]`.
    fn cdf(&self, statistic: f64, degrees_of_freedom: u32) -> f64;
}

/// CDF via the regularized lower incomplete gamma function,
/// `P(k/2, x/2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncompleteGammaCdf;

impl ChiSquaredCdf for IncompleteGammaCdf {
    fn cdf(&self, statistic: f64, degrees_of_freedom: u32) -> f64 {
        // Zero degrees of freedom is a point mass at zero.
        if degrees_of_freedom == 0 {
            return 1.0;
        }
        if statistic.is_nan() || statistic <= 0.0 {
            return 0.0;
        }
        if statistic.is_infinite() {
            return 1.0;
        }

        let p = (statistic / 2.0).inc_gamma(f64::from(degrees_of_freedom) / 2.0);
        p.clamp(0.0, 1.0)
    }
}

/// Chi-squared statistic of `rolls` against a fair die with `sides` sides.
///
/// The counts are placed into `sides` slots in the roll set's iteration
/// order. Labels beyond the first `sides` are ignored and empty slots count
/// as zero, so the result depends on iteration order when the roll set has
/// more distinct labels than `sides`.
pub fn chi_squared(rolls: &RollSet, sides: u32) -> Result<f64, AnalysisError> {
    if sides == 0 {
        return Err(AnalysisError::InvalidSides(sides));
    }

    let total = rolls.total_rolls();
    if total == 0 {
        return Err(AnalysisError::EmptyRollSet);
    }

    let slots = sides as usize;
    let expected = total as f64 / f64::from(sides);

    let statistic: f64 = rolls
        .counts()
        .chain(std::iter::repeat(0))
        .take(slots)
        .map(|observed| (observed as f64 - expected).powi(2) / expected)
        .sum();

    Ok(statistic)
}

/// Recommended minimum number of rolls for testing a die with `sides` sides.
pub fn suggested_minimum_rolls(sides: u32) -> usize {
    ROLLS_PER_SIDE * sides as usize
}

/// Chi-squared CDF at `statistic` for a die with `sides` sides, using the
/// default backend.
pub fn chi_squared_cdf_at(statistic: f64, sides: u32) -> f64 {
    IncompleteGammaCdf.cdf(statistic, sides.saturating_sub(1))
}

/// Run the full fit test: statistic, CDF lookup, p-value and the
/// sample-size advisory.
pub fn fit_test(
    rolls: &RollSet,
    sides: u32,
    significance: f64,
    cdf: &dyn ChiSquaredCdf,
) -> Result<FitResult, AnalysisError> {
    if rolls.distinct_count() > sides as usize {
        warn!(
            "{} distinct labels but testing against {} sides; extra labels are ignored",
            rolls.distinct_count(),
            sides
        );
    }

    let statistic = chi_squared(rolls, sides)?;
    let degrees_of_freedom = sides - 1;
    let cdf_value = cdf.cdf(statistic, degrees_of_freedom);
    // A one-sided die cannot deviate from uniform.
    let p_value = if degrees_of_freedom == 0 {
        1.0
    } else {
        1.0 - cdf_value
    };

    let suggested = suggested_minimum_rolls(sides);
    let enough_rolls = rolls.total_rolls() >= suggested;
    let consistent_with_fair = p_value >= significance;

    debug!(
        "chi2={:.4} df={} cdf={:.4} p={:.4}",
        statistic, degrees_of_freedom, cdf_value, p_value
    );
    info!(
        "Fit test against {} sides: {}",
        sides,
        if consistent_with_fair {
            "consistent with a fair die"
        } else {
            "unlikely to be fair"
        }
    );

    Ok(FitResult {
        sides,
        statistic,
        degrees_of_freedom,
        cdf: cdf_value,
        p_value,
        significance,
        suggested_minimum_rolls: suggested,
        enough_rolls,
        consistent_with_fair,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedCdf(f64);

    impl ChiSquaredCdf for FixedCdf {
        fn cdf(&self, _statistic: f64, _degrees_of_freedom: u32) -> f64 {
            self.0
        }
    }

    fn uniform_d20() -> RollSet {
        let counts: HashMap<String, usize> = (1..=20).map(|i| (i.to_string(), 5)).collect();
        RollSet::new(counts)
    }

    #[test]
    fn test_uniform_rolls_score_zero() {
        let rolls = uniform_d20();
        assert_eq!(rolls.total_rolls(), 100);
        assert_eq!(chi_squared(&rolls, 20).unwrap(), 0.0);
    }

    #[test]
    fn test_known_statistic() {
        // 28, 31, 40, 35 over 4 sides: expected 33.5
        let counts: HashMap<String, usize> = [("a", 28), ("b", 31), ("c", 40), ("d", 35)]
            .into_iter()
            .map(|(l, n)| (l.to_string(), n))
            .collect();
        let rolls = RollSet::new(counts);

        let chi2 = chi_squared(&rolls, 4).unwrap();
        assert!((chi2 - 2.417_910_447_761_194).abs() < 1e-9);
    }

    #[test]
    fn test_order_invariant_when_sides_match_labels() {
        let a = RollSet::from_rolls(["1", "1", "1", "2", "3", "3", "4", "4", "4", "4"]);
        let b = RollSet::from_rolls(["4", "3", "4", "1", "4", "3", "2", "1", "4", "1"]);

        let chi_a = chi_squared(&a, 4).unwrap();
        let chi_b = chi_squared(&b, 4).unwrap();
        assert!((chi_a - chi_b).abs() < 1e-12);
    }

    #[test]
    fn test_missing_sides_count_as_zero() {
        // Only two faces of a d4 rolled: slots [4, 4, 0, 0], expected 2.
        let rolls = RollSet::from_rolls(["1", "1", "1", "1", "2", "2", "2", "2"]);
        let chi2 = chi_squared(&rolls, 4).unwrap();
        assert!((chi2 - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_extra_labels_are_truncated() {
        // Every label has the same count, so whichever two are kept the
        // slots are [3, 3] against an expected 9 / 2 = 4.5.
        let rolls = RollSet::from_rolls(["a", "a", "a", "b", "b", "b", "c", "c", "c"]);
        let chi2 = chi_squared(&rolls, 2).unwrap();
        assert!((chi2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_zero_sides_are_errors() {
        let empty = RollSet::default();
        assert_eq!(chi_squared(&empty, 6), Err(AnalysisError::EmptyRollSet));

        let rolls = RollSet::from_rolls(["1"]);
        assert_eq!(chi_squared(&rolls, 0), Err(AnalysisError::InvalidSides(0)));
    }

    #[test]
    fn test_suggested_minimum_rolls() {
        for sides in 1..=100 {
            assert_eq!(suggested_minimum_rolls(sides), 10 * sides as usize);
        }
    }

    #[test]
    fn test_cdf_known_value() {
        let cdf = chi_squared_cdf_at(27.204, 20);
        assert!((cdf - 0.90).abs() < 0.001);
    }

    #[test]
    fn test_cdf_edges() {
        let cdf = IncompleteGammaCdf;
        assert_eq!(cdf.cdf(0.0, 5), 0.0);
        assert_eq!(cdf.cdf(-1.0, 5), 0.0);
        assert_eq!(cdf.cdf(3.0, 0), 1.0);
        assert!(cdf.cdf(1_000.0, 5) > 0.999_999);

        let mid = cdf.cdf(5.0, 5);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_fit_test_with_stub_cdf() {
        let rolls = uniform_d20();

        let fair = fit_test(&rolls, 20, DEFAULT_SIGNIFICANCE, &FixedCdf(0.5)).unwrap();
        assert_eq!(fair.statistic, 0.0);
        assert_eq!(fair.degrees_of_freedom, 19);
        assert!((fair.p_value - 0.5).abs() < 1e-12);
        assert!(fair.consistent_with_fair);
        assert_eq!(fair.suggested_minimum_rolls, 200);
        assert!(!fair.enough_rolls);

        let unfair = fit_test(&rolls, 20, DEFAULT_SIGNIFICANCE, &FixedCdf(0.99)).unwrap();
        assert!(!unfair.consistent_with_fair);
    }

    #[test]
    fn test_single_side_is_always_fair() {
        let rolls = RollSet::from_rolls(["x", "x", "x", "x"]);
        let result = fit_test(&rolls, 1, DEFAULT_SIGNIFICANCE, &IncompleteGammaCdf).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.degrees_of_freedom, 0);
        assert_eq!(result.p_value, 1.0);
        assert!(result.consistent_with_fair);
    }

    #[test]
    fn test_fit_test_detects_loaded_die() {
        let mut rolls = Vec::new();
        for _ in 0..30 {
            rolls.push("6");
        }
        for face in ["1", "2", "3", "4", "5"] {
            for _ in 0..6 {
                rolls.push(face);
            }
        }
        let rolls = RollSet::from_rolls(rolls);

        let result = fit_test(&rolls, 6, DEFAULT_SIGNIFICANCE, &IncompleteGammaCdf).unwrap();
        assert!(result.enough_rolls);
        assert!(!result.consistent_with_fair);
        assert!(result.p_value < 0.001);
    }
}
