//! Scoring constants. Component scores are dimensionless integers in
//! `[-100, 100]`; published scores are integers in `[0, 1000]`.

/// Neutral base added before the weighted component sum.
pub const BASE_SCORE: f64 = 500.0;

/// Lower bound of the raw (pre-normalization) score range.
///
/// With weights summing to 1.0 and components bounded by ±100, the weighted
/// term lies in `[-100, 100]`, so raw scores lie in `[400, 600]`.
pub const RAW_SCORE_MIN: f64 = 400.0;

/// Upper bound of the raw (pre-normalization) score range.
pub const RAW_SCORE_MAX: f64 = 600.0;

/// Maximum published (normalized) score.
pub const NORMALIZED_SCORE_MAX: u16 = 1000;

/// Normalized score assigned to every wallet when the batch has no spread
/// (all raw scores identical). Explicit policy, not an error.
pub const DEGENERATE_BATCH_SCORE: u16 = 500;

/// Smallest component score any single indicator can contribute.
pub const COMPONENT_SCORE_MIN: i16 = -100;

/// Largest component score any single indicator can contribute.
pub const COMPONENT_SCORE_MAX: i16 = 100;

/// Seconds per day, for inactivity computation.
pub const SECS_PER_DAY: i64 = 86_400;

/// Seconds per month for repayment-frequency purposes. A month is 30 days
/// by convention; active spans are rounded up to whole months.
pub const SECS_PER_MONTH: i64 = 30 * SECS_PER_DAY;

/// Finite sentinel ratio for wallets that borrowed without ever supplying.
///
/// Any value at or above 0.9 lands in the worst borrow/supply bucket; a
/// finite sentinel keeps the feature printable and orderable instead of
/// feeding infinity into bucket comparisons.
pub const ZERO_SUPPLY_RATIO_SENTINEL: f64 = 10.0;

/// Tolerance for the weight-sum invariant (`Σ weights = 1.0`).
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Canonical indicator weights, ordered as [`crate::types::Indicator::ALL`]:
/// borrow/supply ratio, liquidations, inactivity, repayment frequency,
/// volatile-asset usage, protocol version, collateral factor.
pub const DEFAULT_WEIGHTS: [f64; 7] = [0.25, 0.20, 0.15, 0.15, 0.10, 0.10, 0.05];

/// Asset symbols treated as volatile by default.
pub const DEFAULT_VOLATILE_ASSETS: &[&str] = &[
    "WBTC", "ETH", "WETH", "LINK", "UNI", "MKR", "YFI", "AAVE", "SUSHI",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let sum: f64 = DEFAULT_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE, "sum = {sum}");
    }

    #[test]
    fn sentinel_lands_in_worst_bucket() {
        assert!(ZERO_SUPPLY_RATIO_SENTINEL >= 0.9);
        assert!(ZERO_SUPPLY_RATIO_SENTINEL.is_finite());
    }

    #[test]
    fn raw_range_matches_component_bounds() {
        assert_eq!(RAW_SCORE_MIN, BASE_SCORE + COMPONENT_SCORE_MIN as f64);
        assert_eq!(RAW_SCORE_MAX, BASE_SCORE + COMPONENT_SCORE_MAX as f64);
    }
}
