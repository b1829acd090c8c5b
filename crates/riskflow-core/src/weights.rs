//! Indicator weight table.
//!
//! Weights are an explicit immutable value passed into the aggregator,
//! never ambient mutable state, so concurrent batches with different
//! weights cannot interfere.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{DEFAULT_WEIGHTS, WEIGHT_SUM_TOLERANCE};
use crate::error::ConfigError;
use crate::types::Indicator;

/// Per-indicator weights in `[0, 1]` summing to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`]. The invariant is enforced at construction;
/// every constructed table is valid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WeightTable {
    weights: [f64; 7],
}

impl WeightTable {
    /// Build a table from weights in [`Indicator::ALL`] order.
    pub fn from_values(weights: [f64; 7]) -> Result<Self, ConfigError> {
        for (indicator, &weight) in Indicator::ALL.iter().zip(weights.iter()) {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::WeightOutOfRange {
                    indicator: *indicator,
                    weight,
                });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSumMismatch { sum });
        }
        Ok(WeightTable { weights })
    }

    /// Build a table from a map. Every indicator must be present.
    pub fn from_map(map: &HashMap<Indicator, f64>) -> Result<Self, ConfigError> {
        let mut weights = [0.0; 7];
        for indicator in Indicator::ALL {
            weights[indicator as usize] = *map
                .get(&indicator)
                .ok_or(ConfigError::MissingWeight(indicator))?;
        }
        Self::from_values(weights)
    }

    /// Weight assigned to a single indicator.
    pub fn get(&self, indicator: Indicator) -> f64 {
        self.weights[indicator as usize]
    }

    /// Iterate `(indicator, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        Indicator::ALL.into_iter().map(|i| (i, self.get(i)))
    }
}

impl Default for WeightTable {
    /// Canonical weights: 25% borrow/supply ratio, 20% liquidations,
    /// 15% inactivity, 15% repayment frequency, 10% volatile assets,
    /// 10% protocol version, 5% collateral factor.
    fn default() -> Self {
        // DEFAULT_WEIGHTS sums to 1.0 exactly; checked by a constants test.
        WeightTable {
            weights: DEFAULT_WEIGHTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_match_canonical() {
        let table = WeightTable::default();
        assert_eq!(table.get(Indicator::BorrowSupplyRatio), 0.25);
        assert_eq!(table.get(Indicator::LiquidationCount), 0.20);
        assert_eq!(table.get(Indicator::InactivityDays), 0.15);
        assert_eq!(table.get(Indicator::RepaymentsPerMonth), 0.15);
        assert_eq!(table.get(Indicator::VolatileAssetPct), 0.10);
        assert_eq!(table.get(Indicator::ProtocolVersion), 0.10);
        assert_eq!(table.get(Indicator::CollateralFactor), 0.05);
    }

    #[test]
    fn rejects_bad_sum() {
        let err = WeightTable::from_values([0.5, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSumMismatch { .. }));
    }

    #[test]
    fn accepts_sum_within_tolerance() {
        // Off by 5e-7, inside the 1e-6 tolerance.
        let weights = [0.25, 0.20, 0.15, 0.15, 0.10, 0.10, 0.05 + 5e-7];
        assert!(WeightTable::from_values(weights).is_ok());
    }

    #[test]
    fn rejects_sum_just_outside_tolerance() {
        let weights = [0.25, 0.20, 0.15, 0.15, 0.10, 0.10, 0.05 + 5e-6];
        let err = WeightTable::from_values(weights).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSumMismatch { .. }));
    }

    #[test]
    fn rejects_negative_weight() {
        let err = WeightTable::from_values([-0.1, 0.3, 0.2, 0.2, 0.1, 0.2, 0.1]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WeightOutOfRange {
                indicator: Indicator::BorrowSupplyRatio,
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan_weight() {
        let err = WeightTable::from_values([f64::NAN, 0.2, 0.2, 0.2, 0.1, 0.2, 0.1]).unwrap_err();
        assert!(matches!(err, ConfigError::WeightOutOfRange { .. }));
    }

    #[test]
    fn from_map_requires_all_indicators() {
        let mut map = HashMap::new();
        map.insert(Indicator::BorrowSupplyRatio, 1.0);
        let err = WeightTable::from_map(&map).unwrap_err();
        assert!(matches!(err, ConfigError::MissingWeight(_)));
    }

    #[test]
    fn from_map_round_trips_default() {
        let map: HashMap<Indicator, f64> = WeightTable::default().iter().collect();
        let table = WeightTable::from_map(&map).unwrap();
        assert_eq!(table, WeightTable::default());
    }

    #[test]
    fn uniform_weights_are_valid() {
        let w = 1.0 / 7.0;
        let table = WeightTable::from_values([w; 7]).unwrap();
        let sum: f64 = table.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }
}
