//! Data-driven bucket tables mapping raw feature values to component
//! scores.
//!
//! Each table is an ordered list of `(lower_bound, score)` pairs. A value
//! scores with the last entry whose bound is `<= value`, which makes every
//! bucket left-inclusive and right-exclusive with the final bucket closed
//! at +infinity. Values below the first bound clamp to the first entry, so
//! lookup is total over all finite inputs.

use serde::{Deserialize, Serialize};

use crate::constants::{COMPONENT_SCORE_MAX, COMPONENT_SCORE_MIN};
use crate::error::ConfigError;
use crate::types::Indicator;

/// An ordered `(lower_bound, score)` interval table for one indicator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BucketTable {
    entries: Vec<(f64, i16)>,
}

impl BucketTable {
    /// Build a validated table. Bounds must be strictly increasing and
    /// scores bounded by ±100. `indicator` is only used for error context.
    pub fn new(indicator: Indicator, entries: Vec<(f64, i16)>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyBucketTable(indicator));
        }
        for (i, window) in entries.windows(2).enumerate() {
            if window[1].0 <= window[0].0 {
                return Err(ConfigError::UnsortedBucketTable {
                    indicator,
                    entry: i + 1,
                });
            }
        }
        for &(_, score) in &entries {
            if !(COMPONENT_SCORE_MIN..=COMPONENT_SCORE_MAX).contains(&score) {
                return Err(ConfigError::BucketScoreOutOfRange { indicator, score });
            }
        }
        Ok(BucketTable { entries })
    }

    /// Internal constructor for the canonical defaults, which are known
    /// sorted and bounded (covered by tests).
    fn from_static(entries: &[(f64, i16)]) -> Self {
        BucketTable {
            entries: entries.to_vec(),
        }
    }

    /// Score a value: last entry whose bound is `<= value`, clamped to the
    /// first entry for values below every bound. NaN clamps to the first
    /// entry (the extractor never produces NaN features).
    pub fn score(&self, value: f64) -> i16 {
        let mut current = self.entries[0].1;
        for &(bound, score) in &self.entries {
            if value >= bound {
                current = score;
            } else {
                break;
            }
        }
        current
    }

    /// The `(lower_bound, score)` entries in ascending bound order.
    pub fn entries(&self) -> &[(f64, i16)] {
        &self.entries
    }
}

/// Bucket tables for the six numeric indicators plus the discrete
/// protocol-version scores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BucketConfig {
    pub borrow_supply_ratio: BucketTable,
    pub liquidation_count: BucketTable,
    pub inactivity_days: BucketTable,
    pub repayments_per_month: BucketTable,
    pub volatile_asset_pct: BucketTable,
    pub avg_collateral_factor: BucketTable,
    /// Score when the dominant protocol version is V2.
    pub protocol_v2_score: i16,
    /// Score when the dominant protocol version is V3.
    pub protocol_v3_score: i16,
}

impl Default for BucketConfig {
    /// Canonical cut points. These are the defaults the test suite checks;
    /// deployments may override them via [`BucketTable::new`].
    fn default() -> Self {
        BucketConfig {
            borrow_supply_ratio: BucketTable::from_static(&[
                (0.0, 100),
                (0.3, 50),
                (0.5, 0),
                (0.7, -50),
                (0.9, -100),
            ]),
            // Counts are integers; the (5, ∞) bucket starts at 6.
            liquidation_count: BucketTable::from_static(&[
                (0.0, 50),
                (1.0, -25),
                (2.0, -50),
                (3.0, -75),
                (6.0, -100),
            ]),
            inactivity_days: BucketTable::from_static(&[
                (0.0, 50),
                (30.0, 0),
                (90.0, -50),
                (180.0, -100),
            ]),
            // f64::MIN_POSITIVE encodes the open bound "strictly above zero":
            // exactly 0 repayments scores -50, any positive rate at least 0.
            repayments_per_month: BucketTable::from_static(&[
                (0.0, -50),
                (f64::MIN_POSITIVE, 0),
                (1.0, 50),
                (2.0, 100),
            ]),
            volatile_asset_pct: BucketTable::from_static(&[(0.0, 100), (0.2, 0), (0.5, -100)]),
            avg_collateral_factor: BucketTable::from_static(&[
                (0.0, -50),
                (0.4, 0),
                (0.6, 50),
                (0.8, 100),
            ]),
            protocol_v2_score: -25,
            protocol_v3_score: 50,
        }
    }
}

impl BucketConfig {
    /// Numeric bucket table for an indicator, or `None` for the discrete
    /// protocol-version indicator.
    pub fn table(&self, indicator: Indicator) -> Option<&BucketTable> {
        match indicator {
            Indicator::BorrowSupplyRatio => Some(&self.borrow_supply_ratio),
            Indicator::LiquidationCount => Some(&self.liquidation_count),
            Indicator::InactivityDays => Some(&self.inactivity_days),
            Indicator::RepaymentsPerMonth => Some(&self.repayments_per_month),
            Indicator::VolatileAssetPct => Some(&self.volatile_asset_pct),
            Indicator::CollateralFactor => Some(&self.avg_collateral_factor),
            Indicator::ProtocolVersion => None,
        }
    }

    /// Validate every default-or-overridden table. Used when a config is
    /// assembled from untrusted parts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for indicator in Indicator::ALL {
            if let Some(table) = self.table(indicator) {
                BucketTable::new(indicator, table.entries.clone())?;
            }
        }
        for score in [self.protocol_v2_score, self.protocol_v3_score] {
            if !(COMPONENT_SCORE_MIN..=COMPONENT_SCORE_MAX).contains(&score) {
                return Err(ConfigError::BucketScoreOutOfRange {
                    indicator: Indicator::ProtocolVersion,
                    score,
                });
            }
        }
        Ok(())
    }
}
