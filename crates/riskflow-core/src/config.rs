//! Scoring configuration.
//!
//! A [`ScoringConfig`] bundles everything the engine needs to turn event
//! histories into published scores: indicator weights, bucket tables, the
//! volatile-asset set, and the normalization mode. Defaults reproduce the
//! canonical Compound V2/V3 parameters; deployments override pieces and
//! validate the result before constructing an engine.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::buckets::BucketConfig;
use crate::constants::DEFAULT_VOLATILE_ASSETS;
use crate::error::ConfigError;
use crate::weights::WeightTable;

/// How raw scores in `[400, 600]` map to published scores in `[0, 1000]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum NormalizationMode {
    /// Min-max scale against the raw scores of the current batch. Scores
    /// rank wallets within their cohort; a wallet's published score can
    /// change when the co-batch changes. A batch with no spread maps every
    /// wallet to 500.
    BatchRelative,
    /// Linear scale against a fixed `[min, max]` reference range, clamped.
    /// Scores are stable across batches and comparable over time.
    FixedReference { min: f64, max: f64 },
}

impl NormalizationMode {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            NormalizationMode::BatchRelative => Ok(()),
            NormalizationMode::FixedReference { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(ConfigError::InvalidReferenceRange { min, max });
                }
                Ok(())
            }
        }
    }
}

impl Default for NormalizationMode {
    fn default() -> Self {
        NormalizationMode::BatchRelative
    }
}

/// Complete engine configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    pub weights: WeightTable,
    pub buckets: BucketConfig,
    /// Asset symbols counted as volatile, uppercase.
    pub volatile_assets: HashSet<String>,
    pub normalization: NormalizationMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            weights: WeightTable::default(),
            buckets: BucketConfig::default(),
            volatile_assets: DEFAULT_VOLATILE_ASSETS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            normalization: NormalizationMode::default(),
        }
    }
}

impl ScoringConfig {
    /// Check every part of an assembled config. Weight tables are valid by
    /// construction, so this validates the bucket tables and normalization
    /// mode (the parts that can be overridden field-by-field).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.buckets.validate()?;
        self.normalization.validate()?;
        Ok(())
    }

    /// Whether an asset symbol counts as volatile. Comparison is
    /// case-insensitive; collectors report uppercase symbols but wallet
    /// lists and overrides may not.
    pub fn is_volatile(&self, asset: &str) -> bool {
        self.volatile_assets.contains(&asset.to_ascii_uppercase())
    }
}
