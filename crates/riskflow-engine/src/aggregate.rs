//! Score aggregation and normalization.
//!
//! The raw score is `500 + Σ weight·component`; with weights summing to
//! 1.0 and components bounded by ±100 it always lands in `[400, 600]`.
//! Normalization then maps raw scores onto the published `[0, 1000]`
//! scale, either relative to the batch (default) or against a fixed
//! reference range.

use riskflow_core::config::NormalizationMode;
use riskflow_core::constants::{BASE_SCORE, DEGENERATE_BATCH_SCORE, NORMALIZED_SCORE_MAX};
use riskflow_core::error::ConfigError;
use riskflow_core::types::ComponentScores;
use riskflow_core::weights::WeightTable;

#[derive(Clone, Debug)]
pub struct Aggregator {
    weights: WeightTable,
    mode: NormalizationMode,
}

impl Aggregator {
    /// The normalization mode is validated here so a bad fixed reference
    /// range fails at construction, not mid-batch.
    pub fn new(weights: WeightTable, mode: NormalizationMode) -> Result<Self, ConfigError> {
        mode.validate()?;
        Ok(Aggregator { weights, mode })
    }

    /// Weighted raw score in `[400, 600]`.
    pub fn raw_score(&self, components: &ComponentScores) -> f64 {
        let weighted: f64 = components
            .iter()
            .map(|(indicator, score)| self.weights.get(indicator) * f64::from(score))
            .sum();
        BASE_SCORE + weighted
    }

    /// Map a slice of raw scores onto `[0, 1000]`, preserving order.
    ///
    /// Under [`NormalizationMode::BatchRelative`] the batch minimum maps
    /// to 0 and the maximum to 1000; a batch with no spread maps every
    /// wallet to 500. Under [`NormalizationMode::FixedReference`] each
    /// score scales independently against the reference range, clamped.
    pub fn normalize(&self, raw_scores: &[f64]) -> Vec<u16> {
        match self.mode {
            NormalizationMode::BatchRelative => {
                if raw_scores.is_empty() {
                    return Vec::new();
                }
                let min = raw_scores.iter().copied().fold(f64::INFINITY, f64::min);
                let max = raw_scores
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
                if max - min < f64::EPSILON {
                    return vec![DEGENERATE_BATCH_SCORE; raw_scores.len()];
                }
                raw_scores
                    .iter()
                    .map(|&raw| scale(raw, min, max))
                    .collect()
            }
            NormalizationMode::FixedReference { min, max } => {
                raw_scores.iter().map(|&raw| scale(raw, min, max)).collect()
            }
        }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }
}

fn scale(raw: f64, min: f64, max: f64) -> u16 {
    let scaled = (raw - min) / (max - min) * f64::from(NORMALIZED_SCORE_MAX);
    scaled.round().clamp(0.0, f64::from(NORMALIZED_SCORE_MAX)) as u16
}
