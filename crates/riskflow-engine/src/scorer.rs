//! Component scoring: feature vector in, bounded per-indicator scores out.

use riskflow_core::buckets::BucketConfig;
use riskflow_core::types::{ComponentScores, FeatureVector, ProtocolVersion};

/// Maps each indicator through its bucket table. Positive scores indicate
/// safer behavior, negative scores riskier behavior, bounded by ±100.
#[derive(Clone, Debug)]
pub struct ComponentScorer {
    buckets: BucketConfig,
}

impl ComponentScorer {
    pub fn new(buckets: BucketConfig) -> Self {
        ComponentScorer { buckets }
    }

    pub fn score(&self, features: &FeatureVector) -> ComponentScores {
        ComponentScores {
            borrow_supply_ratio: self
                .buckets
                .borrow_supply_ratio
                .score(features.borrow_supply_ratio),
            liquidation_count: self
                .buckets
                .liquidation_count
                .score(f64::from(features.liquidation_count)),
            inactivity_days: self
                .buckets
                .inactivity_days
                .score(features.inactivity_days as f64),
            repayments_per_month: self
                .buckets
                .repayments_per_month
                .score(features.repayments_per_month),
            volatile_asset_pct: self
                .buckets
                .volatile_asset_pct
                .score(features.volatile_asset_pct),
            protocol_version: match features.dominant_protocol_version {
                ProtocolVersion::V2 => self.buckets.protocol_v2_score,
                ProtocolVersion::V3 => self.buckets.protocol_v3_score,
            },
            collateral_factor: self
                .buckets
                .avg_collateral_factor
                .score(features.avg_collateral_factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskflow_core::constants::{COMPONENT_SCORE_MAX, COMPONENT_SCORE_MIN};

    fn features() -> FeatureVector {
        FeatureVector {
            borrow_supply_ratio: 0.25,
            liquidation_count: 0,
            inactivity_days: 10,
            repayments_per_month: 2.5,
            volatile_asset_pct: 0.1,
            dominant_protocol_version: ProtocolVersion::V3,
            avg_collateral_factor: 0.85,
        }
    }

    #[test]
    fn safe_profile_scores_high_across_the_board() {
        let scorer = ComponentScorer::new(BucketConfig::default());
        let scores = scorer.score(&features());
        assert_eq!(scores.borrow_supply_ratio, 100);
        assert_eq!(scores.liquidation_count, 50);
        assert_eq!(scores.inactivity_days, 50);
        assert_eq!(scores.repayments_per_month, 100);
        assert_eq!(scores.volatile_asset_pct, 100);
        assert_eq!(scores.protocol_version, 50);
        assert_eq!(scores.collateral_factor, 100);
    }

    #[test]
    fn risky_profile_scores_low() {
        let scorer = ComponentScorer::new(BucketConfig::default());
        let risky = FeatureVector {
            borrow_supply_ratio: 10.0,
            liquidation_count: 8,
            inactivity_days: 365,
            repayments_per_month: 0.0,
            volatile_asset_pct: 0.9,
            dominant_protocol_version: ProtocolVersion::V2,
            avg_collateral_factor: 0.3,
        };
        let scores = scorer.score(&risky);
        assert_eq!(scores.borrow_supply_ratio, -100);
        assert_eq!(scores.liquidation_count, -100);
        assert_eq!(scores.inactivity_days, -100);
        assert_eq!(scores.repayments_per_month, -50);
        assert_eq!(scores.volatile_asset_pct, -100);
        assert_eq!(scores.protocol_version, -25);
        assert_eq!(scores.collateral_factor, -50);
    }

    #[test]
    fn protocol_version_uses_discrete_scores() {
        let scorer = ComponentScorer::new(BucketConfig::default());
        let mut f = features();
        f.dominant_protocol_version = ProtocolVersion::V2;
        assert_eq!(scorer.score(&f).protocol_version, -25);
        f.dominant_protocol_version = ProtocolVersion::V3;
        assert_eq!(scorer.score(&f).protocol_version, 50);
    }

    #[test]
    fn all_components_stay_bounded() {
        let scorer = ComponentScorer::new(BucketConfig::default());
        let extremes = [
            FeatureVector {
                borrow_supply_ratio: f64::MAX,
                liquidation_count: u32::MAX,
                inactivity_days: u64::MAX,
                repayments_per_month: f64::MAX,
                volatile_asset_pct: 1.0,
                dominant_protocol_version: ProtocolVersion::V2,
                avg_collateral_factor: 1.0,
            },
            FeatureVector {
                borrow_supply_ratio: 0.0,
                liquidation_count: 0,
                inactivity_days: 0,
                repayments_per_month: 0.0,
                volatile_asset_pct: 0.0,
                dominant_protocol_version: ProtocolVersion::V3,
                avg_collateral_factor: 0.0,
            },
        ];
        for f in &extremes {
            for (_, score) in scorer.score(f).iter() {
                assert!((COMPONENT_SCORE_MIN..=COMPONENT_SCORE_MAX).contains(&score));
            }
        }
    }
}
