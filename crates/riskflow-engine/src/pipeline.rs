//! End-to-end scoring pipeline: event histories in, scored batch out.
//!
//! A batch run is all-or-nothing per wallet but never per batch: wallets
//! whose histories fail extraction are reported as failures while the rest
//! of the cohort is scored and normalized without them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use riskflow_core::error::{ConfigError, ExtractError};
use riskflow_core::types::{
    ComponentScores, Event, FeatureVector, RiskCategory, ScoreResult,
};
use riskflow_core::{ScoringConfig, WalletAddress};

use crate::aggregate::Aggregator;
use crate::features::FeatureExtractor;
use crate::scorer::ComponentScorer;

/// Full scoring detail for one wallet, kept for reports and explanations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WalletReport {
    pub features: FeatureVector,
    pub components: ComponentScores,
    pub result: ScoreResult,
}

/// Outcome of a batch run: scored wallets plus per-wallet failures.
#[derive(Debug)]
pub struct BatchOutcome {
    pub reports: BTreeMap<WalletAddress, WalletReport>,
    pub failures: BTreeMap<WalletAddress, ExtractError>,
}

impl BatchOutcome {
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.failures.is_empty()
    }
}

/// The assembled scoring engine.
#[derive(Clone, Debug)]
pub struct RiskEngine {
    extractor: FeatureExtractor,
    scorer: ComponentScorer,
    aggregator: Aggregator,
}

impl RiskEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let aggregator = Aggregator::new(config.weights.clone(), config.normalization)?;
        let scorer = ComponentScorer::new(config.buckets.clone());
        let extractor = FeatureExtractor::new(config);
        Ok(RiskEngine {
            extractor,
            scorer,
            aggregator,
        })
    }

    /// Score a batch of wallets against each other.
    ///
    /// `now` is the reference timestamp (Unix seconds) shared by every
    /// wallet in the batch. Wallets whose histories fail extraction land
    /// in [`BatchOutcome::failures`]; normalization runs over the
    /// successful wallets only. Iteration over the `BTreeMap` input keeps
    /// the run deterministic.
    pub fn score_batch(
        &self,
        histories: &BTreeMap<WalletAddress, Vec<Event>>,
        now: i64,
    ) -> BatchOutcome {
        let mut failures = BTreeMap::new();
        let mut scored: Vec<(WalletAddress, FeatureVector, ComponentScores, f64)> = Vec::new();

        for (wallet, events) in histories {
            match self.extractor.extract(wallet, events, now) {
                Ok(features) => {
                    let components = self.scorer.score(&features);
                    let raw = self.aggregator.raw_score(&components);
                    scored.push((wallet.clone(), features, components, raw));
                }
                Err(err) => {
                    warn!(wallet = %wallet.short(), error = %err, "wallet excluded from batch");
                    failures.insert(wallet.clone(), err);
                }
            }
        }

        let raw_scores: Vec<f64> = scored.iter().map(|(_, _, _, raw)| *raw).collect();
        let normalized = self.aggregator.normalize(&raw_scores);

        let mut reports = BTreeMap::new();
        for ((wallet, features, components, raw), norm) in scored.into_iter().zip(normalized) {
            let result = ScoreResult {
                wallet: wallet.clone(),
                raw_score: raw,
                normalized_score: norm,
                category: RiskCategory::from_normalized(norm),
            };
            reports.insert(
                wallet,
                WalletReport {
                    features,
                    components,
                    result,
                },
            );
        }

        info!(
            scored = reports.len(),
            failed = failures.len(),
            "batch scoring complete"
        );
        BatchOutcome { reports, failures }
    }

    /// Score a single wallet as a batch of one.
    ///
    /// Under batch-relative normalization a singleton batch has no spread,
    /// so the published score is always 500; use a fixed reference range
    /// when single-wallet scores need to be meaningful.
    pub fn score_wallet(
        &self,
        wallet: &WalletAddress,
        events: &[Event],
        now: i64,
    ) -> Result<WalletReport, ExtractError> {
        let features = self.extractor.extract(wallet, events, now)?;
        let components = self.scorer.score(&features);
        let raw = self.aggregator.raw_score(&components);
        let norm = self.aggregator.normalize(&[raw])[0];
        Ok(WalletReport {
            features,
            components,
            result: ScoreResult {
                wallet: wallet.clone(),
                raw_score: raw,
                normalized_score: norm,
                category: RiskCategory::from_normalized(norm),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskflow_core::config::NormalizationMode;
    use riskflow_core::types::{EventKind, ProtocolVersion};

    const T0: i64 = 1_700_000_000;

    fn wallet(n: u8) -> WalletAddress {
        format!("0x{:040x}", n).parse().unwrap()
    }

    fn event(w: &WalletAddress, kind: EventKind, usd: f64, ts: i64) -> Event {
        Event {
            wallet: w.clone(),
            kind,
            asset: "USDC".to_string(),
            usd_value: usd,
            protocol_version: ProtocolVersion::V3,
            collateral_factor: None,
            timestamp: ts,
            is_borrower_side: false,
        }
    }

    fn engine() -> RiskEngine {
        RiskEngine::new(ScoringConfig::default()).unwrap()
    }

    /// A conservative history: low leverage, active repayment, no
    /// liquidations.
    fn safe_history(w: &WalletAddress) -> Vec<Event> {
        let mut supply = event(w, EventKind::Supply, 4000.0, T0);
        supply.collateral_factor = Some(0.85);
        let mut borrow = event(w, EventKind::Borrow, 1000.0, T0 + 1000);
        borrow.collateral_factor = Some(0.85);
        vec![
            supply,
            borrow,
            event(w, EventKind::Repay, 500.0, T0 + 2000),
            event(w, EventKind::Repay, 500.0, T0 + 3000),
        ]
    }

    /// An aggressive history: borrowing with no supply, liquidated.
    fn risky_history(w: &WalletAddress) -> Vec<Event> {
        let mut liq = event(w, EventKind::Liquidation, 500.0, T0 + 2000);
        liq.is_borrower_side = true;
        vec![event(w, EventKind::Borrow, 1000.0, T0), liq]
    }

    #[test]
    fn batch_ranks_safe_above_risky() {
        let (safe, risky) = (wallet(1), wallet(2));
        let mut histories = BTreeMap::new();
        histories.insert(safe.clone(), safe_history(&safe));
        histories.insert(risky.clone(), risky_history(&risky));

        let outcome = engine().score_batch(&histories, T0 + 4000);
        assert!(outcome.failures.is_empty());
        let safe_score = outcome.reports[&safe].result.normalized_score;
        let risky_score = outcome.reports[&risky].result.normalized_score;
        assert!(safe_score > risky_score);
        // Two-wallet batch: extremes of the scale.
        assert_eq!(safe_score, 1000);
        assert_eq!(risky_score, 0);
    }

    #[test]
    fn empty_history_fails_without_sinking_the_batch() {
        let (good, empty) = (wallet(1), wallet(2));
        let mut histories = BTreeMap::new();
        histories.insert(good.clone(), safe_history(&good));
        histories.insert(empty.clone(), Vec::new());

        let outcome = engine().score_batch(&histories, T0 + 4000);
        assert_eq!(outcome.reports.len(), 1);
        assert!(outcome.reports.contains_key(&good));
        assert!(matches!(
            outcome.failures[&empty],
            ExtractError::InsufficientData { .. }
        ));
    }

    #[test]
    fn failed_wallets_do_not_affect_normalization() {
        let (a, b, bad) = (wallet(1), wallet(2), wallet(3));
        let mut histories = BTreeMap::new();
        histories.insert(a.clone(), safe_history(&a));
        histories.insert(b.clone(), risky_history(&b));

        let baseline = engine().score_batch(&histories, T0 + 4000);

        histories.insert(bad.clone(), vec![event(&bad, EventKind::Supply, -5.0, T0)]);
        let with_failure = engine().score_batch(&histories, T0 + 4000);

        assert_eq!(
            baseline.reports[&a].result.normalized_score,
            with_failure.reports[&a].result.normalized_score
        );
        assert!(with_failure.failures.contains_key(&bad));
    }

    #[test]
    fn empty_batch_yields_empty_outcome() {
        let outcome = engine().score_batch(&BTreeMap::new(), T0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn single_wallet_batch_relative_scores_500() {
        let w = wallet(1);
        let report = engine().score_wallet(&w, &safe_history(&w), T0 + 4000).unwrap();
        assert_eq!(report.result.normalized_score, 500);
        assert_eq!(report.result.category, RiskCategory::Moderate);
    }

    #[test]
    fn single_wallet_fixed_reference_is_meaningful() {
        let config = ScoringConfig {
            normalization: NormalizationMode::FixedReference {
                min: 400.0,
                max: 600.0,
            },
            ..ScoringConfig::default()
        };
        let eng = RiskEngine::new(config).unwrap();
        let w = wallet(1);
        let report = eng.score_wallet(&w, &safe_history(&w), T0 + 4000).unwrap();
        // Raw 577.5 against [400, 600] → 887.5 → 888.
        assert!((report.result.raw_score - 577.5).abs() < 1e-9);
        assert_eq!(report.result.normalized_score, 888);
        assert_eq!(report.result.category, RiskCategory::VeryLow);
    }

    #[test]
    fn identical_histories_share_a_degenerate_batch() {
        let mut histories = BTreeMap::new();
        for n in 1..=3 {
            let w = wallet(n);
            histories.insert(w.clone(), safe_history(&w));
        }
        let outcome = engine().score_batch(&histories, T0 + 4000);
        for report in outcome.reports.values() {
            assert_eq!(report.result.normalized_score, 500);
        }
    }

    #[test]
    fn batch_is_deterministic() {
        let mut histories = BTreeMap::new();
        for n in 1..=4 {
            let w = wallet(n);
            let h = if n % 2 == 0 {
                safe_history(&w)
            } else {
                risky_history(&w)
            };
            histories.insert(w, h);
        }
        let first = engine().score_batch(&histories, T0 + 4000);
        let second = engine().score_batch(&histories, T0 + 4000);
        for (wallet, report) in &first.reports {
            assert_eq!(report, &second.reports[wallet]);
        }
    }

    #[test]
    fn report_carries_features_and_components() {
        let w = wallet(1);
        let report = engine().score_wallet(&w, &safe_history(&w), T0 + 4000).unwrap();
        assert_eq!(report.features.borrow_supply_ratio, 0.25);
        assert_eq!(report.components.borrow_supply_ratio, 100);
        assert_eq!(report.result.wallet, w);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = ScoringConfig {
            normalization: NormalizationMode::FixedReference {
                min: 600.0,
                max: 400.0,
            },
            ..ScoringConfig::default()
        };
        assert!(RiskEngine::new(config).is_err());
    }
}
