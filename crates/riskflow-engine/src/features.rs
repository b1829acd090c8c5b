//! Feature extraction: event history in, seven indicators out.
//!
//! Extraction is a full recomputation over the wallet's events every time;
//! there is no incremental state to drift. Events are validated at
//! ingestion and the whole wallet is rejected on the first malformed one.

use tracing::debug;

use riskflow_core::constants::{SECS_PER_DAY, SECS_PER_MONTH, ZERO_SUPPLY_RATIO_SENTINEL};
use riskflow_core::error::{EventError, ExtractError};
use riskflow_core::types::{Event, EventKind, FeatureVector, ProtocolVersion};
use riskflow_core::{ScoringConfig, WalletAddress};

/// Derives a [`FeatureVector`] from a wallet's chronological event history.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    config: ScoringConfig,
}

impl FeatureExtractor {
    pub fn new(config: ScoringConfig) -> Self {
        FeatureExtractor { config }
    }

    /// Extract the seven indicators for one wallet.
    ///
    /// `now` is the reference timestamp (Unix seconds) for the inactivity
    /// indicator, passed explicitly so batch runs are reproducible.
    ///
    /// Fails with [`ExtractError::InsufficientData`] on an empty history
    /// and [`ExtractError::InvalidEvent`] on the first malformed event.
    pub fn extract(
        &self,
        wallet: &WalletAddress,
        events: &[Event],
        now: i64,
    ) -> Result<FeatureVector, ExtractError> {
        if events.is_empty() {
            return Err(ExtractError::InsufficientData {
                wallet: wallet.clone(),
            });
        }
        validate_events(events)?;

        let mut supplied_usd = 0.0_f64;
        let mut borrowed_usd = 0.0_f64;
        let mut liquidation_count = 0_u32;
        let mut repay_count = 0_u32;
        let mut volatile_events = 0_usize;
        let mut v2_events = 0_usize;
        let mut v3_events = 0_usize;
        let mut cf_sum = 0.0_f64;
        let mut cf_count = 0_usize;

        for event in events {
            match event.kind {
                EventKind::Supply => supplied_usd += event.usd_value,
                EventKind::Borrow => borrowed_usd += event.usd_value,
                EventKind::Repay => repay_count += 1,
                EventKind::Withdraw => {}
                EventKind::Liquidation => {
                    if event.is_borrower_side {
                        liquidation_count += 1;
                    }
                }
            }
            if self.config.is_volatile(&event.asset) {
                volatile_events += 1;
            }
            match event.protocol_version {
                ProtocolVersion::V2 => v2_events += 1,
                ProtocolVersion::V3 => v3_events += 1,
            }
            if let Some(cf) = event.collateral_factor {
                cf_sum += cf;
                cf_count += 1;
            }
        }

        let borrow_supply_ratio = if supplied_usd > 0.0 {
            borrowed_usd / supplied_usd
        } else if borrowed_usd > 0.0 {
            // Borrowing with no observed supply is the riskiest shape the
            // ratio can take; a finite sentinel keeps it orderable.
            ZERO_SUPPLY_RATIO_SENTINEL
        } else {
            0.0
        };

        // Validation guarantees non-decreasing timestamps, so first/last
        // bracket the active span.
        let first_ts = events[0].timestamp;
        let last_ts = events[events.len() - 1].timestamp;

        let inactivity_days = ((now - last_ts).max(0) / SECS_PER_DAY) as u64;

        // span >= 0 by validation; ceiling division without i64::div_ceil.
        let span = last_ts - first_ts;
        let active_months = ((span + SECS_PER_MONTH - 1) / SECS_PER_MONTH).max(1);
        let repayments_per_month = f64::from(repay_count) / active_months as f64;

        let volatile_asset_pct = volatile_events as f64 / events.len() as f64;

        // Ties go to V3: absent a majority the newer protocol is assumed.
        let dominant_protocol_version = if v3_events >= v2_events {
            ProtocolVersion::V3
        } else {
            ProtocolVersion::V2
        };

        let avg_collateral_factor = if cf_count > 0 {
            cf_sum / cf_count as f64
        } else {
            0.0
        };

        debug!(
            wallet = %wallet.short(),
            events = events.len(),
            ratio = borrow_supply_ratio,
            liquidations = liquidation_count,
            "extracted features"
        );

        Ok(FeatureVector {
            borrow_supply_ratio,
            liquidation_count,
            inactivity_days,
            repayments_per_month,
            volatile_asset_pct,
            dominant_protocol_version,
            avg_collateral_factor,
        })
    }
}

/// Reject malformed events before any arithmetic sees them.
fn validate_events(events: &[Event]) -> Result<(), ExtractError> {
    let mut previous_ts: Option<i64> = None;
    for (index, event) in events.iter().enumerate() {
        if !event.usd_value.is_finite() || event.usd_value < 0.0 {
            return Err(ExtractError::InvalidEvent {
                index,
                source: EventError::InvalidUsdValue(event.usd_value),
            });
        }
        if let Some(cf) = event.collateral_factor {
            if !cf.is_finite() || !(0.0..=1.0).contains(&cf) {
                return Err(ExtractError::InvalidEvent {
                    index,
                    source: EventError::CollateralFactorOutOfRange(cf),
                });
            }
        }
        if let Some(prev) = previous_ts {
            if event.timestamp < prev {
                return Err(ExtractError::InvalidEvent {
                    index,
                    source: EventError::TimestampRegression {
                        got: event.timestamp,
                        previous: prev,
                    },
                });
            }
        }
        previous_ts = Some(event.timestamp);
    }
    Ok(())
}
