//! Core scoring types: events, feature vectors, component scores, results.
//!
//! All USD values are floating-point amounts as reported by the collector.
//! Timestamps are Unix seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::WalletAddress;

/// Canonical lending-protocol interaction kinds.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Collateral supplied to a market.
    Supply,
    /// Funds borrowed against collateral.
    Borrow,
    /// Borrowed funds repaid.
    Repay,
    /// Supplied collateral withdrawn.
    Withdraw,
    /// Position liquidated (see [`Event::is_borrower_side`]).
    Liquidation,
}

/// Compound protocol generation an event belongs to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    V2,
    V3,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V2 => write!(f, "v2"),
            ProtocolVersion::V3 => write!(f, "v3"),
        }
    }
}

/// A normalized wallet interaction with a lending market.
///
/// Produced by the collector; consumed by the feature extractor. The
/// collector guarantees per-wallet chronological order (non-decreasing
/// timestamps) and that only protocol-relevant events are included.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    /// Wallet this event belongs to.
    pub wallet: WalletAddress,
    /// Interaction kind.
    pub kind: EventKind,
    /// Asset symbol (e.g. "USDC", "WBTC").
    pub asset: String,
    /// USD value of the interaction. Must be non-negative and finite.
    pub usd_value: f64,
    /// Protocol generation the market belongs to.
    pub protocol_version: ProtocolVersion,
    /// Collateral factor of the asset, in `[0, 1]`. Defined only for
    /// supply/borrow-relevant events; `None` otherwise.
    pub collateral_factor: Option<f64>,
    /// Unix timestamp (seconds) of the interaction.
    pub timestamp: i64,
    /// For [`EventKind::Liquidation`]: `true` when this wallet was the
    /// liquidated borrower (as opposed to the liquidator). Always `false`
    /// for other kinds.
    pub is_borrower_side: bool,
}

/// The seven risk indicators, in canonical weight order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    BorrowSupplyRatio = 0,
    LiquidationCount = 1,
    InactivityDays = 2,
    RepaymentsPerMonth = 3,
    VolatileAssetPct = 4,
    ProtocolVersion = 5,
    CollateralFactor = 6,
}

impl Indicator {
    /// All indicators in canonical order (matches the weight array layout).
    pub const ALL: [Indicator; 7] = [
        Indicator::BorrowSupplyRatio,
        Indicator::LiquidationCount,
        Indicator::InactivityDays,
        Indicator::RepaymentsPerMonth,
        Indicator::VolatileAssetPct,
        Indicator::ProtocolVersion,
        Indicator::CollateralFactor,
    ];

    /// Stable snake_case name, used in reports and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::BorrowSupplyRatio => "borrow_supply_ratio",
            Indicator::LiquidationCount => "liquidation_count",
            Indicator::InactivityDays => "inactivity_days",
            Indicator::RepaymentsPerMonth => "repayments_per_month",
            Indicator::VolatileAssetPct => "volatile_asset_pct",
            Indicator::ProtocolVersion => "protocol_version",
            Indicator::CollateralFactor => "collateral_factor",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-wallet risk indicators derived from an event history.
///
/// Immutable once computed; recomputed in full whenever the underlying
/// event set changes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    /// Total USD borrowed / total USD supplied. May exceed 1; wallets that
    /// borrowed without supplying get a finite sentinel
    /// ([`crate::constants::ZERO_SUPPLY_RATIO_SENTINEL`]).
    pub borrow_supply_ratio: f64,
    /// Liquidations where this wallet was the borrower.
    pub liquidation_count: u32,
    /// Whole days since the latest event.
    pub inactivity_days: u64,
    /// Repay events per active month (months rounded up, minimum 1).
    pub repayments_per_month: f64,
    /// Fraction of events touching a configured volatile asset, in `[0, 1]`.
    pub volatile_asset_pct: f64,
    /// Protocol version used by the majority of events; ties resolve to V3.
    pub dominant_protocol_version: ProtocolVersion,
    /// Mean collateral factor over events that define one; 0 if none do.
    pub avg_collateral_factor: f64,
}

/// Bounded per-indicator contributions to the raw score.
///
/// Each value lies in `[-100, 100]`. Output of the component scorer;
/// input to the aggregator.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentScores {
    pub borrow_supply_ratio: i16,
    pub liquidation_count: i16,
    pub inactivity_days: i16,
    pub repayments_per_month: i16,
    pub volatile_asset_pct: i16,
    pub protocol_version: i16,
    pub collateral_factor: i16,
}

impl ComponentScores {
    /// Component score for a single indicator.
    pub fn get(&self, indicator: Indicator) -> i16 {
        match indicator {
            Indicator::BorrowSupplyRatio => self.borrow_supply_ratio,
            Indicator::LiquidationCount => self.liquidation_count,
            Indicator::InactivityDays => self.inactivity_days,
            Indicator::RepaymentsPerMonth => self.repayments_per_month,
            Indicator::VolatileAssetPct => self.volatile_asset_pct,
            Indicator::ProtocolVersion => self.protocol_version,
            Indicator::CollateralFactor => self.collateral_factor,
        }
    }

    /// Iterate `(indicator, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, i16)> + '_ {
        Indicator::ALL.into_iter().map(|i| (i, self.get(i)))
    }
}

/// Risk band assigned to a normalized score.
///
/// Bands partition `[0, 1000]` exactly: 800–1000 very low, 600–799 low,
/// 400–599 moderate, 200–399 high, 0–199 very high. Higher scores mean
/// lower risk.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskCategory {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskCategory {
    /// Category for a normalized score. Scores above 1000 are treated as
    /// 1000 (the bands are total over `u16`).
    pub fn from_normalized(score: u16) -> Self {
        match score {
            800.. => RiskCategory::VeryLow,
            600..=799 => RiskCategory::Low,
            400..=599 => RiskCategory::Moderate,
            200..=399 => RiskCategory::High,
            0..=199 => RiskCategory::VeryHigh,
        }
    }

    /// Human-readable label, matching the published report format.
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::VeryLow => "Very Low Risk",
            RiskCategory::Low => "Low Risk",
            RiskCategory::Moderate => "Moderate Risk",
            RiskCategory::High => "High Risk",
            RiskCategory::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final scoring output for one wallet within one batch run.
///
/// `normalized_score` is batch-relative under the default normalization
/// mode: it ranks the wallet within the current cohort and can change when
/// the co-batch changes. `raw_score` is kept for report detail.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreResult {
    pub wallet: WalletAddress,
    /// Pre-normalization weighted score, in `[400, 600]`.
    pub raw_score: f64,
    /// Published score in `[0, 1000]`.
    pub normalized_score: u16,
    pub category: RiskCategory,
}
