//! Error types for the Riskflow pipeline.
//!
//! All scoring-side failures are local, synchronous validation errors; the
//! core never retries. Retry and rate-limit behavior belong to the
//! network-facing collector.

use thiserror::Error;

use crate::address::WalletAddress;
use crate::types::Indicator;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing 0x prefix")] MissingPrefix,
    #[error("expected 40 hex characters, got {0}")] InvalidLength(usize),
    #[error("invalid character: {0}")] InvalidCharacter(char),
}

/// A single malformed event, rejected at ingestion into the feature
/// extractor rather than silently coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("usd_value must be non-negative and finite, got {0}")] InvalidUsdValue(f64),
    #[error("collateral_factor must be in [0, 1], got {0}")] CollateralFactorOutOfRange(f64),
    #[error("timestamp {got} precedes previous event at {previous}")] TimestampRegression { got: i64, previous: i64 },
}

/// Feature extraction failures for one wallet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The wallet has no events at all; there is no valid score without at
    /// least one observed interaction.
    #[error("no events observed for wallet {wallet}")]
    InsufficientData { wallet: WalletAddress },

    /// An event failed validation. Carries the offending event index.
    #[error("invalid event at index {index}: {source}")]
    InvalidEvent { index: usize, source: EventError },
}

/// Invalid scoring configuration, rejected at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("weight for {indicator} must be in [0, 1], got {weight}")]
    WeightOutOfRange { indicator: Indicator, weight: f64 },

    #[error("missing weight for {0}")]
    MissingWeight(Indicator),

    #[error("weights must sum to 1.0 within tolerance, got {sum}")]
    WeightSumMismatch { sum: f64 },

    #[error("bucket table for {0} is empty")]
    EmptyBucketTable(Indicator),

    #[error("bucket bounds for {indicator} not strictly increasing at entry {entry}")]
    UnsortedBucketTable { indicator: Indicator, entry: usize },

    #[error("bucket score {score} outside [-100, 100] for {indicator}")]
    BucketScoreOutOfRange { indicator: Indicator, score: i16 },

    #[error("fixed reference range requires min < max, got [{min}, {max}]")]
    InvalidReferenceRange { min: f64, max: f64 },
}

/// Collector-side failures: transport, payload shape, wallet lists.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("transport: {0}")] Transport(String),
    #[error("malformed response: {0}")] MalformedResponse(String),
    #[error("wallet list: {0}")] WalletList(String),
    #[error("io: {0}")] Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RiskError {
    #[error(transparent)] Address(#[from] AddressError),
    #[error(transparent)] Extract(#[from] ExtractError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Collect(#[from] CollectError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_error_names_the_wallet() {
        let wallet: WalletAddress = "0xfaa0768bde629806739c3a4620656c5d26f44ef2"
            .parse()
            .unwrap();
        let err = ExtractError::InsufficientData { wallet };
        assert!(err.to_string().contains("0xfaa0768b"));
    }

    #[test]
    fn invalid_event_carries_index_and_cause() {
        let err = ExtractError::InvalidEvent {
            index: 3,
            source: EventError::InvalidUsdValue(-1.0),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 3"), "{msg}");
        assert!(msg.contains("-1"), "{msg}");
    }

    #[test]
    fn config_error_mentions_indicator() {
        let err = ConfigError::MissingWeight(Indicator::LiquidationCount);
        assert!(err.to_string().contains("liquidation_count"));
    }

    #[test]
    fn risk_error_wraps_all_domains() {
        let e: RiskError = ExtractError::InsufficientData {
            wallet: "0x1111111111111111111111111111111111111111".parse().unwrap(),
        }
        .into();
        assert!(matches!(e, RiskError::Extract(_)));

        let e: RiskError = ConfigError::WeightSumMismatch { sum: 0.5 }.into();
        assert!(matches!(e, RiskError::Config(_)));
    }
}
