//! # riskflow-engine — Wallet risk scoring engine.
//!
//! Turns per-wallet lending event histories into published risk scores in
//! three pure stages:
//! - **Feature extraction**: seven behavioral indicators from the raw
//!   events (borrow/supply ratio, liquidations, inactivity, repayment
//!   frequency, volatile-asset usage, protocol version, collateral factor).
//! - **Component scoring**: each indicator maps through a bucket table to
//!   a bounded score in `[-100, 100]`.
//! - **Aggregation**: weighted sum around a 500 base gives a raw score in
//!   `[400, 600]`, then batch normalization maps the cohort onto
//!   `[0, 1000]` and assigns risk categories.
//!
//! All stages are deterministic; the same events, configuration, and
//! co-batch always produce the same scores.

pub mod aggregate;
pub mod features;
pub mod pipeline;
pub mod scorer;

pub use aggregate::Aggregator;
pub use features::FeatureExtractor;
pub use pipeline::{BatchOutcome, RiskEngine, WalletReport};
pub use scorer::ComponentScorer;
