//! # riskflow-core
//! Foundation types and traits for the Riskflow scoring pipeline.

pub mod address;
pub mod buckets;
pub mod config;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod weights;

pub use address::WalletAddress;
pub use buckets::{BucketConfig, BucketTable};
pub use config::{NormalizationMode, ScoringConfig};
pub use error::{AddressError, CollectError, ConfigError, EventError, ExtractError, RiskError};
pub use traits::EventSource;
pub use types::{
    ComponentScores, Event, EventKind, FeatureVector, Indicator, ProtocolVersion, RiskCategory,
    ScoreResult,
};
pub use weights::WeightTable;
