//! # riskflow-collector — Event collection for the Riskflow pipeline.
//!
//! Implementations of [`riskflow_core::EventSource`]:
//! - [`EtherscanCollector`] fetches Compound V2/V3 market logs from the
//!   Etherscan API and decodes them into normalized events.
//! - [`SimulatedSource`] generates deterministic synthetic histories for
//!   demos and offline runs.
//!
//! Plus the static market registry and wallet-list loading.

pub mod etherscan;
pub mod markets;
pub mod simulated;
pub mod wallets;

pub use etherscan::{EtherscanCollector, EtherscanConfig};
pub use markets::{Market, MarketRegistry, TopicRegistry};
pub use simulated::SimulatedSource;
pub use wallets::{load_wallet_file, sample_wallets};
