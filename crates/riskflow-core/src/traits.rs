//! Trait interfaces between crates.
//!
//! [`EventSource`] is the contract between the collectors (riskflow-collector)
//! and the scoring engine (riskflow-engine): the engine consumes per-wallet
//! event histories without knowing whether they came from Etherscan, a
//! simulator, or a test fixture.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::address::WalletAddress;
use crate::error::CollectError;
use crate::types::Event;

/// A source of lending-protocol events for wallets.
///
/// Implementations must return each wallet's events in chronological order
/// (non-decreasing timestamps). Implemented by the Etherscan and simulated
/// collectors; test suites provide fixture-backed mocks.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch all relevant events for one wallet, oldest first. A wallet
    /// with no protocol activity yields an empty vec, not an error.
    async fn events_for_wallet(&self, wallet: &WalletAddress) -> Result<Vec<Event>, CollectError>;

    /// Fetch events for a set of wallets.
    ///
    /// Default implementation fetches sequentially and fails on the first
    /// transport error. Implementations with rate limits or connection
    /// pools override this.
    async fn events_for_wallets(
        &self,
        wallets: &[WalletAddress],
    ) -> Result<BTreeMap<WalletAddress, Vec<Event>>, CollectError> {
        let mut out = BTreeMap::new();
        for wallet in wallets {
            let events = self.events_for_wallet(wallet).await?;
            out.insert(wallet.clone(), events);
        }
        Ok(out)
    }
}
