//! Etherscan-backed event collector.
//!
//! Fetches `getLogs` for every registered market, keeps logs that mention
//! the wallet in an indexed topic, and decodes them into normalized
//! events. Requests are paced to stay inside the free-tier rate limit.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use riskflow_core::error::CollectError;
use riskflow_core::traits::EventSource;
use riskflow_core::types::Event;
use riskflow_core::WalletAddress;

use crate::markets::{collateral_factor, estimated_usd_value, MarketRegistry, TopicRegistry};

const DEFAULT_BASE_URL: &str = "https://api.etherscan.io/api";

/// Etherscan free tier allows 5 requests per second.
const DEFAULT_PACE: Duration = Duration::from_millis(200);

#[derive(Clone, Debug)]
pub struct EtherscanConfig {
    pub api_key: String,
    pub base_url: String,
    /// Earliest block to scan.
    pub start_block: u64,
    /// Delay between consecutive API requests.
    pub request_pace: Duration,
}

impl EtherscanConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        EtherscanConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            start_block: 0,
            request_pace: DEFAULT_PACE,
        }
    }
}

pub struct EtherscanCollector {
    http: reqwest::Client,
    config: EtherscanConfig,
    markets: MarketRegistry,
    topics: TopicRegistry,
}

/// Top-level Etherscan envelope. `status` is "1" on success, "0" both for
/// errors and for empty result sets.
#[derive(Deserialize, Debug)]
struct LogsResponse {
    status: String,
    message: String,
    #[serde(default)]
    result: Vec<LogEntry>,
}

#[derive(Deserialize, Debug)]
struct LogEntry {
    topics: Vec<String>,
    #[serde(rename = "timeStamp")]
    time_stamp: String,
}

impl EtherscanCollector {
    pub fn new(config: EtherscanConfig) -> Self {
        EtherscanCollector {
            http: reqwest::Client::new(),
            config,
            markets: MarketRegistry::default(),
            topics: TopicRegistry::compound_defaults(),
        }
    }

    /// Override the market and topic registries, for non-mainnet
    /// deployments and tests against a stub server.
    pub fn with_registries(mut self, markets: MarketRegistry, topics: TopicRegistry) -> Self {
        self.markets = markets;
        self.topics = topics;
        self
    }

    async fn fetch_market_logs(&self, market_address: &str) -> Result<Vec<LogEntry>, CollectError> {
        let from_block = self.config.start_block.to_string();
        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[
                ("module", "logs"),
                ("action", "getLogs"),
                ("address", market_address),
                ("fromBlock", from_block.as_str()),
                ("toBlock", "latest"),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CollectError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Transport(format!(
                "etherscan returned HTTP {status}"
            )));
        }

        let body: LogsResponse = response
            .json()
            .await
            .map_err(|e| CollectError::MalformedResponse(e.to_string()))?;

        // "No records found" comes back as status 0 with an empty result.
        if body.status != "1" {
            debug!(message = body.message, "no logs for market");
            return Ok(Vec::new());
        }
        Ok(body.result)
    }

    fn decode_log(
        &self,
        wallet: &WalletAddress,
        market_address: &str,
        log: &LogEntry,
    ) -> Option<Event> {
        let market = self.markets.by_address(market_address)?;
        let decode = self.topics.decode(log.topics.first()?)?;

        // Indexed addresses are left-padded to 32 bytes in topics.
        let padded = format!("0x{:0>64}", &wallet.as_str()[2..]);
        let topic_index = decode.wallet_topic?;
        let topic = log.topics.get(topic_index)?;
        if !topic.eq_ignore_ascii_case(&padded) {
            return None;
        }

        let timestamp = parse_hex_or_decimal(&log.time_stamp)?;
        Some(Event {
            wallet: wallet.clone(),
            kind: decode.kind,
            asset: market.asset.to_string(),
            usd_value: estimated_usd_value(decode.kind),
            protocol_version: market.version,
            collateral_factor: collateral_factor(market.asset),
            timestamp,
            is_borrower_side: decode.borrower_side,
        })
    }
}

/// Etherscan reports timestamps as hex (`0x...`) from `getLogs` but plain
/// decimal from other endpoints; accept both.
fn parse_hex_or_decimal(s: &str) -> Option<i64> {
    if let Some(hex) = s.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

#[async_trait]
impl EventSource for EtherscanCollector {
    async fn events_for_wallet(&self, wallet: &WalletAddress) -> Result<Vec<Event>, CollectError> {
        let mut events = Vec::new();
        for market in self.markets.markets() {
            match self.fetch_market_logs(market.address).await {
                Ok(logs) => {
                    let before = events.len();
                    events.extend(
                        logs.iter()
                            .filter_map(|log| self.decode_log(wallet, market.address, log)),
                    );
                    debug!(
                        market = market.asset,
                        version = %market.version,
                        matched = events.len() - before,
                        "scanned market logs"
                    );
                }
                Err(CollectError::Transport(reason)) => {
                    // A single unreachable market should not zero out the
                    // wallet's history from the other markets.
                    warn!(market = market.asset, %reason, "skipping market");
                }
                Err(other) => return Err(other),
            }
            sleep(self.config.request_pace).await;
        }
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }
}
