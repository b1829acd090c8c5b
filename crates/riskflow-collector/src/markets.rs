//! Static registry of Compound V2/V3 markets and decoding metadata.
//!
//! Mainnet market addresses, per-asset collateral factors, flat USD value
//! estimates per event kind, and the topic0 → event kind mapping used to
//! decode raw logs. On-chain amounts and live price feeds are out of
//! scope: USD values are flat estimates per event kind, which is enough
//! for the ratio-based indicators downstream.

use std::collections::HashMap;

use riskflow_core::types::{EventKind, ProtocolVersion};

/// One listed market.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Market {
    /// Underlying asset symbol, uppercase ("DAI", "WBTC").
    pub asset: &'static str,
    /// Market contract address, lowercase hex.
    pub address: &'static str,
    pub version: ProtocolVersion,
}

/// All markets the collectors watch.
#[derive(Clone, Debug)]
pub struct MarketRegistry {
    markets: Vec<Market>,
}

impl Default for MarketRegistry {
    fn default() -> Self {
        MarketRegistry {
            markets: mainnet_markets(),
        }
    }
}

impl MarketRegistry {
    pub fn new(markets: Vec<Market>) -> Self {
        MarketRegistry { markets }
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Look up a market by its contract address (case-insensitive).
    pub fn by_address(&self, address: &str) -> Option<&Market> {
        let needle = address.to_ascii_lowercase();
        self.markets.iter().find(|m| m.address == needle)
    }
}

/// Compound mainnet markets: the V2 cToken set plus the V3 Comets.
fn mainnet_markets() -> Vec<Market> {
    use ProtocolVersion::{V2, V3};
    let listings: [(&'static str, &'static str, ProtocolVersion); 18] = [
        ("DAI", "0x5d3a536e4d6dbd6114cc1ead35777bab948e3643", V2),
        ("USDC", "0x39aa39c021dfbae8fac545936693ac917d5e7563", V2),
        ("ETH", "0x4ddc2d193948926d02f9b1fe9e1daa0718270ed5", V2),
        ("WBTC", "0xc11b1268c1a384e55c48c2391d8d480264a3a7f4", V2),
        ("USDT", "0xf650c3d88d12db855b8bf7d11be6c55a4e07dcc9", V2),
        ("COMP", "0x70e36f6bf80a52b3b46b3af8e106cc0ed743e8e4", V2),
        ("UNI", "0x35a18000230da775cac24873d00ff85bccded550", V2),
        ("LINK", "0xface851a4921ce59e912d19329929ce6da6eb0c7", V2),
        ("MKR", "0x95b4ef2869ebd94beb4eee400a97824af4f4ab1c", V2),
        ("YFI", "0x80a2ae356fc9ef4305676f7a3e2ed04e12c33946", V2),
        ("BAT", "0x6c8c6b02e7b2be14d4fa6022dfd6d75921d90e4e", V2),
        ("ZRX", "0xb3319f5d18bc0d84dd1b4825dcde5d5f7266d407", V2),
        ("AAVE", "0xe65cdb6479bac1e22340e4e755fae7e509ecd06c", V2),
        ("SUSHI", "0x4b0181102a0112a2ef11abee5563bb4a3176c9d7", V2),
        ("USDC", "0xc3d688b66703497daa19211eedff47f25384cdc3", V3),
        ("WETH", "0xa17581a9e3356d9a858b789d68b4d7ed7d5b8a6a", V3),
        ("WBTC", "0xccf4429db6322d5c611ee964527d42e5d685dd6a", V3),
        ("LINK", "0x9c4ec768c28520b50860ea7a15bd7213a9ff58bf", V3),
    ];
    listings
        .into_iter()
        .map(|(asset, address, version)| Market {
            asset,
            address,
            version,
        })
        .collect()
}

/// Per-asset collateral factors attached to supply and borrow events.
///
/// Stablecoins carry high factors, volatile long-tail assets low ones.
/// Returns `None` for assets without a configured factor.
pub fn collateral_factor(asset: &str) -> Option<f64> {
    let cf = match asset.to_ascii_uppercase().as_str() {
        "USDC" => 0.85,
        "USDT" => 0.80,
        "DAI" => 0.85,
        "ETH" | "WETH" => 0.75,
        "WBTC" => 0.70,
        "LINK" => 0.65,
        "UNI" => 0.60,
        "MKR" => 0.55,
        "YFI" => 0.50,
        "AAVE" => 0.55,
        "SUSHI" => 0.50,
        _ => return None,
    };
    Some(cf)
}

/// Flat USD value estimate per event kind.
///
/// Supply-side interactions are assumed larger than borrow-side ones.
pub fn estimated_usd_value(kind: EventKind) -> f64 {
    match kind {
        EventKind::Supply | EventKind::Withdraw => 1000.0,
        EventKind::Borrow | EventKind::Repay | EventKind::Liquidation => 500.0,
    }
}

/// How to decode one log signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopicDecode {
    pub kind: EventKind,
    /// Index into `topics` holding the borrower/supplier address, or
    /// `None` when the wallet only appears in the log data.
    pub wallet_topic: Option<usize>,
    /// Whether a matched wallet was the liquidated borrower.
    pub borrower_side: bool,
}

/// Maps `topic0` (the keccak hash of the event signature, lowercase hex
/// with 0x prefix) to decoding metadata.
///
/// The mapping is plain data so tests and alternative deployments can
/// inject their own signatures.
#[derive(Clone, Debug, Default)]
pub struct TopicRegistry {
    topics: HashMap<String, TopicDecode>,
}

impl TopicRegistry {
    pub fn insert(&mut self, topic0: &str, decode: TopicDecode) {
        self.topics.insert(topic0.to_ascii_lowercase(), decode);
    }

    pub fn decode(&self, topic0: &str) -> Option<TopicDecode> {
        self.topics.get(&topic0.to_ascii_lowercase()).copied()
    }

    /// The Compound V2 cToken and V3 Comet event signatures.
    pub fn compound_defaults() -> Self {
        let mut registry = TopicRegistry::default();
        // V2: Mint(minter, mintAmount, mintTokens)
        registry.insert(
            "0x4c209b5fc8ad50758f13e2e1088ba56a560dff690a1c6fef26394f4c03821c4f",
            TopicDecode { kind: EventKind::Supply, wallet_topic: Some(1), borrower_side: false },
        );
        // V2: Redeem(redeemer, redeemAmount, redeemTokens)
        registry.insert(
            "0xe5b754fb1abb7f01b499791d0b820ae3b6af3424ac1c59768edb53f4ec31a929",
            TopicDecode { kind: EventKind::Withdraw, wallet_topic: Some(1), borrower_side: false },
        );
        // V2: Borrow(borrower, borrowAmount, accountBorrows, totalBorrows)
        registry.insert(
            "0x13ed6866d4e1ee6da46f845c46d7e54120883d75c5ea9a2dacc1c4ca8984ab80",
            TopicDecode { kind: EventKind::Borrow, wallet_topic: Some(1), borrower_side: false },
        );
        // V2: RepayBorrow(payer, borrower, repayAmount, accountBorrows)
        registry.insert(
            "0x1a2a22cb034d26d1854bdc6666a5b91fe25efbbb5dcad3b0355478d6f5c362a1",
            TopicDecode { kind: EventKind::Repay, wallet_topic: Some(2), borrower_side: false },
        );
        // V2: LiquidateBorrow(liquidator, borrower, repayAmount, cTokenCollateral, seizeTokens)
        registry.insert(
            "0x298637f684da70674f26509b10f07ec2fbc77a335ab1e7d6215a4b2484d8bb52",
            TopicDecode { kind: EventKind::Liquidation, wallet_topic: Some(2), borrower_side: true },
        );
        // V3: Supply(from, dst, amount)
        registry.insert(
            "0xd1cf3d156d5f8f0d50f6c122ed609cec09d35c9b9fb3fff6ea0959134dae424e",
            TopicDecode { kind: EventKind::Supply, wallet_topic: Some(2), borrower_side: false },
        );
        // V3: Withdraw(src, to, amount)
        registry.insert(
            "0x9b1bfa7fa9ee420a16e124f794c35ac9f90472acc99140eb2f6447c714cad8eb",
            TopicDecode { kind: EventKind::Withdraw, wallet_topic: Some(1), borrower_side: false },
        );
        // V3: AbsorbDebt(absorber, borrower, basePaidOut, usdValue)
        registry.insert(
            "0x9850ab1af75177e4a9201c65a2cf7976d5d28e40ef63494b44366f86b2f9412e",
            TopicDecode { kind: EventKind::Liquidation, wallet_topic: Some(2), borrower_side: true },
        );
        registry
    }
}
