//! Event and wallet builders shared by the integration tests.

use riskflow_core::types::{Event, EventKind, ProtocolVersion};
use riskflow_core::WalletAddress;

/// Batch reference timestamp used across the suite.
pub const T0: i64 = 1_700_000_000;

/// Deterministic wallet address from a seed byte.
pub fn wallet(n: u8) -> WalletAddress {
    format!("0x{:040x}", n).parse().expect("valid test address")
}

/// Base event: V3 USDC, no collateral factor, supplier side.
pub fn event(w: &WalletAddress, kind: EventKind, usd: f64, ts: i64) -> Event {
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

pub fn supply(w: &WalletAddress, usd: f64, ts: i64) -> Event {
    let mut e = event(w, EventKind::Supply, usd, ts);
    e.collateral_factor = Some(0.85);
    e
}

pub fn borrow(w: &WalletAddress, usd: f64, ts: i64) -> Event {
    let mut e = event(w, EventKind::Borrow, usd, ts);
    e.collateral_factor = Some(0.85);
    e
}

pub fn repay(w: &WalletAddress, usd: f64, ts: i64) -> Event {
    event(w, EventKind::Repay, usd, ts)
}

pub fn withdraw(w: &WalletAddress, usd: f64, ts: i64) -> Event {
    event(w, EventKind::Withdraw, usd, ts)
}

/// Liquidation where `w` was the liquidated borrower.
pub fn liquidation(w: &WalletAddress, usd: f64, ts: i64) -> Event {
    let mut e = event(w, EventKind::Liquidation, usd, ts);
    e.is_borrower_side = true;
    e
}

/// Switch an event to a V2 market.
pub fn on_v2(mut e: Event) -> Event {
    e.protocol_version = ProtocolVersion::V2;
    e
}

/// Switch an event's asset symbol.
pub fn in_asset(mut e: Event, asset: &str) -> Event {
    e.asset = asset.to_string();
    e
}
