//! Wallet list loading.
//!
//! Wallet cohorts arrive as CSV exports with addresses in the first
//! column. Header rows and malformed entries are skipped with a warning
//! rather than failing the run; duplicates collapse to the first
//! occurrence so batch order stays stable.

use std::fs;
use std::path::Path;
use tracing::warn;

use riskflow_core::error::CollectError;
use riskflow_core::WalletAddress;

/// Load wallet addresses from the first column of a CSV (or plain
/// line-per-address) file.
///
/// Fails only when the file cannot be read or contains no valid address
/// at all.
pub fn load_wallet_file(path: &Path) -> Result<Vec<WalletAddress>, CollectError> {
    let contents = fs::read_to_string(path)?;
    let wallets = parse_wallet_list(&contents);
    if wallets.is_empty() {
        return Err(CollectError::WalletList(format!(
            "no valid wallet addresses in {}",
            path.display()
        )));
    }
    Ok(wallets)
}

fn parse_wallet_list(contents: &str) -> Vec<WalletAddress> {
    let mut wallets = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let first_field = line.split(',').next().unwrap_or("").trim();
        if first_field.is_empty() {
            continue;
        }
        match first_field.parse::<WalletAddress>() {
            Ok(wallet) => {
                if !wallets.contains(&wallet) {
                    wallets.push(wallet);
                }
            }
            Err(err) => {
                // Header rows land here too; only worth a warning.
                warn!(line = line_no + 1, value = first_field, %err, "skipping entry");
            }
        }
    }
    wallets
}

/// Built-in demo cohort, used when no wallet file is given.
pub fn sample_wallets() -> Vec<WalletAddress> {
    [
        "0xfaa0768bde629806739c3a4620656c5d26f44ef2",
        "0x742d35cc6634c0532925a3b8d4c9db96c4b4d8b6",
        "0x1234567890123456789012345678901234567890",
        "0x8ba1f109551bd432803012645ac136ddd64dba72",
        "0xab5801a7d398351b8be11c439e05c5b3259aec9b",
    ]
    .iter()
    .map(|s| s.parse().ok())
    .collect::<Option<Vec<_>>>()
    .unwrap_or_default()
}
