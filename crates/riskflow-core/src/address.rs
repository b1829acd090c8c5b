//! Ethereum wallet address handling.
//!
//! Addresses are `0x` followed by 40 hex characters. Parsing normalizes to
//! lowercase so the same wallet compares equal regardless of the checksum
//! casing it was reported with. EIP-55 checksum verification is not
//! performed; the collector treats addresses as opaque identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Number of hex characters in an address body (20 bytes).
const ADDRESS_HEX_LEN: usize = 40;

/// A validated, lowercase Ethereum wallet address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The lowercase `0x...` form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form for logs: `0xfaa0…4ef2`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl FromStr for WalletAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if body.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::InvalidLength(body.len()));
        }
        if let Some(c) = body.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidCharacter(c));
        }

        Ok(WalletAddress(format!("0x{}", body.to_ascii_lowercase())))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
