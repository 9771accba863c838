//! Wallet and token identifiers.
//!
//! Both are opaque base58 strings on Solana. The only validation applied is
//! that the trimmed value is non-empty.

use crate::{CoreError, CoreResult};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn normalize(value: &str, what: &'static str) -> CoreResult<CompactString> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyIdentifier(what));
    }
    Ok(CompactString::new(trimmed))
}

/// A wallet public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(CompactString);

impl WalletAddress {
    /// Create a wallet address, rejecting empty input.
    pub fn new(value: &str) -> CoreResult<Self> {
        normalize(value, "wallet address").map(Self)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A token mint address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(CompactString);

impl TokenId {
    /// Create a token identifier, rejecting empty input.
    pub fn new(value: &str) -> CoreResult<Self> {
        normalize(value, "token identifier").map(Self)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TokenId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
