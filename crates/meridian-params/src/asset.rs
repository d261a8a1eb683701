//! Wallet asset descriptors
//!
//! An asset on the Meridian ledger is identified by its short code plus the
//! public address of the account that issues it. Accounts must explicitly
//! trust an asset (open a trust line) before they can hold it.

use serde::{Deserialize, Serialize};

/// Issuer of the canonical wallet asset on mainnet.
const MAINNET_ISSUER: &str = "mrd1rv9m6h3cwn08tlqvun0vffycvlkvjtp5ft5cr32rsrnq47s83ytq3ryjxe";

/// Issuer of the canonical wallet asset on testnet.
const TESTNET_ISSUER: &str = "mrd1m0j6e83ez9nuy4t5y9y7cst5xh58jl9np55ccywpjd2qqsmzvvfq0t9y8r";

/// An asset held on the Meridian ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    /// Short asset code (e.g. `MRD`)
    pub code: String,
    /// Public address of the issuing account
    pub issuer: String,
}

impl Asset {
    /// Create an asset descriptor
    pub fn new(code: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            issuer: issuer.into(),
        }
    }

    /// The canonical wallet asset on mainnet
    pub fn mainnet() -> Self {
        Self::new("MRD", MAINNET_ISSUER)
    }

    /// The canonical wallet asset on testnet
    pub fn testnet() -> Self {
        Self::new("MRD", TESTNET_ISSUER)
    }

    /// Check whether a code/issuer pair names this asset
    pub fn matches(&self, code: &str, issuer: &str) -> bool {
        self.code == code && self.issuer == issuer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_matching() {
        let asset = Asset::mainnet();
        assert!(asset.matches("MRD", MAINNET_ISSUER));
        assert!(!asset.matches("MRD", TESTNET_ISSUER));
        assert!(!asset.matches("USD", MAINNET_ISSUER));
    }
}
