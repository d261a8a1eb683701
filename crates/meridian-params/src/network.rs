//! Meridian network definitions

use crate::asset::Asset;
use serde::{Deserialize, Serialize};

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    /// Mainnet
    Mainnet,
    /// Testnet
    Testnet,
    /// Regtest (local development)
    Regtest,
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Human-readable name
    pub name: &'static str,
    /// Ledger gateway endpoint
    pub gateway_url: &'static str,
    /// Network passphrase mixed into every transaction hash, so a
    /// transaction signed for one network can never be replayed on another
    pub passphrase: &'static str,
}

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            name: "mainnet",
            gateway_url: "https://gateway.meridian.network",
            passphrase: "Meridian Mainnet ; March 2019",
        }
    }

    /// Get testnet parameters
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            name: "testnet",
            gateway_url: "https://gateway-testnet.meridian.network",
            passphrase: "Meridian Testnet ; December 2018",
        }
    }

    /// Get regtest parameters
    pub const fn regtest() -> Self {
        Self {
            network_type: NetworkType::Regtest,
            name: "regtest",
            gateway_url: "http://127.0.0.1:8110",
            passphrase: "Meridian Regtest ; local",
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
            NetworkType::Regtest => Self::regtest(),
        }
    }
}

/// Blockchain environment a wallet client operates against: the network
/// parameters plus the asset the wallet holds and trusts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Network parameters
    pub network: Network,
    /// The wallet asset on that network
    pub asset: Asset,
}

impl Environment {
    /// Mainnet environment with the canonical wallet asset
    pub fn mainnet() -> Self {
        Self {
            network: Network::mainnet(),
            asset: Asset::mainnet(),
        }
    }

    /// Testnet environment with the canonical wallet asset
    pub fn testnet() -> Self {
        Self {
            network: Network::testnet(),
            asset: Asset::testnet(),
        }
    }

    /// Custom environment (local development, alternative issuers)
    pub fn new(network: Network, asset: Asset) -> Self {
        Self { network, asset }
    }
}
