//! Ledger account addresses
//!
//! A Meridian address is the account's 32-byte ed25519 public key, encoded
//! as Bech32 under the `mrd` HRP. The encoding is network independent: the
//! same key pair has the same address on mainnet and testnet.

use crate::{Error, Result};
use bech32::{Bech32, Hrp};
use std::fmt;
use std::str::FromStr;

/// Raw address length in bytes (an ed25519 public key)
pub const ADDRESS_RAW_LEN: usize = 32;

/// Bech32 HRP for account addresses
const ADDRESS_HRP: &str = "mrd";

/// A ledger account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_RAW_LEN]);

impl Address {
    /// Create an address from raw public key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ADDRESS_RAW_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidAddress("address must be 32 bytes".to_string()))?;
        Ok(Self(raw))
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_RAW_LEN] {
        &self.0
    }

    /// Encode as a Bech32 address string (`mrd1...`)
    pub fn encode(&self) -> String {
        let hrp = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, &self.0).expect("32-byte payload fits in bech32")
    }

    /// Decode a Bech32 address string
    pub fn decode(addr: &str) -> Result<Self> {
        let (hrp, data) = bech32::decode(addr)
            .map_err(|e| Error::InvalidAddress(format!("bech32 decode failed: {e}")))?;
        if hrp.as_str() != ADDRESS_HRP {
            return Err(Error::InvalidAddress(format!(
                "invalid address HRP '{}'",
                hrp.as_str()
            )));
        }
        Self::from_bytes(&data)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let addr = Address::from_bytes(&[7u8; 32]).unwrap();
        let encoded = addr.encode();
        assert!(encoded.starts_with("mrd1"));

        let decoded: Address = encoded.parse().unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(Address::from_bytes(&[1u8; 31]).is_err());
        assert!(Address::from_bytes(&[1u8; 33]).is_err());
    }

    #[test]
    fn test_rejects_malformed_strings() {
        assert!(Address::decode("").is_err());
        assert!(Address::decode("not-an-address").is_err());
        // Valid bech32, wrong HRP
        let hrp = Hrp::parse("other").unwrap();
        let foreign = bech32::encode::<Bech32>(hrp, &[7u8; 32]).unwrap();
        assert!(Address::decode(&foreign).is_err());
    }

    #[test]
    fn test_rejects_corrupted_checksum() {
        let addr = Address::from_bytes(&[7u8; 32]).unwrap();
        let mut encoded = addr.encode();
        // Flip the final checksum character
        let last = encoded.pop().unwrap();
        encoded.push(if last == 'q' { 'p' } else { 'q' });
        assert!(Address::decode(&encoded).is_err());
    }
}
