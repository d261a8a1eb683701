//! Account key pairs
//!
//! An account is an ed25519 key pair; the public half doubles as the
//! account's ledger address. Watch-only key pairs carry no secret half and
//! can observe but never sign.

use crate::{Address, Error, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Secret key length in bytes
pub const SECRET_KEY_LEN: usize = 32;

/// An account key pair
#[derive(Clone)]
pub struct KeyPair {
    secret: Option<SigningKey>,
    public: VerifyingKey,
}

impl KeyPair {
    /// Generate a fresh random key pair
    pub fn generate() -> Self {
        let secret = SigningKey::generate(&mut OsRng);
        let public = secret.verifying_key();
        Self {
            secret: Some(secret),
            public,
        }
    }

    /// Reconstruct a key pair from raw secret key bytes
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; SECRET_KEY_LEN] = bytes.try_into().map_err(|_| {
            Error::CorruptedData("secret key must be 32 bytes".to_string())
        })?;
        let secret = SigningKey::from_bytes(&raw);
        let public = secret.verifying_key();
        Ok(Self {
            secret: Some(secret),
            public,
        })
    }

    /// Create a watch-only key pair from a public address
    pub fn watch_only(address: &Address) -> Result<Self> {
        let public = VerifyingKey::from_bytes(address.as_bytes())
            .map_err(|_| Error::InvalidAddress("address is not a valid public key".to_string()))?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    /// The account's ledger address
    pub fn address(&self) -> Address {
        Address::from_bytes(self.public.as_bytes()).expect("public key is 32 bytes")
    }

    /// The account's encoded public address string
    pub fn public_address(&self) -> String {
        self.address().encode()
    }

    /// Whether this key pair can sign
    pub fn can_sign(&self) -> bool {
        self.secret.is_some()
    }

    /// A zeroized-on-drop copy of the secret key bytes, if present
    pub fn secret_bytes(&self) -> Option<Zeroizing<[u8; SECRET_KEY_LEN]>> {
        self.secret
            .as_ref()
            .map(|sk| Zeroizing::new(sk.to_bytes()))
    }

    /// Sign a message; fails for watch-only key pairs
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let secret = self.secret.as_ref().ok_or_else(|| {
            Error::OperationFailed("watch-only account can't sign".to_string())
        })?;
        Ok(secret.sign(message))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never render the secret half
        f.debug_struct("KeyPair")
            .field("address", &self.public_address())
            .field("watch_only", &!self.can_sign())
            .finish()
    }
}
