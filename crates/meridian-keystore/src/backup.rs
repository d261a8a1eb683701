//! Passphrase-protected backup records
//!
//! A backup record is the portable encrypted container for one account's
//! secret key: Argon2id derives a cipher key from the passphrase and a
//! random salt, ChaCha20-Poly1305 seals the secret plus a short integrity
//! checksum under a random nonce, and the result is serialized as a
//! versioned, self-describing JSON blob. The KDF parameters ride inside the
//! record, so cost profiles can change without breaking old records.
//!
//! Decryption failures deliberately collapse wrong-passphrase and
//! corrupted-ciphertext into one error kind; distinguishing them would give
//! an attacker probing a stolen record a passphrase oracle.

use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};
use meridian_core::{Error, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Backup record format version
pub const RECORD_VERSION: u32 = 1;

/// Salt length in bytes
const SALT_LEN: usize = 32;

/// ChaCha20-Poly1305 nonce length in bytes
const NONCE_LEN: usize = 12;

/// Integrity checksum length in bytes (leading bytes of SHA-256)
const CHECKSUM_LEN: usize = 4;

/// The one error callers may learn about a record that fails to open
const OPEN_FAILED: &str = "corrupted data or wrong passphrase";

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub m_cost: u32,
    /// Time cost (iterations)
    pub t_cost: u32,
    /// Parallelism
    pub p_cost: u32,
}

impl KdfParams {
    /// Strong profile for user-passphrase exports.
    /// Memory: 64 MiB, iterations: 3, parallelism: 4
    pub const fn strong() -> Self {
        Self {
            m_cost: 65536,
            t_cost: 3,
            p_cost: 4,
        }
    }

    /// Lighter profile for the store-internal at-rest records, which are
    /// opened on every account load.
    /// Memory: 16 MiB, iterations: 2, parallelism: 2
    pub const fn store() -> Self {
        Self {
            m_cost: 16384,
            t_cost: 2,
            p_cost: 2,
        }
    }
}

/// A portable encrypted account backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Format version
    pub version: u32,
    /// Argon2id parameters the record was sealed with
    pub kdf: KdfParams,
    /// Hex-encoded KDF salt
    pub salt: String,
    /// Hex-encoded cipher nonce
    pub nonce: String,
    /// Hex-encoded ciphertext (secret key + checksum)
    pub ciphertext: String,
}

impl BackupRecord {
    /// Serialize to the portable JSON form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the portable JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|_| Error::CorruptedData("malformed backup record".to_string()))
    }
}

/// Seal `secret` under `passphrase`.
///
/// Salt and nonce are freshly random, so sealing the same inputs twice
/// never produces the same record.
pub fn encrypt(secret: &[u8], passphrase: &str, kdf: KdfParams) -> Result<BackupRecord> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(passphrase, &salt, kdf)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let mut plaintext = Zeroizing::new(Vec::with_capacity(secret.len() + CHECKSUM_LEN));
    plaintext.extend_from_slice(secret);
    plaintext.extend_from_slice(&checksum(secret));

    let cipher = ChaCha20Poly1305::new(key.as_ref().into());
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_slice())
        .map_err(|e| Error::Crypto(e.to_string()))?;

    Ok(BackupRecord {
        version: RECORD_VERSION,
        kdf,
        salt: hex::encode(salt),
        nonce: hex::encode(nonce_bytes),
        ciphertext: hex::encode(ciphertext),
    })
}

/// Open a record with `passphrase`, returning the secret key bytes.
pub fn decrypt(record: &BackupRecord, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    if record.version != RECORD_VERSION {
        return Err(Error::CorruptedData(format!(
            "unsupported backup record version {}",
            record.version
        )));
    }

    let salt = decode_field(&record.salt, "salt")?;
    let nonce_bytes = decode_field(&record.nonce, "nonce")?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(Error::CorruptedData("invalid nonce length".to_string()));
    }
    let ciphertext = decode_field(&record.ciphertext, "ciphertext")?;

    let key = derive_key(passphrase, &salt, record.kdf)?;
    let cipher = ChaCha20Poly1305::new(key.as_ref().into());
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|_| Error::Crypto(OPEN_FAILED.to_string()))?,
    );

    if plaintext.len() <= CHECKSUM_LEN {
        return Err(Error::Crypto(OPEN_FAILED.to_string()));
    }
    let (secret, stored_checksum) = plaintext.split_at(plaintext.len() - CHECKSUM_LEN);
    if checksum(secret) != stored_checksum {
        return Err(Error::Crypto(OPEN_FAILED.to_string()));
    }

    Ok(Zeroizing::new(secret.to_vec()))
}

fn checksum(secret: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(secret);
    digest[..CHECKSUM_LEN]
        .try_into()
        .expect("digest is longer than the checksum")
}

fn decode_field(value: &str, name: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|_| Error::CorruptedData(format!("invalid {name} encoding")))
}

/// Derive the 32-byte cipher key from a passphrase and salt.
fn derive_key(passphrase: &str, salt: &[u8], kdf: KdfParams) -> Result<Zeroizing<[u8; 32]>> {
    let params = ParamsBuilder::new()
        .m_cost(kdf.m_cost)
        .t_cost(kdf.t_cost)
        .p_cost(kdf.p_cost)
        .output_len(32)
        .build()
        .map_err(|_| Error::CorruptedData("invalid KDF parameters".to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|e| Error::Crypto(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Cheap parameters so the suite stays fast; cost never changes behavior
    fn test_params() -> KdfParams {
        KdfParams {
            m_cost: 1024,
            t_cost: 1,
            p_cost: 1,
        }
    }

    #[test]
    fn test_roundtrip() {
        let secret = [42u8; 32];
        let record = encrypt(&secret, "pw1", test_params()).unwrap();
        let opened = decrypt(&record, "pw1").unwrap();
        assert_eq!(&opened[..], &secret);
    }

    #[test]
    fn test_records_are_randomized() {
        let secret = [42u8; 32];
        let a = encrypt(&secret, "pw1", test_params()).unwrap();
        let b = encrypt(&secret, "pw1", test_params()).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_wrong_passphrase_is_generic() {
        let record = encrypt(&[42u8; 32], "pw1", test_params()).unwrap();
        match decrypt(&record, "pw2") {
            Err(Error::Crypto(msg)) => assert_eq!(msg, OPEN_FAILED),
            other => panic!("expected generic crypto error, got {other:?}"),
        }
    }

    #[test]
    fn test_tampered_ciphertext_is_generic() {
        let mut record = encrypt(&[42u8; 32], "pw1", test_params()).unwrap();
        let mut raw = hex::decode(&record.ciphertext).unwrap();
        raw[0] ^= 0x01;
        record.ciphertext = hex::encode(raw);
        match decrypt(&record, "pw1") {
            Err(Error::Crypto(msg)) => assert_eq!(msg, OPEN_FAILED),
            other => panic!("expected generic crypto error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_version() {
        let mut record = encrypt(&[42u8; 32], "pw1", test_params()).unwrap();
        record.version = 99;
        assert!(matches!(
            decrypt(&record, "pw1"),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            BackupRecord::from_json("{not json"),
            Err(Error::CorruptedData(_))
        ));
        assert!(matches!(
            BackupRecord::from_json("{\"version\":1}"),
            Err(Error::CorruptedData(_))
        ));
    }

    #[test]
    fn test_malformed_hex_field() {
        let record = encrypt(&[42u8; 32], "pw1", test_params()).unwrap();
        let mut bad = record.clone();
        bad.salt = "zz".to_string();
        assert!(matches!(decrypt(&bad, "pw1"), Err(Error::CorruptedData(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let record = encrypt(&[42u8; 32], "pw1", test_params()).unwrap();
        let json = record.to_json().unwrap();
        assert_eq!(BackupRecord::from_json(&json).unwrap(), record);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_roundtrip_any_secret(secret in proptest::collection::vec(any::<u8>(), 1..64),
                                     passphrase in "[ -~]{1,24}") {
            let record = encrypt(&secret, &passphrase, test_params()).unwrap();
            let opened = decrypt(&record, &passphrase).unwrap();
            prop_assert_eq!(&opened[..], &secret[..]);
        }
    }
}
