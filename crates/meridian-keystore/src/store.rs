//! Scoped, file-backed key store
//!
//! Each store scope owns one JSON file of address → backup-record entries,
//! replaced atomically (write-temp-then-rename) so a failed write can never
//! leave a partial record behind. Records created by the store itself are
//! sealed under a store-internal protection passphrase with the lighter KDF
//! profile; user-facing export re-seals under the caller's passphrase with
//! the strong profile.
//!
//! Mutations on one scope are serialized by a per-store mutex. Distinct
//! scopes are fully isolated account sets.

use crate::backup::{self, BackupRecord, KdfParams};
use meridian_core::{Address, Error, KeyPair, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Store file format version
const STORE_FORMAT_VERSION: u32 = 1;

/// One persisted account
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    public_address: String,
    created_at: i64,
    record: BackupRecord,
}

/// The persisted record set of one scope, in insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    accounts: Vec<StoredAccount>,
}

impl StoreFile {
    fn empty() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            accounts: Vec::new(),
        }
    }
}

/// Encrypted-at-rest persistence for account key pairs
pub struct KeyStore {
    file_path: PathBuf,
    scope: String,
    lock: Mutex<()>,
}

impl KeyStore {
    /// Open (or create) the store for `scope` under `dir`.
    ///
    /// The scope key selects an independent account set; it may be empty
    /// and may only contain ASCII alphanumerics, `-`, and `_`.
    pub fn open(dir: impl AsRef<Path>, scope: &str) -> Result<Self> {
        if !scope
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::OperationFailed(format!(
                "invalid store scope '{scope}'"
            )));
        }
        fs::create_dir_all(dir.as_ref())
            .map_err(|e| Error::OperationFailed(format!("can't create key store directory: {e}")))?;
        Ok(Self {
            file_path: dir.as_ref().join(format!("accounts_{scope}.json")),
            scope: scope.to_string(),
            lock: Mutex::new(()),
        })
    }

    /// The scope key this store was opened with
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Generate a fresh key pair and persist it encrypted.
    ///
    /// All-or-nothing: a persistence failure leaves the record set exactly
    /// as it was.
    pub fn new_account(&self) -> Result<KeyPair> {
        let _guard = self.lock.lock();
        let key_pair = KeyPair::generate();
        let mut store = self
            .read_file()
            .map_err(Error::CreateAccount)?;
        store
            .accounts
            .push(self.seal(&key_pair).map_err(|e| Error::CreateAccount(e.to_string()))?);
        self.write_file(&store).map_err(Error::CreateAccount)?;
        tracing::info!(address = %key_pair.public_address(), scope = %self.scope, "created account");
        Ok(key_pair)
    }

    /// Load every persisted key pair, in persisted order.
    pub fn load_accounts(&self) -> Result<Vec<KeyPair>> {
        let _guard = self.lock.lock();
        let store = self.read_file().map_err(Error::LoadAccount)?;
        let mut accounts = Vec::with_capacity(store.accounts.len());
        for stored in &store.accounts {
            let secret = backup::decrypt(&stored.record, &self.store_passphrase())
                .map_err(|e| Error::LoadAccount(e.to_string()))?;
            accounts.push(
                KeyPair::from_secret_bytes(&secret)
                    .map_err(|e| Error::LoadAccount(e.to_string()))?,
            );
        }
        tracing::debug!(count = accounts.len(), scope = %self.scope, "loaded accounts");
        Ok(accounts)
    }

    /// Import an exported backup record.
    ///
    /// Persistence is skipped when the decoded address already exists in
    /// this scope, which makes import idempotent per address.
    pub fn import_account(&self, record_json: &str, passphrase: &str) -> Result<KeyPair> {
        let record = BackupRecord::from_json(record_json)?;
        let secret = backup::decrypt(&record, passphrase)?;
        let key_pair = KeyPair::from_secret_bytes(&secret)?;

        let _guard = self.lock.lock();
        let mut store = self.read_file().map_err(Error::CreateAccount)?;
        let address = key_pair.public_address();
        if store.accounts.iter().any(|a| a.public_address == address) {
            return Ok(key_pair);
        }
        store
            .accounts
            .push(self.seal(&key_pair).map_err(|e| Error::CreateAccount(e.to_string()))?);
        self.write_file(&store).map_err(Error::CreateAccount)?;
        tracing::info!(address = %address, scope = %self.scope, "imported account");
        Ok(key_pair)
    }

    /// Export the account's secret key as a portable record sealed under
    /// `passphrase` with the strong KDF profile.
    pub fn export_account(&self, address: &Address, passphrase: &str) -> Result<String> {
        let _guard = self.lock.lock();
        let store = self.read_file().map_err(Error::LoadAccount)?;
        let encoded = address.encode();
        let stored = store
            .accounts
            .iter()
            .find(|a| a.public_address == encoded)
            .ok_or_else(|| Error::AccountNotFound(encoded.clone()))?;
        let secret = backup::decrypt(&stored.record, &self.store_passphrase())?;
        backup::encrypt(&secret, passphrase, KdfParams::strong())?.to_json()
    }

    /// Remove the persisted record for `address`. Idempotent.
    pub fn delete_account(&self, address: &Address) -> Result<()> {
        let _guard = self.lock.lock();
        let mut store = self.read_file().map_err(Error::DeleteAccount)?;
        let encoded = address.encode();
        let before = store.accounts.len();
        store.accounts.retain(|a| a.public_address != encoded);
        if store.accounts.len() != before {
            self.write_file(&store).map_err(Error::DeleteAccount)?;
            tracing::info!(address = %encoded, scope = %self.scope, "deleted account");
        }
        Ok(())
    }

    /// Remove every persisted record in this scope.
    pub fn clear_all_accounts(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.write_file(&StoreFile::empty())
            .map_err(Error::DeleteAccount)?;
        tracing::info!(scope = %self.scope, "cleared all accounts");
        Ok(())
    }

    /// Store-internal protection passphrase.
    ///
    /// At-rest obfuscation tied to the scope, matching the original store
    /// contract; a platform secret-service integration would replace this
    /// derivation without touching the codec call sites.
    fn store_passphrase(&self) -> String {
        format!("meridian-keystore/{}", self.scope)
    }

    fn seal(&self, key_pair: &KeyPair) -> Result<StoredAccount> {
        let secret = key_pair
            .secret_bytes()
            .ok_or_else(|| Error::OperationFailed("can't persist a watch-only account".to_string()))?;
        let record = backup::encrypt(&secret[..], &self.store_passphrase(), KdfParams::store())?;
        Ok(StoredAccount {
            public_address: key_pair.public_address(),
            created_at: chrono::Utc::now().timestamp(),
            record,
        })
    }

    fn read_file(&self) -> std::result::Result<StoreFile, String> {
        if !self.file_path.exists() {
            return Ok(StoreFile::empty());
        }
        let data = fs::read(&self.file_path).map_err(|e| e.to_string())?;
        let store: StoreFile = serde_json::from_slice(&data).map_err(|e| e.to_string())?;
        if store.version != STORE_FORMAT_VERSION {
            return Err(format!("unsupported store file version {}", store.version));
        }
        Ok(store)
    }

    /// Replace the store file atomically: write a sibling temp file, sync,
    /// then rename over the old one.
    fn write_file(&self, store: &StoreFile) -> std::result::Result<(), String> {
        let json = serde_json::to_vec_pretty(store).map_err(|e| e.to_string())?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path).map_err(|e| e.to_string())?;
            file.write_all(&json).map_err(|e| e.to_string())?;
            file.sync_all().map_err(|e| e.to_string())?;
        }
        fs::rename(&tmp_path, &self.file_path).map_err(|e| e.to_string())
    }
}
