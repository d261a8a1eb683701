//! Top-level wallet client
//!
//! A [`Client`] owns the scoped key store and a live, ordered list of
//! account handles. Accessors reconcile the live list against persisted
//! storage first, so accounts added or removed by another client sharing
//! the same store scope are surfaced, while handles for unchanged accounts
//! keep their identity and stay valid in callers' hands.

use crate::account::Account;
use crate::activator::AccountActivator;
use crate::gateway::{GatewayError, LedgerGateway};
use crate::info::AccountInfoRetriever;
use crate::sender::TransactionSender;
use meridian_core::{Error, KeyPair, Result};
use meridian_keystore::KeyStore;
use meridian_params::{is_valid_app_id, Environment, APP_ID_MAX_LEN, APP_ID_MIN_LEN};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Wallet account manager
pub struct Client {
    environment: Environment,
    app_id: String,
    store_key: String,
    gateway: Arc<dyn LedgerGateway>,
    key_store: KeyStore,
    sender: Arc<TransactionSender>,
    activator: Arc<AccountActivator>,
    info: Arc<AccountInfoRetriever>,
    accounts: Vec<Arc<Account>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("environment", &self.environment)
            .field("app_id", &self.app_id)
            .field("store_key", &self.store_key)
            .field("accounts", &self.accounts.len())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Build a wallet client.
    ///
    /// `app_id` tags every outgoing transaction memo; it must be 3-4
    /// alphanumeric characters. An empty app-id is tolerated with a
    /// warning. `store_key` selects which persisted account set to use;
    /// distinct keys are fully isolated.
    pub fn new(
        gateway: Arc<dyn LedgerGateway>,
        environment: Environment,
        app_id: &str,
        store_key: &str,
        store_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        if app_id.is_empty() {
            tracing::warn!(
                "client created without an application id; outgoing memos will carry a bare tag"
            );
        } else if !is_valid_app_id(app_id) {
            return Err(Error::InvalidAppId(format!(
                "app-id must be {APP_ID_MIN_LEN}-{APP_ID_MAX_LEN} upper/lower case letters and/or digits, got '{app_id}'"
            )));
        }

        let key_store = KeyStore::open(store_dir, store_key)?;
        let sender = Arc::new(TransactionSender::new(
            gateway.clone(),
            environment.clone(),
            app_id.to_string(),
        ));
        let activator = Arc::new(AccountActivator::new(gateway.clone(), environment.clone()));
        let info = Arc::new(AccountInfoRetriever::new(
            gateway.clone(),
            environment.clone(),
        ));

        let mut client = Self {
            environment,
            app_id: app_id.to_string(),
            store_key: store_key.to_string(),
            gateway,
            key_store,
            sender,
            activator,
            info,
            accounts: Vec::new(),
        };
        client.reload_accounts();
        Ok(client)
    }

    /// Create a new account, persist it, and return its handle
    pub fn add_account(&mut self) -> Result<Arc<Account>> {
        let key_pair = self.key_store.new_account()?;
        Ok(self.push_handle(key_pair))
    }

    /// Import an exported backup record.
    ///
    /// When an account with the decoded address already has a live handle,
    /// that handle is returned unchanged; import is idempotent per address.
    pub fn import_account(&mut self, record_json: &str, passphrase: &str) -> Result<Arc<Account>> {
        let key_pair = self.key_store.import_account(record_json, passphrase)?;
        self.reload_accounts();
        if let Some(existing) = self
            .accounts
            .iter()
            .find(|a| a.address() == key_pair.address())
        {
            return Ok(existing.clone());
        }
        Ok(self.push_handle(key_pair))
    }

    /// The account at `index`, after reconciling against persisted storage
    pub fn get_account(&mut self, index: usize) -> Option<Arc<Account>> {
        self.reload_accounts();
        self.accounts.get(index).cloned()
    }

    /// Whether any account exists
    pub fn has_account(&mut self) -> bool {
        self.account_count() != 0
    }

    /// Number of existing accounts
    pub fn account_count(&mut self) -> usize {
        self.reload_accounts();
        self.accounts.len()
    }

    /// Delete the account at `index`.
    ///
    /// Returns whether an account existed there; an out-of-range index is
    /// not an error and mutates nothing. The persisted record is removed
    /// before the handle leaves the live list, and the handle becomes
    /// permanently inert.
    pub fn delete_account(&mut self, index: usize) -> Result<bool> {
        self.reload_accounts();
        if index >= self.accounts.len() {
            return Ok(false);
        }
        let address = self.accounts[index].address();
        self.key_store.delete_account(&address)?;
        let removed = self.accounts.remove(index);
        removed.mark_deleted();
        Ok(true)
    }

    /// Delete every account in this store scope
    pub fn clear_all_accounts(&mut self) -> Result<()> {
        self.key_store.clear_all_accounts()?;
        for account in &self.accounts {
            account.mark_deleted();
        }
        self.accounts.clear();
        Ok(())
    }

    /// Current minimum fee the network charges per operation, in grains
    pub fn minimum_fee(&self) -> Result<u64> {
        self.gateway.minimum_fee().map_err(|e| match e {
            GatewayError::NotFound => Error::OperationFailed("fee lookup failed".to_string()),
            GatewayError::Io(msg) => Error::OperationFailed(msg),
        })
    }

    /// The environment this client operates against
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The application id tagged onto outgoing memos
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The store scope key
    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    /// Reconcile the live handle list against persisted storage. A load
    /// fault is not fatal: the current list is kept and the fault logged,
    /// since "unknown current accounts" must not crash the caller.
    fn reload_accounts(&mut self) {
        match self.key_store.load_accounts() {
            Ok(stored) => self.update_accounts(stored),
            Err(e) => {
                tracing::warn!(error = %e, "could not load persisted accounts; keeping current handles");
            }
        }
    }

    /// Rebuild the live list in persisted order, reusing the existing
    /// handle for every address that already has one so callers holding a
    /// handle are never invalidated.
    fn update_accounts(&mut self, stored: Vec<KeyPair>) {
        let mut by_address: HashMap<_, _> = self
            .accounts
            .drain(..)
            .map(|handle| (handle.address(), handle))
            .collect();
        let rebuilt = stored
            .into_iter()
            .map(|key_pair| {
                by_address
                    .remove(&key_pair.address())
                    .unwrap_or_else(|| self.make_handle(key_pair))
            })
            .collect();
        self.accounts = rebuilt;
    }

    fn push_handle(&mut self, key_pair: KeyPair) -> Arc<Account> {
        let handle = self.make_handle(key_pair);
        self.accounts.push(handle.clone());
        handle
    }

    fn make_handle(&self, key_pair: KeyPair) -> Arc<Account> {
        Arc::new(Account::new(
            key_pair,
            self.sender.clone(),
            self.activator.clone(),
            self.info.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use tempfile::tempdir;

    fn test_client(dir: &Path) -> Client {
        Client::new(
            Arc::new(MockGateway::new()),
            Environment::testnet(),
            "1a2b",
            "main",
            dir,
        )
        .unwrap()
    }

    #[test]
    fn test_app_id_validation() {
        let dir = tempdir().unwrap();
        let gateway = Arc::new(MockGateway::new());

        let err = Client::new(
            gateway.clone(),
            Environment::testnet(),
            "bad app id",
            "main",
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidAppId(_)));

        // Empty app-id is tolerated with a warning
        assert!(Client::new(
            gateway,
            Environment::testnet(),
            "",
            "main",
            dir.path()
        )
        .is_ok());
    }

    #[test]
    fn test_add_and_get_account() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());

        assert!(!client.has_account());
        let account = client.add_account().unwrap();
        assert!(client.has_account());
        assert_eq!(client.account_count(), 1);

        let fetched = client.get_account(0).unwrap();
        assert_eq!(fetched.public_address(), account.public_address());
        assert!(client.get_account(1).is_none());
    }

    #[test]
    fn test_get_account_preserves_handle_identity() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        client.add_account().unwrap();
        client.add_account().unwrap();

        let first = client.get_account(0).unwrap();
        let again = client.get_account(0).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_reconciliation_surfaces_external_accounts() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        let own = client.add_account().unwrap();

        // A second client sharing the same scope adds an account
        let mut other = test_client(dir.path());
        assert_eq!(other.account_count(), 1);
        let external = other.add_account().unwrap();

        assert_eq!(client.account_count(), 2);
        let first = client.get_account(0).unwrap();
        assert!(Arc::ptr_eq(&first, &own));
        assert_eq!(
            client.get_account(1).unwrap().public_address(),
            external.public_address()
        );
    }

    #[test]
    fn test_delete_account_semantics() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        let doomed = client.add_account().unwrap();
        client.add_account().unwrap();

        // Out of range: no error, nothing changes
        assert!(!client.delete_account(5).unwrap());
        assert_eq!(client.account_count(), 2);

        assert!(client.delete_account(0).unwrap());
        assert_eq!(client.account_count(), 1);
        assert!(doomed.is_deleted());

        // The deleted handle is permanently inert
        let err = doomed
            .build_transaction("mrd1whatever", "1".parse().unwrap(), None)
            .unwrap_err();
        assert!(matches!(err, Error::AccountDeleted));
        assert!(matches!(doomed.activate(), Err(Error::AccountDeleted)));
        assert!(matches!(doomed.export("pw"), Err(Error::AccountDeleted)));
    }

    #[test]
    fn test_deleted_account_is_not_resurrected() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        client.add_account().unwrap();

        client.delete_account(0).unwrap();
        assert_eq!(client.account_count(), 0);

        // A fresh reconciliation pass must not bring it back
        let mut fresh = test_client(dir.path());
        assert_eq!(fresh.account_count(), 0);
        assert!(fresh.get_account(0).is_none());
    }

    #[test]
    fn test_clear_all_accounts() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        let a = client.add_account().unwrap();
        let b = client.add_account().unwrap();

        client.clear_all_accounts().unwrap();
        assert_eq!(client.account_count(), 0);
        assert!(a.is_deleted());
        assert!(b.is_deleted());
    }

    #[test]
    fn test_import_is_idempotent_per_address() {
        let dir = tempdir().unwrap();
        let mut client = test_client(dir.path());
        let account = client.add_account().unwrap();
        let exported = account.export("pw1").unwrap();

        let imported = client.import_account(&exported, "pw1").unwrap();
        assert!(Arc::ptr_eq(&imported, &account));
        assert_eq!(client.account_count(), 1);
    }

    #[test]
    fn test_minimum_fee() {
        let dir = tempdir().unwrap();
        let client = test_client(dir.path());
        assert_eq!(client.minimum_fee().unwrap(), 100);
    }
}
