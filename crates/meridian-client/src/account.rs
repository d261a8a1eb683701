//! Account handles
//!
//! An [`Account`] wraps one key pair and delegates ledger operations to the
//! client's shared sender/activator/info components. Handles move through a
//! two-state lifecycle: active, then (after deletion) permanently inert —
//! every operation on a deleted handle fails fast with
//! [`Error::AccountDeleted`], and a handle is never reused for another
//! address.

use crate::activator::AccountActivator;
use crate::info::{AccountInfoRetriever, AccountStatus};
use crate::sender::TransactionSender;
use meridian_core::{Address, Amount, Error, KeyPair, Result, Transaction, TransactionId};
use meridian_keystore::{backup, KdfParams};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A live wallet account
pub struct Account {
    key_pair: KeyPair,
    deleted: AtomicBool,
    sender: Arc<TransactionSender>,
    activator: Arc<AccountActivator>,
    info: Arc<AccountInfoRetriever>,
}

impl Account {
    pub(crate) fn new(
        key_pair: KeyPair,
        sender: Arc<TransactionSender>,
        activator: Arc<AccountActivator>,
        info: Arc<AccountInfoRetriever>,
    ) -> Self {
        Self {
            key_pair,
            deleted: AtomicBool::new(false),
            sender,
            activator,
            info,
        }
    }

    /// The account's ledger address
    pub fn address(&self) -> Address {
        self.key_pair.address()
    }

    /// The account's encoded public address
    pub fn public_address(&self) -> String {
        self.key_pair.public_address()
    }

    /// Build a signed payment transaction from this account
    pub fn build_transaction(
        &self,
        destination: &str,
        amount: Amount,
        memo: Option<&str>,
    ) -> Result<Transaction> {
        self.ensure_active()?;
        self.sender
            .build_transaction(&self.key_pair, destination, amount, memo)
    }

    /// Submit a built transaction
    pub fn send_transaction(&self, transaction: &Transaction) -> Result<TransactionId> {
        self.ensure_active()?;
        self.sender.send_transaction(transaction)
    }

    /// Ensure this account trusts the wallet asset
    pub fn activate(&self) -> Result<()> {
        self.ensure_active()?;
        self.activator.activate(&self.key_pair)
    }

    /// The account's wallet asset balance
    pub fn balance(&self) -> Result<Amount> {
        self.ensure_active()?;
        self.info.balance(&self.address())
    }

    /// The account's ledger lifecycle status
    pub fn status(&self) -> Result<AccountStatus> {
        self.ensure_active()?;
        self.info.status(&self.address())
    }

    /// Export this account as a portable backup record sealed under
    /// `passphrase`
    pub fn export(&self, passphrase: &str) -> Result<String> {
        self.ensure_active()?;
        let secret = self.key_pair.secret_bytes().ok_or_else(|| {
            Error::OperationFailed("watch-only account can't be exported".to_string())
        })?;
        backup::encrypt(&secret[..], passphrase, KdfParams::strong())?.to_json()
    }

    /// Whether this handle has been deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_deleted(&self) {
        self.deleted.store(true, Ordering::SeqCst);
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_deleted() {
            return Err(Error::AccountDeleted);
        }
        Ok(())
    }
}
