//! Meridian wallet client
//!
//! The top-level wallet facade: a [`Client`] owns the encrypted key store,
//! keeps a live list of [`Account`] handles reconciled against it, and
//! gives each account access to payment sending and trust-line activation
//! through a supplied [`LedgerGateway`] capability.
//!
//! The crate performs no internal threading; gateway calls are blocking and
//! callers provide their own synchronization (or an outer async layer).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod activator;
pub mod client;
pub mod gateway;
pub mod info;
pub mod sender;

pub use account::Account;
pub use activator::AccountActivator;
pub use client::Client;
pub use gateway::{
    AccountState, AssetBalance, GatewayError, LedgerGateway, OperationResultCode, ResultCodes,
    SubmitResult,
};
pub use info::{AccountInfoRetriever, AccountStatus};
pub use meridian_core::{Error, Result};
pub use sender::TransactionSender;

#[cfg(any(test, feature = "test-helpers"))]
pub use gateway::mock::MockGateway;
