//! Payment transaction building and submission
//!
//! `build_transaction` validates everything locally, loads the source
//! account, and produces an immutable signed [`Transaction`] without
//! submitting it; `send_transaction` verifies the destination's trust line
//! and submits exactly once, mapping ledger rejections to typed errors.

use crate::gateway::{failure_from_result_codes, load_activated_account, GatewayError, LedgerGateway};
use meridian_core::{
    Address, Amount, Envelope, Error, KeyPair, Memo, Operation, Result, Transaction, TransactionId,
};
use meridian_params::Environment;
use std::sync::Arc;

/// Builds and submits payment transactions
pub struct TransactionSender {
    gateway: Arc<dyn LedgerGateway>,
    environment: Environment,
    app_id: String,
}

impl TransactionSender {
    /// Create a sender for one environment and application id
    pub fn new(gateway: Arc<dyn LedgerGateway>, environment: Environment, app_id: String) -> Self {
        Self {
            gateway,
            environment,
            app_id,
        }
    }

    /// Build a signed payment transaction.
    ///
    /// Validation (amount precision, destination address, memo length) runs
    /// before any gateway call, so a validation failure has no side
    /// effects. The returned transaction's id is the hash of the signed
    /// envelope, computed before submission.
    pub fn build_transaction(
        &self,
        from: &KeyPair,
        destination: &str,
        amount: Amount,
        memo: Option<&str>,
    ) -> Result<Transaction> {
        let destination = parse_destination(destination)?;
        let memo = Memo::tagged(&self.app_id, memo)?;

        let source_state = load_activated_account(
            self.gateway.as_ref(),
            &self.environment.asset,
            &from.address(),
        )?;

        let envelope = Envelope::new(from.address(), source_state.sequence + 1)
            .with_memo(memo.clone())
            .add_operation(Operation::Payment {
                destination,
                asset: self.environment.asset.clone(),
                amount,
            });
        let signed = envelope.sign(from, self.environment.network.passphrase)?;
        tracing::debug!(id = %signed.id(), destination = %destination, "built payment transaction");

        Ok(Transaction::new(
            destination,
            from.address(),
            amount,
            memo,
            signed,
        ))
    }

    /// Submit a built transaction.
    ///
    /// The destination's trust line is checked first, so a payment that is
    /// certain to fail never costs a submission. Exactly one submission
    /// attempt is made.
    pub fn send_transaction(&self, transaction: &Transaction) -> Result<TransactionId> {
        load_activated_account(
            self.gateway.as_ref(),
            &self.environment.asset,
            transaction.destination(),
        )?;

        let result = self
            .gateway
            .submit(transaction.envelope())
            .map_err(|e| match e {
                GatewayError::NotFound => {
                    Error::AccountNotFound(transaction.source().encode())
                }
                GatewayError::Io(msg) => Error::OperationFailed(msg),
            })?;

        if !result.success {
            return Err(failure_from_result_codes(result.result_codes));
        }

        let hash = result.hash.ok_or_else(|| {
            Error::OperationFailed("ledger reported success without a transaction hash".to_string())
        })?;
        if hash != *transaction.id() {
            return Err(Error::OperationFailed(format!(
                "ledger transaction hash {hash} does not match locally computed id {}",
                transaction.id()
            )));
        }
        tracing::info!(id = %hash, "transaction submitted");
        Ok(hash)
    }
}

fn parse_destination(destination: &str) -> Result<Address> {
    if destination.is_empty() {
        return Err(Error::InvalidAddress(
            "destination public address can't be empty".to_string(),
        ));
    }
    destination.parse()
}
