//! Trust-line activation
//!
//! Before an account can hold the wallet asset it must opt in by opening a
//! trust line. Activation is idempotent: an account that already trusts
//! the asset is left untouched and nothing is submitted.

use crate::gateway::{failure_from_result_codes, load_account, GatewayError, LedgerGateway};
use meridian_core::{Amount, Envelope, Error, KeyPair, Operation, Result};
use meridian_params::Environment;
use std::sync::Arc;

/// Opens the wallet asset trust line for accounts
pub struct AccountActivator {
    gateway: Arc<dyn LedgerGateway>,
    environment: Environment,
}

impl AccountActivator {
    /// Create an activator for one environment
    pub fn new(gateway: Arc<dyn LedgerGateway>, environment: Environment) -> Self {
        Self {
            gateway,
            environment,
        }
    }

    /// Ensure `account` trusts the wallet asset.
    ///
    /// Submits a single change-trust operation with the maximum
    /// representable limit when the trust line is missing; returns
    /// immediately when it already exists.
    pub fn activate(&self, account: &KeyPair) -> Result<()> {
        let state = load_account(self.gateway.as_ref(), &account.address())?;
        if state.trusts(&self.environment.asset) {
            tracing::debug!(address = %account.public_address(), "asset already trusted, nothing to activate");
            return Ok(());
        }

        let envelope = Envelope::new(account.address(), state.sequence + 1).add_operation(
            Operation::ChangeTrust {
                asset: self.environment.asset.clone(),
                limit: Amount::MAX,
            },
        );
        let signed = envelope.sign(account, self.environment.network.passphrase)?;

        let result = self.gateway.submit(&signed).map_err(|e| match e {
            GatewayError::NotFound => Error::AccountNotFound(account.public_address()),
            GatewayError::Io(msg) => Error::OperationFailed(msg),
        })?;
        if !result.success {
            return Err(failure_from_result_codes(result.result_codes));
        }
        tracing::info!(address = %account.public_address(), "trust line established");
        Ok(())
    }
}
