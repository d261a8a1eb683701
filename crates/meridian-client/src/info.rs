//! Account state queries

use crate::gateway::{load_account, GatewayError, LedgerGateway};
use meridian_core::{Address, Amount, Error, Result};
use meridian_params::Environment;
use std::sync::Arc;

/// Lifecycle position of an account on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// The account does not exist on the ledger yet
    NotCreated,
    /// The account exists but has not opened the wallet asset trust line
    NotActivated,
    /// The account exists and can hold the wallet asset
    Activated,
}

/// Reads account balances and status from the ledger
pub struct AccountInfoRetriever {
    gateway: Arc<dyn LedgerGateway>,
    environment: Environment,
}

impl AccountInfoRetriever {
    /// Create a retriever for one environment
    pub fn new(gateway: Arc<dyn LedgerGateway>, environment: Environment) -> Self {
        Self {
            gateway,
            environment,
        }
    }

    /// The account's wallet asset balance
    pub fn balance(&self, address: &Address) -> Result<Amount> {
        let state = load_account(self.gateway.as_ref(), address)?;
        state
            .balance_of(&self.environment.asset)
            .ok_or_else(|| Error::AccountNotActivated(address.encode()))
    }

    /// Where the account stands in the create → activate lifecycle
    pub fn status(&self, address: &Address) -> Result<AccountStatus> {
        match self.gateway.get_account(address) {
            Ok(state) => Ok(if state.trusts(&self.environment.asset) {
                AccountStatus::Activated
            } else {
                AccountStatus::NotActivated
            }),
            Err(GatewayError::NotFound) => Ok(AccountStatus::NotCreated),
            Err(GatewayError::Io(msg)) => Err(Error::OperationFailed(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use meridian_core::KeyPair;
    use meridian_params::Asset;

    fn retriever_with_mock() -> (Arc<MockGateway>, AccountInfoRetriever) {
        let gateway = Arc::new(MockGateway::new());
        let info = AccountInfoRetriever::new(gateway.clone(), Environment::testnet());
        (gateway, info)
    }

    #[test]
    fn test_status_lifecycle() {
        let (gateway, info) = retriever_with_mock();
        let kp = KeyPair::generate();

        assert_eq!(info.status(&kp.address()).unwrap(), AccountStatus::NotCreated);

        gateway.register(&kp.address(), 0);
        assert_eq!(
            info.status(&kp.address()).unwrap(),
            AccountStatus::NotActivated
        );

        gateway.add_trust(&kp.address(), &Asset::testnet(), Amount::ZERO);
        assert_eq!(info.status(&kp.address()).unwrap(), AccountStatus::Activated);
    }

    #[test]
    fn test_balance() {
        let (gateway, info) = retriever_with_mock();
        let kp = KeyPair::generate();
        gateway.register(&kp.address(), 0);
        gateway.add_trust(&kp.address(), &Asset::testnet(), "42.5".parse().unwrap());

        assert_eq!(info.balance(&kp.address()).unwrap(), "42.5".parse().unwrap());
    }

    #[test]
    fn test_balance_without_trust_line() {
        let (gateway, info) = retriever_with_mock();
        let kp = KeyPair::generate();
        gateway.register(&kp.address(), 0);

        assert!(matches!(
            info.balance(&kp.address()).unwrap_err(),
            Error::AccountNotActivated(_)
        ));
    }

    #[test]
    fn test_balance_unknown_account() {
        let (_gateway, info) = retriever_with_mock();
        let kp = KeyPair::generate();
        assert!(matches!(
            info.balance(&kp.address()).unwrap_err(),
            Error::AccountNotFound(_)
        ));
    }
}
