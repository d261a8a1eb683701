//! Ledger gateway boundary
//!
//! The gateway is a supplied capability: account state lookup, signed
//! envelope submission, and fee discovery against the remote ledger
//! service. Ledger result codes cross this boundary as a closed enum with
//! an explicit unrecognized fallback, so business logic upstream never
//! string-matches raw codes.

use meridian_core::{Address, Amount, Error, Result, SignedEnvelope, TransactionId};
use meridian_params::Asset;

/// Blocking interface to the remote ledger service
pub trait LedgerGateway: Send + Sync {
    /// Look up the current state of an account
    fn get_account(&self, address: &Address) -> std::result::Result<AccountState, GatewayError>;

    /// Submit a signed transaction envelope. Exactly one network attempt
    /// per call; retry policy belongs to the caller.
    fn submit(&self, envelope: &SignedEnvelope) -> std::result::Result<SubmitResult, GatewayError>;

    /// Current minimum fee the network charges per operation, in grains
    fn minimum_fee(&self) -> std::result::Result<u64, GatewayError>;
}

/// Transport-level gateway failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The requested account does not exist on the ledger
    #[error("account not found")]
    NotFound,

    /// I/O or transport failure
    #[error("gateway I/O error: {0}")]
    Io(String),
}

/// One asset balance held by an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBalance {
    /// Asset code
    pub code: String,
    /// Asset issuer address
    pub issuer: String,
    /// Current balance
    pub amount: Amount,
}

/// Ledger-side account state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    /// Account address
    pub address: Address,
    /// Current sequence number
    pub sequence: u64,
    /// Trust-line balances; an entry exists for every trusted asset
    pub balances: Vec<AssetBalance>,
}

impl AccountState {
    /// Whether the account has opened a trust line for `asset`
    pub fn trusts(&self, asset: &Asset) -> bool {
        self.balance_of(asset).is_some()
    }

    /// The account's balance of `asset`, if trusted
    pub fn balance_of(&self, asset: &Asset) -> Option<Amount> {
        self.balances
            .iter()
            .find(|b| asset.matches(&b.code, &b.issuer))
            .map(|b| b.amount)
    }
}

/// Operation-level ledger result codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResultCode {
    /// Operation applied
    Success,
    /// Source balance cannot cover the operation
    Underfunded,
    /// Destination has no trust line for the asset
    NoTrust,
    /// Destination account does not exist
    NoDestination,
    /// Destination trust-line limit would be exceeded
    LineFull,
    /// Operation was structurally invalid
    Malformed,
    /// A code this client does not know
    Unrecognized(String),
}

impl OperationResultCode {
    /// Parse a raw ledger code string
    pub fn from_code(code: &str) -> Self {
        match code {
            "op_success" => Self::Success,
            "op_underfunded" => Self::Underfunded,
            "op_no_trust" => Self::NoTrust,
            "op_no_destination" => Self::NoDestination,
            "op_line_full" => Self::LineFull,
            "op_malformed" => Self::Malformed,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// The raw ledger code string
    pub fn as_code(&self) -> &str {
        match self {
            Self::Success => "op_success",
            Self::Underfunded => "op_underfunded",
            Self::NoTrust => "op_no_trust",
            Self::NoDestination => "op_no_destination",
            Self::LineFull => "op_line_full",
            Self::Malformed => "op_malformed",
            Self::Unrecognized(code) => code,
        }
    }
}

/// Structured result codes of a rejected submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultCodes {
    /// Transaction-level code, when reported
    pub transaction: Option<String>,
    /// Per-operation codes, in operation order
    pub operations: Vec<OperationResultCode>,
}

/// Outcome of an envelope submission
#[derive(Debug, Clone)]
pub struct SubmitResult {
    /// Whether the ledger applied the transaction
    pub success: bool,
    /// Ledger-assigned transaction hash, on success
    pub hash: Option<TransactionId>,
    /// Result codes, on failure
    pub result_codes: Option<ResultCodes>,
}

impl SubmitResult {
    /// A successful submission
    pub fn succeeded(hash: TransactionId) -> Self {
        Self {
            success: true,
            hash: Some(hash),
            result_codes: None,
        }
    }

    /// A rejected submission
    pub fn rejected(result_codes: ResultCodes) -> Self {
        Self {
            success: false,
            hash: None,
            result_codes: Some(result_codes),
        }
    }
}

/// Load an account, classifying gateway failures the one way both the
/// build and send paths (and the activator) rely on.
pub(crate) fn load_account(
    gateway: &dyn LedgerGateway,
    address: &Address,
) -> Result<AccountState> {
    gateway.get_account(address).map_err(|e| match e {
        GatewayError::NotFound => Error::AccountNotFound(address.encode()),
        GatewayError::Io(msg) => Error::OperationFailed(msg),
    })
}

/// Load an account and require it to trust `asset`.
pub(crate) fn load_activated_account(
    gateway: &dyn LedgerGateway,
    asset: &Asset,
    address: &Address,
) -> Result<AccountState> {
    let state = load_account(gateway, address)?;
    if !state.trusts(asset) {
        return Err(Error::AccountNotActivated(address.encode()));
    }
    Ok(state)
}

/// Map a rejected submission to the error the caller sees: an underfunded
/// first operation is a distinct, typed failure; everything else carries
/// the raw codes for diagnostics.
pub(crate) fn failure_from_result_codes(result_codes: Option<ResultCodes>) -> Error {
    let Some(codes) = result_codes else {
        return Error::TransactionFailed {
            transaction_code: None,
            operation_codes: Vec::new(),
        };
    };
    if matches!(
        codes.operations.first(),
        Some(OperationResultCode::Underfunded)
    ) {
        return Error::InsufficientFunds;
    }
    Error::TransactionFailed {
        transaction_code: codes.transaction,
        operation_codes: codes
            .operations
            .iter()
            .map(|c| c.as_code().to_string())
            .collect(),
    }
}

/// In-memory gateway for tests
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock {
    use super::*;
    use meridian_core::Operation;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockState {
        accounts: HashMap<String, AccountState>,
        account_lookups: usize,
        submit_attempts: usize,
        reject_next: Option<ResultCodes>,
        report_hash: Option<TransactionId>,
        io_down: bool,
    }

    /// A scriptable in-memory ledger gateway.
    ///
    /// Successful submissions apply change-trust operations to the tracked
    /// account states and bump the source sequence, so activation flows
    /// behave like they would against a real ledger.
    #[derive(Default)]
    pub struct MockGateway {
        state: Mutex<MockState>,
    }

    impl MockGateway {
        /// Create an empty mock ledger
        pub fn new() -> Self {
            Self::default()
        }

        /// Register an account that exists but trusts nothing
        pub fn register(&self, address: &Address, sequence: u64) {
            self.state.lock().accounts.insert(
                address.encode(),
                AccountState {
                    address: *address,
                    sequence,
                    balances: Vec::new(),
                },
            );
        }

        /// Give an account a trust line with the given balance
        pub fn add_trust(&self, address: &Address, asset: &Asset, amount: Amount) {
            let mut state = self.state.lock();
            let account = state
                .accounts
                .get_mut(&address.encode())
                .expect("account must be registered first");
            account.balances.retain(|b| !asset.matches(&b.code, &b.issuer));
            account.balances.push(AssetBalance {
                code: asset.code.clone(),
                issuer: asset.issuer.clone(),
                amount,
            });
        }

        /// Number of `get_account` calls seen so far
        pub fn account_lookups(&self) -> usize {
            self.state.lock().account_lookups
        }

        /// Number of `submit` calls seen so far
        pub fn submit_attempts(&self) -> usize {
            self.state.lock().submit_attempts
        }

        /// Reject the next submission with the given result codes
        pub fn reject_next_submit(&self, result_codes: ResultCodes) {
            self.state.lock().reject_next = Some(result_codes);
        }

        /// Report this hash for the next successful submission instead of
        /// the envelope's own hash
        pub fn report_hash(&self, hash: TransactionId) {
            self.state.lock().report_hash = Some(hash);
        }

        /// Toggle transport failures for every call
        pub fn set_io_down(&self, down: bool) {
            self.state.lock().io_down = down;
        }
    }

    impl LedgerGateway for MockGateway {
        fn get_account(
            &self,
            address: &Address,
        ) -> std::result::Result<AccountState, GatewayError> {
            let mut state = self.state.lock();
            state.account_lookups += 1;
            if state.io_down {
                return Err(GatewayError::Io("mock transport down".to_string()));
            }
            state
                .accounts
                .get(&address.encode())
                .cloned()
                .ok_or(GatewayError::NotFound)
        }

        fn submit(
            &self,
            envelope: &SignedEnvelope,
        ) -> std::result::Result<SubmitResult, GatewayError> {
            let mut state = self.state.lock();
            state.submit_attempts += 1;
            if state.io_down {
                return Err(GatewayError::Io("mock transport down".to_string()));
            }
            if let Some(codes) = state.reject_next.take() {
                return Ok(SubmitResult::rejected(codes));
            }

            let source = envelope.envelope().source().encode();
            let Some(account) = state.accounts.get_mut(&source) else {
                return Err(GatewayError::Io(format!(
                    "unknown source account {source}"
                )));
            };
            account.sequence = envelope.envelope().sequence();
            let trust_ops: Vec<Asset> = envelope
                .envelope()
                .operations()
                .iter()
                .filter_map(|op| match op {
                    Operation::ChangeTrust { asset, .. } => Some(asset.clone()),
                    Operation::Payment { .. } => None,
                })
                .collect();
            for asset in trust_ops {
                if !account.trusts(&asset) {
                    account.balances.push(AssetBalance {
                        code: asset.code.clone(),
                        issuer: asset.issuer.clone(),
                        amount: Amount::ZERO,
                    });
                }
            }

            let hash = state.report_hash.take().unwrap_or_else(|| envelope.id());
            Ok(SubmitResult::succeeded(hash))
        }

        fn minimum_fee(&self) -> std::result::Result<u64, GatewayError> {
            let state = self.state.lock();
            if state.io_down {
                return Err(GatewayError::Io("mock transport down".to_string()));
            }
            Ok(meridian_core::BASE_FEE as u64)
        }
    }
}
