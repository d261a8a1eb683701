//! Error types for the Meridian wallet
//!
//! One taxonomy shared by every wallet crate, so callers can match on the
//! exact failure kind instead of parsing message strings.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Meridian wallet errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Account could not be created or persisted
    #[error("Account creation failed: {0}")]
    CreateAccount(String),

    /// Persisted account record could not be removed
    #[error("Account deletion failed: {0}")]
    DeleteAccount(String),

    /// Persisted accounts could not be loaded (non-fatal; callers treat the
    /// current account set as unknown)
    #[error("Account load failed: {0}")]
    LoadAccount(String),

    /// Wrong passphrase or corrupted backup ciphertext. The two cases are
    /// intentionally not distinguished; telling them apart would hand an
    /// attacker probing the store a passphrase oracle.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Structurally malformed backup record (bad JSON, bad field encoding,
    /// unsupported format version)
    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    /// Invalid amount (negative, too precise, out of range)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Memo exceeds the byte limit
    #[error("Memo too long: {0}")]
    MemoTooLong(String),

    /// Invalid ledger address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid application identifier
    #[error("Invalid app-id: {0}")]
    InvalidAppId(String),

    /// Account does not exist (locally or on the ledger)
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account exists but has not opened a trust line for the wallet asset
    #[error("Account not activated: {0}")]
    AccountNotActivated(String),

    /// Operation attempted on a deleted account handle
    #[error("Account is deleted, operations on a deleted account are not allowed")]
    AccountDeleted,

    /// Source account balance cannot cover the payment
    #[error("Not enough funds in source account")]
    InsufficientFunds,

    /// Ledger rejected the submitted transaction; carries the raw result
    /// codes for diagnostics
    #[error("Transaction failed: {}", format_result_codes(.transaction_code, .operation_codes))]
    TransactionFailed {
        /// Transaction-level result code, when the ledger reported one
        transaction_code: Option<String>,
        /// Per-operation result codes, in operation order
        operation_codes: Vec<String>,
    },

    /// Generic I/O or transport failure
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_result_codes(transaction_code: &Option<String>, operation_codes: &[String]) -> String {
    let tx = transaction_code.as_deref().unwrap_or("unknown");
    if operation_codes.is_empty() {
        tx.to_string()
    } else {
        format!("{} [{}]", tx, operation_codes.join(", "))
    }
}

impl Error {
    /// Get error category for logging/metrics
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::CreateAccount(_) | Error::DeleteAccount(_) | Error::LoadAccount(_) => {
                ErrorCategory::Storage
            }
            Error::Crypto(_) | Error::CorruptedData(_) => ErrorCategory::Crypto,
            Error::InvalidAmount(_) => ErrorCategory::Amount,
            Error::MemoTooLong(_) => ErrorCategory::Memo,
            Error::InvalidAddress(_) | Error::InvalidAppId(_) => ErrorCategory::Validation,
            Error::AccountNotFound(_)
            | Error::AccountNotActivated(_)
            | Error::AccountDeleted => ErrorCategory::Account,
            Error::InsufficientFunds | Error::TransactionFailed { .. } => {
                ErrorCategory::Transaction
            }
            Error::OperationFailed(_) => ErrorCategory::Network,
            Error::Io(_) | Error::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Check whether the error was raised by input validation, before any
    /// network or storage side effect
    pub fn is_validation(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Amount | ErrorCategory::Memo | ErrorCategory::Validation
        )
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Amount-related errors
    Amount,
    /// Memo-related errors
    Memo,
    /// Address and identifier validation errors
    Validation,
    /// Account lifecycle errors
    Account,
    /// Transaction submission errors
    Transaction,
    /// Crypto and backup-record errors
    Crypto,
    /// Local persistence errors
    Storage,
    /// Network/transport errors
    Network,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Amount => write!(f, "Amount"),
            ErrorCategory::Memo => write!(f, "Memo"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Account => write!(f, "Account"),
            ErrorCategory::Transaction => write!(f, "Transaction"),
            ErrorCategory::Crypto => write!(f, "Crypto"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Network => write!(f, "Network"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::InvalidAmount("test".to_string()).category(),
            ErrorCategory::Amount
        );
        assert_eq!(
            Error::MemoTooLong("test".to_string()).category(),
            ErrorCategory::Memo
        );
        assert_eq!(
            Error::Crypto("test".to_string()).category(),
            ErrorCategory::Crypto
        );
        assert_eq!(Error::AccountDeleted.category(), ErrorCategory::Account);
        assert_eq!(
            Error::InsufficientFunds.category(),
            ErrorCategory::Transaction
        );
    }

    #[test]
    fn test_validation_errors_detected() {
        assert!(Error::InvalidAmount("x".to_string()).is_validation());
        assert!(Error::MemoTooLong("x".to_string()).is_validation());
        assert!(Error::InvalidAddress("x".to_string()).is_validation());
        assert!(!Error::InsufficientFunds.is_validation());
        assert!(!Error::OperationFailed("x".to_string()).is_validation());
    }

    #[test]
    fn test_transaction_failed_display() {
        let err = Error::TransactionFailed {
            transaction_code: Some("tx_failed".to_string()),
            operation_codes: vec!["op_underfunded".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Transaction failed: tx_failed [op_underfunded]"
        );
    }
}
