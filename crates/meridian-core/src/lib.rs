//! Meridian wallet core
//!
//! This crate implements the wallet domain model: account key pairs and
//! addresses, fixed-point amounts, tagged memos, and transaction envelope
//! building, signing, and hashing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod error;
pub mod keys;
pub mod memo;
pub mod transaction;

pub use address::{Address, ADDRESS_RAW_LEN};
pub use amount::{Amount, AMOUNT_DECIMALS, GRAINS_PER_UNIT};
pub use error::{Error, ErrorCategory, Result};
pub use keys::KeyPair;
pub use memo::{Memo, MEMO_BYTES_LIMIT};
pub use transaction::{
    Envelope, Operation, SignedEnvelope, Transaction, TransactionId, BASE_FEE,
};
