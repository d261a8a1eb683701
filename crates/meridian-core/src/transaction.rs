//! Transaction envelope building, signing, and hashing
//!
//! An [`Envelope`] is the ordered, deterministic form of a transaction: the
//! source account, its next sequence number, a fee, an optional memo, and
//! one or more operations. Signing binds the envelope to a network through
//! the network passphrase, so the envelope hash (and therefore the
//! transaction id) computed locally before submission is the same hash the
//! ledger reports on success.

use crate::{Address, Amount, Error, KeyPair, Memo, Result};
use ed25519_dalek::Signature;
use meridian_params::Asset;
use sha2::{Digest, Sha256};
use std::fmt;

/// Base fee per operation, in grains
pub const BASE_FEE: u32 = 100;

/// Envelope serialization format version
const ENVELOPE_VERSION: u8 = 1;

/// A single ledger operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Move `amount` of `asset` from the envelope source to `destination`
    Payment {
        /// Receiving account
        destination: Address,
        /// Asset being moved
        asset: Asset,
        /// Payment amount
        amount: Amount,
    },
    /// Open (or resize) the source account's trust line for `asset`
    ChangeTrust {
        /// Asset to trust
        asset: Asset,
        /// Maximum amount the account is willing to hold
        limit: Amount,
    },
}

impl Operation {
    fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Operation::Payment {
                destination,
                asset,
                amount,
            } => {
                out.push(0);
                out.extend_from_slice(destination.as_bytes());
                write_asset(out, asset);
                out.extend_from_slice(&amount.grains().to_le_bytes());
            }
            Operation::ChangeTrust { asset, limit } => {
                out.push(1);
                write_asset(out, asset);
                out.extend_from_slice(&limit.grains().to_le_bytes());
            }
        }
    }
}

fn write_asset(out: &mut Vec<u8>, asset: &Asset) {
    write_bytes(out, asset.code.as_bytes());
    write_bytes(out, asset.issuer.as_bytes());
}

fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
}

/// An unsigned transaction envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    source: Address,
    sequence: u64,
    fee: u32,
    memo: Option<Memo>,
    operations: Vec<Operation>,
}

impl Envelope {
    /// Build an envelope for `source` at sequence number `sequence`
    pub fn new(source: Address, sequence: u64) -> Self {
        Self {
            source,
            sequence,
            fee: BASE_FEE,
            memo: None,
            operations: Vec::new(),
        }
    }

    /// Attach a memo
    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }

    /// Append an operation
    pub fn add_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Source account
    pub fn source(&self) -> &Address {
        &self.source
    }

    /// Sequence number the envelope was built for
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Attached memo, if any
    pub fn memo(&self) -> Option<&Memo> {
        self.memo.as_ref()
    }

    /// Operations in execution order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Deterministic payload serialization.
    ///
    /// Layout: version byte, source (32), sequence (u64 LE), fee (u32 LE),
    /// length-prefixed memo bytes (length 0 when absent), operation count
    /// (u32 LE), then each operation tag + fields.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + 64 * self.operations.len());
        out.push(ENVELOPE_VERSION);
        out.extend_from_slice(self.source.as_bytes());
        out.extend_from_slice(&self.sequence.to_le_bytes());
        out.extend_from_slice(&self.fee.to_le_bytes());
        match &self.memo {
            Some(memo) => write_bytes(&mut out, memo.as_str().as_bytes()),
            None => write_bytes(&mut out, &[]),
        }
        out.extend_from_slice(&(self.operations.len() as u32).to_le_bytes());
        for op in &self.operations {
            op.write_to(&mut out);
        }
        out
    }

    /// Content hash of the envelope on the given network.
    ///
    /// The network passphrase digest is mixed in ahead of the payload, so
    /// the same envelope has different hashes (and signatures) on different
    /// networks.
    pub fn hash(&self, network_passphrase: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(Sha256::digest(network_passphrase.as_bytes()));
        hasher.update(self.to_bytes());
        hasher.finalize().into()
    }

    /// Sign the envelope with the source account's key pair.
    ///
    /// Fails when the envelope is empty, when `key_pair` is watch-only, or
    /// when `key_pair` is not the envelope source.
    pub fn sign(self, key_pair: &KeyPair, network_passphrase: &str) -> Result<SignedEnvelope> {
        if self.operations.is_empty() {
            return Err(Error::OperationFailed(
                "envelope has no operations".to_string(),
            ));
        }
        if key_pair.address() != self.source {
            return Err(Error::OperationFailed(
                "signing key does not match envelope source".to_string(),
            ));
        }
        let hash = self.hash(network_passphrase);
        let signature = key_pair.sign(&hash)?;
        Ok(SignedEnvelope {
            envelope: self,
            signature,
            hash,
        })
    }
}

/// A signed, submittable transaction envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    envelope: Envelope,
    signature: Signature,
    hash: [u8; 32],
}

impl SignedEnvelope {
    /// The signed envelope
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The source account's signature over the envelope hash
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The envelope hash the signature covers
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// The transaction id derived from the envelope hash
    pub fn id(&self) -> TransactionId {
        TransactionId::from_hash(&self.hash)
    }

    /// Wire form: payload followed by the 64-byte signature
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.envelope.to_bytes();
        out.extend_from_slice(&self.signature.to_bytes());
        out
    }
}

/// An opaque transaction identifier (hex-encoded envelope hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Id for a raw envelope hash
    pub fn from_hash(hash: &[u8; 32]) -> Self {
        Self(hex::encode(hash))
    }

    /// Wrap an id string reported by the ledger
    pub fn from_hex(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The hex id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable, fully built payment transaction.
///
/// Produced by the transaction sender after validation and signing; the id
/// is derived from the signed envelope's hash, never assigned by a caller.
#[derive(Debug, Clone)]
pub struct Transaction {
    destination: Address,
    source: Address,
    amount: Amount,
    memo: Memo,
    id: TransactionId,
    envelope: SignedEnvelope,
}

impl Transaction {
    /// Assemble a transaction value from its signed envelope
    pub fn new(
        destination: Address,
        source: Address,
        amount: Amount,
        memo: Memo,
        envelope: SignedEnvelope,
    ) -> Self {
        let id = envelope.id();
        Self {
            destination,
            source,
            amount,
            memo,
            id,
            envelope,
        }
    }

    /// Receiving account
    pub fn destination(&self) -> &Address {
        &self.destination
    }

    /// Paying account
    pub fn source(&self) -> &Address {
        &self.source
    }

    /// Payment amount
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Tagged memo attached to the payment
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Transaction id (hex hash of the signed envelope)
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// The signed envelope to submit
    pub fn envelope(&self) -> &SignedEnvelope {
        &self.envelope
    }
}
