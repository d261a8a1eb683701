//! Encrypted account key storage
//!
//! Persists account key pairs encrypted at rest, scoped by a caller-chosen
//! store key, and implements the portable passphrase-protected backup
//! record used for account export and import. Plaintext secret keys never
//! touch the disk; everything persisted goes through the backup codec.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backup;
pub mod store;

pub use backup::{BackupRecord, KdfParams, RECORD_VERSION};
pub use meridian_core::{Error, Result};
pub use store::KeyStore;
