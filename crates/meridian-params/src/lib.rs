//! Meridian network definitions
//!
//! Network parameters, asset descriptors, and application identifier
//! validation shared by every other Meridian wallet crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod app_id;
pub mod asset;
pub mod network;

pub use app_id::{is_valid_app_id, APP_ID_MAX_LEN, APP_ID_MIN_LEN};
pub use asset::Asset;
pub use network::{Environment, Network, NetworkType};

/// Version tag prepended to every transaction memo, ahead of the app-id.
///
/// Wire form of a tagged memo: `<version>-<appId>-<userMemo>`.
pub const MEMO_VERSION_PREFIX: &str = "1";
