//! Transaction memos
//!
//! Every outgoing transaction carries a text memo of the form
//! `<version>-<appId>-<userMemo>`, tagging the payment with the producing
//! application. The caller-supplied part is limited to 21 UTF-8 bytes; the
//! ledger's own memo cap is 28 bytes and the difference is reserved for the
//! version/app-id tag.

use crate::{Error, Result};
use meridian_params::MEMO_VERSION_PREFIX;
use std::fmt;

/// Maximum caller-supplied memo length in UTF-8 bytes
pub const MEMO_BYTES_LIMIT: usize = 21;

/// A tagged transaction memo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo(String);

impl Memo {
    /// Build the tagged memo for a transaction.
    ///
    /// The user memo is trimmed of surrounding whitespace before the length
    /// check and the tag. A missing memo still produces the bare tag, so
    /// every transaction is attributable to its application.
    pub fn tagged(app_id: &str, user_memo: Option<&str>) -> Result<Self> {
        let user = user_memo.unwrap_or("").trim();
        if user.len() > MEMO_BYTES_LIMIT {
            return Err(Error::MemoTooLong(format!(
                "memo can't be longer than {MEMO_BYTES_LIMIT} bytes (UTF-8 characters)"
            )));
        }
        Ok(Self(format!("{MEMO_VERSION_PREFIX}-{app_id}-{user}")))
    }

    /// The full tagged memo text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tagged memo length in UTF-8 bytes
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagging() {
        let memo = Memo::tagged("1a2b", Some("lunch")).unwrap();
        assert_eq!(memo.as_str(), "1-1a2b-lunch");
    }

    #[test]
    fn test_empty_memo_still_tagged() {
        let memo = Memo::tagged("1a2b", None).unwrap();
        assert_eq!(memo.as_str(), "1-1a2b-");
    }

    #[test]
    fn test_whitespace_trimmed_before_tagging() {
        let memo = Memo::tagged("1a2b", Some("  lunch \n")).unwrap();
        assert_eq!(memo.as_str(), "1-1a2b-lunch");
    }

    #[test]
    fn test_limit_is_in_bytes_not_chars() {
        // 21 ASCII bytes: fine
        assert!(Memo::tagged("1a2b", Some(&"a".repeat(21))).is_ok());
        assert!(Memo::tagged("1a2b", Some(&"a".repeat(22))).is_err());
        // 8 snowmen are 24 UTF-8 bytes
        assert!(Memo::tagged("1a2b", Some(&"\u{2603}".repeat(8))).is_err());
        assert!(Memo::tagged("1a2b", Some(&"\u{2603}".repeat(7))).is_ok());
    }

    #[test]
    fn test_trim_applies_before_limit() {
        let padded = format!("  {}  ", "a".repeat(21));
        assert!(Memo::tagged("1a2b", Some(&padded)).is_ok());
    }
}
