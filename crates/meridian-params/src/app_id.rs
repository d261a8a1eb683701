//! Application identifier validation
//!
//! Every transaction memo is tagged with the application id of the wallet
//! that produced it, so the provenance of payments can be tracked on-ledger.
//! An app-id is 3-4 ASCII alphanumeric characters (e.g. `1234`, `2ab3`,
//! `bcda`).

/// Minimum app-id length
pub const APP_ID_MIN_LEN: usize = 3;

/// Maximum app-id length
pub const APP_ID_MAX_LEN: usize = 4;

/// Check whether `app_id` is a well-formed application identifier.
///
/// The empty string is not well-formed; callers that tolerate it (with a
/// warning) must check for it separately.
pub fn is_valid_app_id(app_id: &str) -> bool {
    (APP_ID_MIN_LEN..=APP_ID_MAX_LEN).contains(&app_id.len())
        && app_id.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_app_ids() {
        assert!(is_valid_app_id("1234"));
        assert!(is_valid_app_id("2ab3"));
        assert!(is_valid_app_id("cd2"));
        assert!(is_valid_app_id("fqa"));
    }

    #[test]
    fn test_invalid_app_ids() {
        assert!(!is_valid_app_id(""));
        assert!(!is_valid_app_id("ab"));
        assert!(!is_valid_app_id("abcde"));
        assert!(!is_valid_app_id("ab!d"));
        assert!(!is_valid_app_id("ab d"));
    }
}
