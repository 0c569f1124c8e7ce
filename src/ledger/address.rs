//! Canonical account address representation.
//!
//! Every address that enters the controller, whether from the wallet provider,
//! configuration or user input, passes through [`canonicalize`]. Only the
//! `0x` prefix is normalized here; hex content and length are left to the
//! ledger unless strict validation is requested.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of hex digits in an account address (32 bytes).
pub const MAX_ADDRESS_HEX_LEN: usize = 64;

/// A `0x`-prefixed address string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CanonicalAddress(String);

/// Normalize a user-supplied address into canonical form.
///
/// Strips any leading `0x`/`0X` prefixes, then prepends exactly one `0x`.
/// Idempotent for every input.
pub fn canonicalize(raw: &str) -> CanonicalAddress {
    let mut body = raw;
    while let Some(rest) = strip_hex_prefix(body) {
        body = rest;
    }
    CanonicalAddress(format!("0x{}", body))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

impl CanonicalAddress {
    /// Canonicalize `raw`. Same as [`canonicalize`].
    pub fn new(raw: &str) -> Self {
        canonicalize(raw)
    }

    /// The full `0x`-prefixed string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The address without its `0x` prefix.
    pub fn body(&self) -> &str {
        &self.0[2..]
    }

    /// True when there is anything after the prefix.
    pub fn is_well_formed(&self) -> bool {
        !self.body().is_empty()
    }

    /// Check the body is 1 to 64 hex digits.
    pub fn validate_strict(&self) -> Result<(), String> {
        let body = self.body();
        if body.is_empty() {
            return Err("address is empty".to_string());
        }
        if body.len() > MAX_ADDRESS_HEX_LEN {
            return Err(format!(
                "address has {} hex digits, at most {} allowed",
                body.len(),
                MAX_ADDRESS_HEX_LEN
            ));
        }
        if let Some(c) = body.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(format!("address contains non-hex character '{}'", c));
        }
        Ok(())
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CanonicalAddress {
    fn from(raw: String) -> Self {
        canonicalize(&raw)
    }
}

impl From<&str> for CanonicalAddress {
    fn from(raw: &str) -> Self {
        canonicalize(raw)
    }
}

impl From<CanonicalAddress> for String {
    fn from(address: CanonicalAddress) -> Self {
        address.0
    }
}

impl AsRef<str> for CanonicalAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_prefix() {
        assert_eq!(canonicalize("abc123").as_str(), "0xabc123");
    }

    #[test]
    fn test_keeps_single_prefix() {
        assert_eq!(canonicalize("0xabc123").as_str(), "0xabc123");
        assert_eq!(canonicalize("0Xabc123").as_str(), "0xabc123");
    }

    #[test]
    fn test_collapses_repeated_prefixes() {
        assert_eq!(canonicalize("0x0Xabc").as_str(), "0xabc");
    }

    #[test]
    fn test_idempotent() {
        let inputs = ["", "0x", "abc", "0xABC", "0X0x1", "  f00", "0xg"];
        for input in inputs {
            let once = canonicalize(input);
            let twice = canonicalize(once.as_str());
            assert_eq!(once, twice, "input {:?}", input);
            assert!(once.as_str().starts_with("0x"));
            assert!(strip_hex_prefix(once.body()).is_none());
        }
    }

    #[test]
    fn test_well_formed() {
        assert!(!canonicalize("").is_well_formed());
        assert!(!canonicalize("0x").is_well_formed());
        assert!(canonicalize("0x1").is_well_formed());
    }

    #[test]
    fn test_strict_validation() {
        assert!(canonicalize("0xAbC123").validate_strict().is_ok());
        assert!(canonicalize("0x").validate_strict().is_err());
        assert!(canonicalize("xyz").validate_strict().unwrap_err().contains("non-hex"));
        let too_long = "1".repeat(MAX_ADDRESS_HEX_LEN + 1);
        assert!(canonicalize(&too_long).validate_strict().is_err());
    }

    #[test]
    fn test_serde_canonicalizes() {
        let address: CanonicalAddress = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(address.as_str(), "0xabc");
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"0xabc\"");
    }
}
