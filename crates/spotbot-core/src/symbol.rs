//! Trading pair identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange symbol for a trading pair (e.g., "ETHBTC").
///
/// Symbols are the primary key for subscriptions, filters, and trades.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this pair is quoted in the given base currency.
    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.0.ends_with(quote)
    }

    /// The traded asset, with the quote suffix stripped.
    ///
    /// "ETHBTC" with quote "BTC" yields "ETH". Returns the full symbol
    /// unchanged when the suffix does not match.
    pub fn base_asset<'a>(&'a self, quote: &str) -> &'a str {
        self.0.strip_suffix(quote).unwrap_or(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_quoted_in() {
        let sym = Symbol::new("ETHBTC");
        assert!(sym.is_quoted_in("BTC"));
        assert!(!sym.is_quoted_in("USDT"));
    }

    #[test]
    fn test_base_asset() {
        let sym = Symbol::new("ETHBTC");
        assert_eq!(sym.base_asset("BTC"), "ETH");
    }

    #[test]
    fn test_base_asset_no_match() {
        let sym = Symbol::new("ETHBTC");
        assert_eq!(sym.base_asset("USDT"), "ETHBTC");
    }
}
