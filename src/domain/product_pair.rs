use crate::config::COINBASE;

/// Base/quote identifier used in the candles URL, e.g. `BTC-USD`.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ProductPair {
    pub base: String,
    pub quote: &'static str,
}

impl ProductPair {
    /// Builds the pair for a ledger symbol against the configured quote currency.
    pub fn for_symbol(symbol: &str) -> Self {
        Self {
            base: symbol.to_uppercase(),
            quote: COINBASE.api.quote_currency,
        }
    }
}

impl std::fmt::Display for ProductPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}
