mod candles_api;
mod ledger_io;
mod provider;
mod rate_limiter;

pub use {
    candles_api::{LookupErrorKind, PriceLookupError, candles_url, convert_rows, decode_response},
    ledger_io::{CsvLedgerWriter, RowSink, load_ledger},
    provider::{CandleSource, CoinbaseProvider},
    rate_limiter::{GlobalRateLimiter, NoThrottle, Throttle},
};
