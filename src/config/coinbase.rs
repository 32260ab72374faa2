use crate::utils::TimeUtils;

/// Endpoint and wire-format settings for the historical candles API.
pub struct ApiConfig {
    pub base_url: &'static str,
    pub quote_currency: &'static str,
    pub user_agent: &'static str,
    /// chrono layout for the `start`/`end` query params (UTC, no fractional seconds).
    pub request_time_format: &'static str,
}

/// REST constraints: permit rate and the width of each lookup window.
pub struct RestLimits {
    pub requests_per_second: u32,
    /// Each lookup asks for `[instant, instant + lookup_window_secs)`.
    pub lookup_window_secs: i64,
}

pub struct RetryDefaults {
    /// Substring of an error body that marks the call as rate limited.
    pub rate_limit_marker: &'static str,
    pub backoff_ms: u64,
}

pub struct CoinbaseConfig {
    pub api: ApiConfig,
    pub limits: RestLimits,
    pub retry: RetryDefaults,
}

pub const COINBASE: CoinbaseConfig = CoinbaseConfig {
    api: ApiConfig {
        base_url: "https://api.gdax.com",
        quote_currency: "USD",
        user_agent: concat!("ledger-pricer/", env!("CARGO_PKG_VERSION")),
        request_time_format: "%Y-%m-%dT%H:%M:%S",
    },
    limits: RestLimits {
        requests_per_second: 2,
        lookup_window_secs: TimeUtils::S_IN_H,
    },
    retry: RetryDefaults {
        rate_limit_marker: "Rate limit",
        backoff_ms: 3000,
    },
};
