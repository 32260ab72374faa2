use {
    crate::{
        config::COINBASE,
        data::{
            Throttle,
            candles_api::{PriceLookupError, candles_url, convert_rows, decode_response},
        },
        domain::{CandleSeries, ProductPair},
    },
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    std::sync::Arc,
};

/// Abstract interface for fetching historical bars.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Bars covering the lookup window that starts at `start`. Unusable rows are already filtered
    /// out, so the series may be empty.
    async fn fetch_candles(
        &self,
        pair: &ProductPair,
        start: DateTime<Utc>,
    ) -> Result<CandleSeries, PriceLookupError>;
}

/// Talks to the public candles endpoint over HTTP, one permit per request.
pub struct CoinbaseProvider {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<dyn Throttle>,
}

impl CoinbaseProvider {
    pub fn new(base_url: impl Into<String>, limiter: Arc<dyn Throttle>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(COINBASE.api.user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            limiter,
        })
    }
}

#[async_trait]
impl CandleSource for CoinbaseProvider {
    async fn fetch_candles(
        &self,
        pair: &ProductPair,
        start: DateTime<Utc>,
    ) -> Result<CandleSeries, PriceLookupError> {
        let url = candles_url(&self.base_url, pair, &start);
        let context = pair.to_string();

        // Permit right before the call so the limiter bounds rate, not queue depth
        self.limiter.acquire(&context).await;
        log::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let rows = decode_response(status, &body)?;
        Ok(convert_rows(&rows))
    }
}
