use {
    crate::{
        config::COINBASE,
        domain::{Candle, CandleSeries, ProductPair},
        utils::format_request_time,
    },
    chrono::{DateTime, TimeDelta, Utc},
    serde::Deserialize,
    serde_json::Value,
    std::{error::Error, fmt},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupErrorKind {
    RateLimited,
    Status,
    Network,
    Decode,
}

#[derive(Debug)]
pub enum PriceLookupError {
    /// Non-success status. `body` is the raw response text.
    Status { status: u16, body: String },
    Network(String),
    Decode(String),
}

impl PriceLookupError {
    /// True when the service told us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            PriceLookupError::Status { body, .. } => body.contains(COINBASE.retry.rate_limit_marker),
            _ => false,
        }
    }

    pub fn kind(&self) -> LookupErrorKind {
        match self {
            _ if self.is_rate_limited() => LookupErrorKind::RateLimited,
            PriceLookupError::Status { .. } => LookupErrorKind::Status,
            PriceLookupError::Network(_) => LookupErrorKind::Network,
            PriceLookupError::Decode(_) => LookupErrorKind::Decode,
        }
    }
}

impl fmt::Display for PriceLookupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            PriceLookupError::Status { status, body } => {
                write!(f, "Status code was not 200 ({}): {}", status, body)
            }
            PriceLookupError::Network(msg) => write!(f, "Candles API request failed: {}", msg),
            PriceLookupError::Decode(msg) => write!(f, "Candles API response not decodable: {}", msg),
        }
    }
}

impl Error for PriceLookupError {}

impl From<reqwest::Error> for PriceLookupError {
    fn from(err: reqwest::Error) -> Self {
        PriceLookupError::Network(err.to_string())
    }
}

/// Error payload the service sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// `<base>/products/<PAIR>/candles?start=..&end=..` covering `[start, start + window)`.
pub fn candles_url(base_url: &str, pair: &ProductPair, start: &DateTime<Utc>) -> String {
    let end = *start + TimeDelta::seconds(COINBASE.limits.lookup_window_secs);
    format!(
        "{}/products/{}/candles?start={}&end={}",
        base_url.trim_end_matches('/'),
        pair,
        format_request_time(start),
        format_request_time(&end)
    )
}

/// Turns a status + body into either the decoded rows or a classified error.
pub fn decode_response(status: u16, body: &str) -> Result<Vec<Vec<Value>>, PriceLookupError> {
    if !(200..300).contains(&status) {
        if let Ok(api) = serde_json::from_str::<ApiMessage>(body) {
            log::warn!("Candles API answered {}: {}", status, api.message);
        }
        return Err(PriceLookupError::Status {
            status,
            body: body.to_string(),
        });
    }
    serde_json::from_str(body).map_err(|e| PriceLookupError::Decode(e.to_string()))
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// `[time, low, high, open, close, volume]` -> Candle. `None` if time, close or volume is unusable.
fn candle_from_row(row: &[Value]) -> Option<Candle> {
    let timestamp = value_as_i64(row.first()?)?;
    let volume = value_as_f64(row.get(5)?)?;
    let close_price = value_as_f64(row.get(4)?)?;
    Some(Candle::new(timestamp, close_price, volume))
}

/// Keeps the rows that parse, in order. Bad rows are dropped, never retried.
pub fn convert_rows(rows: &[Vec<Value>]) -> CandleSeries {
    rows.iter()
        .filter_map(|row| {
            let candle = candle_from_row(row);
            if candle.is_none() {
                log::debug!("Dropping unusable candle row: {:?}", row);
            }
            candle
        })
        .collect()
}
