use {
    crate::utils::epoch_sec_to_utc,
    chrono::{DateTime, Utc},
};

/// One bar from the candles endpoint. Only the fields used for pricing are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Start of the bar's interval, epoch seconds.
    pub timestamp: i64,
    pub close_price: f64,
    pub volume: f64,
}

/// Bars returned for one lookup window, in the order the service sent them.
pub type CandleSeries = Vec<Candle>;

impl Candle {
    // A constructor for convenience
    pub fn new(timestamp: i64, close_price: f64, volume: f64) -> Self {
        Candle {
            timestamp,
            close_price,
            volume,
        }
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        epoch_sec_to_utc(self.timestamp)
    }
}
