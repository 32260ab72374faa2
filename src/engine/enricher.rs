use {
    crate::{
        config::{RecordSchema, SchemaKind},
        data::{CandleSource, PriceLookupError},
        domain::{Amounts, CandleSeries, DerivedFields, EnrichedRecord, ProductPair, TradeRecord},
        engine::{RetryDecision, RetryPolicy, SelectionPolicy},
        utils::{format_request_time, is_zero_instant, parse_ledger_time},
    },
    chrono::{DateTime, Utc},
    std::{error::Error, fmt, sync::Arc},
};

/// Anything that stops a row from being priced. All of these abort the run.
#[derive(Debug)]
pub enum EnrichError {
    MissingField { column: usize, len: usize },
    InvalidNumber { column: usize, value: String },
    InvalidTimestamp(String),
    Lookup { pair: String, source: PriceLookupError },
    RetriesExhausted { pair: String, attempts: u32, source: PriceLookupError },
    NoCandles { pair: String, start: String },
    InvalidCandleTime(i64),
}

impl fmt::Display for EnrichError {
    fn fmt(&self, f: &mut fmt::Formatter) -> std::fmt::Result {
        match self {
            EnrichError::MissingField { column, len } => {
                write!(f, "Column {} missing (row has {} fields)", column, len)
            }
            EnrichError::InvalidNumber { column, value } => {
                write!(f, "Column {} is not a number: {:?}", column, value)
            }
            EnrichError::InvalidTimestamp(raw) => write!(f, "Unrecognised timestamp: {:?}", raw),
            EnrichError::Lookup { pair, source } => {
                write!(f, "Price lookup for {} failed: {}", pair, source)
            }
            EnrichError::RetriesExhausted {
                pair,
                attempts,
                source,
            } => write!(
                f,
                "Price lookup for {} still failing after {} attempts: {}",
                pair, attempts, source
            ),
            EnrichError::NoCandles { pair, start } => {
                write!(f, "Need at least 1 price: no usable candles for {} at {}", pair, start)
            }
            EnrichError::InvalidCandleTime(ts) => write!(f, "Candle timestamp out of range: {}", ts),
        }
    }
}

impl Error for EnrichError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnrichError::Lookup { source, .. } | EnrichError::RetriesExhausted { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

fn field(record: &TradeRecord, column: usize) -> Result<&str, EnrichError> {
    record.field(column).ok_or(EnrichError::MissingField {
        column,
        len: record.fields.len(),
    })
}

fn number(record: &TradeRecord, column: usize) -> Result<f64, EnrichError> {
    let raw = field(record, column)?;
    raw.parse::<f64>().map_err(|_| EnrichError::InvalidNumber {
        column,
        value: raw.to_string(),
    })
}

/// Prices one ledger row: parse, look up (with retries), select a bar, derive, splice.
pub struct RecordEnricher {
    source: Arc<dyn CandleSource>,
    schema: &'static RecordSchema,
    retry: RetryPolicy,
    selection: SelectionPolicy,
}

impl RecordEnricher {
    pub fn new(
        source: Arc<dyn CandleSource>,
        schema: &'static RecordSchema,
        retry: RetryPolicy,
        selection: SelectionPolicy,
    ) -> Self {
        Self {
            source,
            schema,
            retry,
            selection,
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    fn amounts(&self, record: &TradeRecord) -> Result<Amounts, EnrichError> {
        let value = number(record, self.schema.amount_col)?;
        match (self.schema.kind, self.schema.secondary_size_col) {
            (SchemaKind::Fills, Some(col)) => Ok(Amounts::Fills {
                value,
                secondary_size: number(record, col)?,
            }),
            // A fills layout without a size column prices like history
            (SchemaKind::Fills, None) | (SchemaKind::History, _) => {
                Ok(Amounts::History { amount: value })
            }
        }
    }

    async fn fetch_with_retry(
        &self,
        pair: &ProductPair,
        start: DateTime<Utc>,
    ) -> Result<CandleSeries, EnrichError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let err = match self.source.fetch_candles(pair, start).await {
                Ok(series) => return Ok(series),
                Err(err) => err,
            };

            match self.retry.decide(&err, attempts) {
                RetryDecision::Retry(delay) => {
                    log::warn!(
                        "{} rate limited (attempt {}), retrying in {:.1}s",
                        pair,
                        attempts,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Fatal => {
                    return Err(EnrichError::Lookup {
                        pair: pair.to_string(),
                        source: err,
                    });
                }
                RetryDecision::Exhausted => {
                    return Err(EnrichError::RetriesExhausted {
                        pair: pair.to_string(),
                        attempts,
                        source: err,
                    });
                }
            }
        }
    }

    pub async fn enrich(&self, record: &TradeRecord) -> Result<EnrichedRecord, EnrichError> {
        let schema = self.schema;

        // Numbers first so a bad row fails before any network traffic
        let amounts = self.amounts(record)?;
        let raw_time = field(record, schema.timestamp_col)?;
        let symbol = field(record, schema.symbol_col)?;

        let instant = parse_ledger_time(raw_time)
            .filter(|t| !is_zero_instant(t))
            .ok_or_else(|| EnrichError::InvalidTimestamp(raw_time.to_string()))?;
        let pair = ProductPair::for_symbol(symbol);

        let series = self.fetch_with_retry(&pair, instant).await?;
        let candle = self
            .selection
            .select(&series, instant)
            .ok_or_else(|| EnrichError::NoCandles {
                pair: pair.to_string(),
                start: format_request_time(&instant),
            })?;

        let candle_time = candle
            .start_time()
            .ok_or(EnrichError::InvalidCandleTime(candle.timestamp))?;
        let derived =
            DerivedFields::compute(amounts, candle.close_price, &format_request_time(&candle_time));

        Ok(EnrichedRecord::assemble(schema, record, derived))
    }
}
