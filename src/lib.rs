// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod utils;

use {
    anyhow::{Context, Result},
    clap::Parser,
    std::{path::PathBuf, sync::Arc},
};

// Re-export commonly used types outside of crate
pub use config::{RecordSchema, SchemaKind};
pub use data::{CandleSource, CoinbaseProvider, CsvLedgerWriter, GlobalRateLimiter, RowSink};
pub use domain::{Candle, CandleSeries, EnrichedRecord, TradeRecord};
pub use engine::{EnrichError, Pipeline, PipelineSummary, RecordEnricher, RetryPolicy, SelectionPolicy};

use config::{COINBASE, PERSISTENCE};

// CLI argument parsing
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Csv to read from (defaults to fills.csv or history.csv depending on --schema)
    #[arg(short = 'f', long = "from")]
    pub from: Option<PathBuf>,

    /// Csv to write to
    #[arg(short = 't', long = "to", default_value = PERSISTENCE.ledger.output_path)]
    pub to: PathBuf,

    /// Column layout of the input ledger
    #[arg(long, value_enum, default_value_t = SchemaKind::Fills)]
    pub schema: SchemaKind,

    /// Price service base URL
    #[arg(long, default_value = COINBASE.api.base_url)]
    pub base_url: String,

    /// Which bar of the lookup window is used as the price
    #[arg(long, value_enum, default_value_t = SelectionPolicy::First)]
    pub select: SelectionPolicy,

    /// Give up on a rate-limited lookup after this many retries (default: never)
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl Cli {
    pub fn input_path(&self) -> PathBuf {
        self.from
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.schema.schema().default_input))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            // The first call is not a retry
            max_attempts: self.max_retries.map(|r| r.saturating_add(1)),
            ..RetryPolicy::default()
        }
    }
}

/// Prices the whole ledger named by `args` against the live service.
pub async fn run(args: Cli) -> Result<PipelineSummary> {
    let schema = args.schema.schema();
    let input = args.input_path();

    log::info!(
        "Pricing {} ledger {} -> {} (select: {})",
        args.schema,
        input.display(),
        args.to.display(),
        args.select
    );
    log::info!(
        "Should take about 1 second per line: the price service allows {} requests/s",
        COINBASE.limits.requests_per_second
    );

    let rows = data::load_ledger(&input)?;
    let limiter = Arc::new(GlobalRateLimiter::new(COINBASE.limits.requests_per_second));
    let provider = CoinbaseProvider::new(args.base_url.clone(), limiter)
        .context("Failed to build HTTP client")?;

    let enricher = RecordEnricher::new(Arc::new(provider), schema, args.retry_policy(), args.select);
    let mut writer = CsvLedgerWriter::create(&args.to)?;

    Pipeline::new(enricher).run(&rows, &mut writer).await
}
