use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    ledger_pricer::{
        Candle, CandleSeries, CandleSource, CsvLedgerWriter, EnrichError, Pipeline, RecordEnricher,
        RetryPolicy, SchemaKind, SelectionPolicy, TradeRecord,
        data::{PriceLookupError, load_ledger},
        domain::ProductPair,
    },
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Serves one fixed bar per request, optionally rate limiting every other call (the first of each pair).
struct FixedBarSource {
    close: f64,
    timestamp: i64,
    calls: AtomicUsize,
    throttle_every_other: bool,
}

impl FixedBarSource {
    fn new(close: f64, timestamp: i64) -> Self {
        Self {
            close,
            timestamp,
            calls: AtomicUsize::new(0),
            throttle_every_other: false,
        }
    }
}

#[async_trait]
impl CandleSource for FixedBarSource {
    async fn fetch_candles(
        &self,
        _pair: &ProductPair,
        _start: DateTime<Utc>,
    ) -> Result<CandleSeries, PriceLookupError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.throttle_every_other && n % 2 == 0 {
            return Err(PriceLookupError::Status {
                status: 429,
                body: r#"{"message":"Rate limit exceeded"}"#.to_string(),
            });
        }
        Ok(vec![Candle::new(self.timestamp, self.close, 1000.0)])
    }
}

fn rows(raw: &[&[&str]]) -> Vec<TradeRecord> {
    raw.iter()
        .map(|r| TradeRecord::new(r.iter().map(|c| c.to_string()).collect()))
        .collect()
}

fn history_pipeline(source: Arc<FixedBarSource>) -> Pipeline {
    Pipeline::new(RecordEnricher::new(
        source,
        SchemaKind::History.schema(),
        RetryPolicy::immediate(None),
        SelectionPolicy::First,
    ))
}

const JAN_2_0300: i64 = 1_609_556_400;

#[tokio::test]
async fn history_scenario_appends_price_columns() {
    let source = Arc::new(FixedBarSource::new(105.0, JAN_2_0300));
    let input = rows(&[
        &["id", "time", "amount", "type", "unit"],
        &["id1", "2021-01-02T03:04:05Z", "10.0", "BTC-trade", "btc"],
    ]);

    let mut out: Vec<Vec<String>> = Vec::new();
    let summary = history_pipeline(source).run(&input, &mut out).await.unwrap();

    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.rows_enriched, 1);
    assert_eq!(
        out[0],
        ["id", "time", "amount", "type", "unit", "usd-amount", "usd-price", "price-date"].map(String::from)
    );
    assert_eq!(
        out[1],
        ["id1", "2021-01-02T03:04:05Z", "10.0", "BTC-trade", "btc", "1050.000000", "105.000000", "2021-01-02T03:00:00"]
            .map(String::from)
    );
}

#[tokio::test]
async fn output_preserves_row_count_and_order() {
    let source = Arc::new(FixedBarSource {
        throttle_every_other: true,
        ..FixedBarSource::new(2.0, JAN_2_0300)
    });
    let mut raw: Vec<Vec<String>> = vec![vec!["id".into(), "time".into(), "amount".into(), "type".into(), "unit".into()]];
    for i in 1..=25 {
        raw.push(vec![
            format!("id{i}"),
            "2021-01-02 03:04:05+00".into(),
            format!("{i}"),
            "trade".into(),
            "eth".into(),
        ]);
    }
    let input: Vec<TradeRecord> = raw.iter().cloned().map(TradeRecord::new).collect();

    let mut out: Vec<Vec<String>> = Vec::new();
    history_pipeline(source.clone())
        .with_progress_every(10)
        .run(&input, &mut out)
        .await
        .unwrap();

    assert_eq!(out.len(), input.len());
    for (i, row) in out.iter().enumerate().skip(1) {
        assert_eq!(row[..5], raw[i][..]);
        assert_eq!(row[5], format!("{:.6}", i as f64 * 2.0));
    }
    // Every row was rate limited once before succeeding
    assert_eq!(source.calls.load(Ordering::SeqCst), 50);
}

#[tokio::test]
async fn bad_timestamp_aborts_before_later_rows() {
    let source = Arc::new(FixedBarSource::new(105.0, JAN_2_0300));
    let input = rows(&[
        &["id", "time", "amount", "type", "unit"],
        &["id1", "2021-01-02T03:04:05Z", "10.0", "trade", "btc"],
        &["id2", "not-a-date", "10.0", "trade", "btc"],
        &["id3", "2021-01-02T03:04:05Z", "10.0", "trade", "btc"],
    ]);

    let mut out: Vec<Vec<String>> = Vec::new();
    let err = history_pipeline(source.clone()).run(&input, &mut out).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<EnrichError>(),
        Some(EnrichError::InvalidTimestamp(raw)) if raw == "not-a-date"
    ));
    assert!(format!("{err:#}").contains("Row 3 of 4"));
    assert_eq!(out.len(), 2, "header and first row only");
    assert!(out.iter().all(|r| r[0] != "id2" && r[0] != "id3"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fills_file_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input_path = dir.path().join("fills.csv");
    let output_path = dir.path().join("modified.csv");
    std::fs::write(
        &input_path,
        "portfolio,trade id,product,created at,size,size unit,price,fee,total,price/fee/total unit\n\
         default,1,BTC-USD,2021-01-02T03:04:05.123456Z,0.5,BTC,100,0.1,-50,USD\n",
    )?;

    let source = Arc::new(FixedBarSource::new(105.0, JAN_2_0300));
    let pipeline = Pipeline::new(RecordEnricher::new(
        source,
        SchemaKind::Fills.schema(),
        RetryPolicy::immediate(None),
        SelectionPolicy::First,
    ));

    let input = load_ledger(&input_path)?;
    let mut writer = CsvLedgerWriter::create(&output_path)?;
    pipeline.run(&input, &mut writer).await?;
    drop(writer);

    let written = std::fs::read_to_string(&output_path)?;
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "portfolio,trade id,product,created at,size,size unit,usd-price,usd-total,price-date,price,fee,total,price/fee/total unit,usd-price,usd-total"
    );
    assert_eq!(
        lines[1],
        "default,1,BTC-USD,2021-01-02T03:04:05.123456Z,0.5,BTC,105.000000,52.500000,2021-01-02T03:00:00,100,0.1,-50,USD,-1.050000,52.500000"
    );
    Ok(())
}

#[tokio::test]
async fn empty_ledger_writes_nothing() {
    let source = Arc::new(FixedBarSource::new(1.0, JAN_2_0300));
    let mut out: Vec<Vec<String>> = Vec::new();
    let summary = history_pipeline(source).run(&[], &mut out).await.unwrap();
    assert_eq!(summary.rows_written, 0);
    assert!(out.is_empty());
}
