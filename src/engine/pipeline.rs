use {
    crate::{
        config::PERSISTENCE,
        data::RowSink,
        domain::TradeRecord,
        engine::RecordEnricher,
    },
    anyhow::{Context, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub rows_written: usize,
    pub rows_enriched: usize,
}

/// Drives the enricher over a whole ledger. Row 0 is the header.
pub struct Pipeline {
    enricher: RecordEnricher,
    progress_every: usize,
}

impl Pipeline {
    pub fn new(enricher: RecordEnricher) -> Self {
        Self {
            enricher,
            progress_every: PERSISTENCE.progress.every_rows,
        }
    }

    pub fn with_progress_every(mut self, rows: usize) -> Self {
        self.progress_every = rows.max(1);
        self
    }

    /// Writes every row to `sink` in input order. The first fatal row stops the run: it and
    /// everything after it are never written, rows before it stay flushed in the sink.
    pub async fn run(&self, rows: &[TradeRecord], sink: &mut dyn RowSink) -> Result<PipelineSummary> {
        let total = rows.len();
        let schema = self.enricher.schema();
        let mut summary = PipelineSummary {
            rows_written: 0,
            rows_enriched: 0,
        };

        for (i, record) in rows.iter().enumerate() {
            if i % self.progress_every == 0 {
                log::info!("Completed {}/{}", i, total);
            }

            if i == 0 {
                sink.write_row(&schema.rewrite_header(&record.fields))?;
                summary.rows_written += 1;
                continue;
            }

            let enriched = match self.enricher.enrich(record).await {
                Ok(enriched) => enriched,
                Err(e) => {
                    sink.flush()?;
                    return Err(anyhow::Error::new(e))
                        .with_context(|| format!("Row {} of {} could not be priced", i + 1, total));
                }
            };
            sink.write_row(enriched.fields())?;
            summary.rows_written += 1;
            summary.rows_enriched += 1;
        }

        sink.flush()?;
        log::info!("Completed {}/{}", total, total);
        Ok(summary)
    }
}
