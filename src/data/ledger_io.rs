use {
    crate::domain::TradeRecord,
    anyhow::{Context, Result},
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::Path,
    },
};

/// Where enriched rows go, one at a time and in order.
pub trait RowSink {
    fn write_row(&mut self, fields: &[String]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// In-memory sink, handy for tests and dry runs.
impl RowSink for Vec<Vec<String>> {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        self.push(fields.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Loads every row (header included) so the total is known before processing starts.
pub fn load_ledger(path: &Path) -> Result<Vec<TradeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to read {} at line {}", path.display(), line + 1)
        })?;
        rows.push(TradeRecord::new(record.iter().map(str::to_string).collect()));
    }
    Ok(rows)
}

pub struct CsvLedgerWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvLedgerWriter<BufWriter<File>> {
    /// Creates `path`, removing whatever file was there before.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to remove existing {}", path.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CsvLedgerWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().flexible(true).from_writer(inner),
        }
    }
}

impl<W: Write> RowSink for CsvLedgerWriter<W> {
    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        self.writer.write_record(fields)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
