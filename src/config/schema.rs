//! Column layouts of the supported ledger exports.

use {
    crate::config::PERSISTENCE,
    strum_macros::{Display, EnumIter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, clap::ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum SchemaKind {
    /// Exchange fills export: value is a base-asset size, secondary size re-normalises the cost.
    Fills,
    /// Account history export: amount is priced directly.
    History,
}

impl SchemaKind {
    pub fn schema(self) -> &'static RecordSchema {
        match self {
            SchemaKind::Fills => &FILLS,
            SchemaKind::History => &HISTORY,
        }
    }
}

/// Where the enricher reads its inputs and where it puts the derived columns.
#[derive(Debug)]
pub struct RecordSchema {
    pub kind: SchemaKind,
    pub timestamp_col: usize,
    pub amount_col: usize,
    pub symbol_col: usize,
    pub secondary_size_col: Option<usize>,
    /// Inline derived columns are spliced in front of this index. `None` means no inline columns.
    pub insert_at: Option<usize>,
    pub inline_columns: &'static [&'static str],
    pub trailing_columns: &'static [&'static str],
    pub default_input: &'static str,
}

impl RecordSchema {
    /// Highest column index a data row must have for this layout.
    pub fn max_required_col(&self) -> usize {
        [
            Some(self.timestamp_col),
            Some(self.amount_col),
            Some(self.symbol_col),
            self.secondary_size_col,
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or_default()
    }

    /// Splices derived values into `fields`: inline ones at `insert_at`, trailing ones at the end.
    pub fn splice(&self, fields: &[String], inline: Vec<String>, trailing: Vec<String>) -> Vec<String> {
        let split = self.insert_at.unwrap_or(fields.len()).min(fields.len());
        let mut out = Vec::with_capacity(fields.len() + inline.len() + trailing.len());
        out.extend_from_slice(&fields[..split]);
        out.extend(inline);
        out.extend_from_slice(&fields[split..]);
        out.extend(trailing);
        out
    }

    /// The header row with this layout's extra column names added.
    pub fn rewrite_header(&self, header: &[String]) -> Vec<String> {
        let owned = |cols: &[&str]| cols.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        self.splice(
            header,
            owned(self.inline_columns),
            owned(self.trailing_columns),
        )
    }
}

pub const FILLS: RecordSchema = RecordSchema {
    kind: SchemaKind::Fills,
    timestamp_col: 3,
    amount_col: 4,
    symbol_col: 5,
    secondary_size_col: Some(8),
    insert_at: Some(6),
    inline_columns: &["usd-price", "usd-total", "price-date"],
    trailing_columns: &["usd-price", "usd-total"],
    default_input: PERSISTENCE.ledger.fills_input_path,
};

pub const HISTORY: RecordSchema = RecordSchema {
    kind: SchemaKind::History,
    timestamp_col: 1,
    amount_col: 2,
    symbol_col: 4,
    secondary_size_col: None,
    insert_at: None,
    inline_columns: &[],
    trailing_columns: &["usd-amount", "usd-price", "price-date"],
    default_input: PERSISTENCE.ledger.history_input_path,
};
