use crate::config::RecordSchema;

/// One ledger row as read from the file. Identified only by its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub fields: Vec<String>,
}

impl TradeRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn field(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }
}

/// The numeric inputs of a row, already parsed, per layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amounts {
    Fills { value: f64, secondary_size: f64 },
    History { amount: f64 },
}

/// Derived values split by where the layout puts them.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFields {
    pub inline: Vec<String>,
    pub trailing: Vec<String>,
}

/// Fixed six-decimal rendering used for every derived number.
fn fmt_num(value: f64) -> String {
    format!("{:.6}", value)
}

impl DerivedFields {
    /// Pure function of the row's amounts and the matched bar.
    pub fn compute(amounts: Amounts, close_price: f64, price_date: &str) -> Self {
        match amounts {
            Amounts::Fills {
                value,
                secondary_size,
            } => {
                let cost = value * close_price;
                // A zero size gives inf/NaN here, same as the raw division would
                let secondary_price = cost / secondary_size;
                DerivedFields {
                    inline: vec![
                        fmt_num(close_price),
                        fmt_num(cost),
                        price_date.to_string(),
                    ],
                    trailing: vec![
                        fmt_num(secondary_price),
                        fmt_num(secondary_price * secondary_size),
                    ],
                }
            }
            Amounts::History { amount } => DerivedFields {
                inline: Vec::new(),
                trailing: vec![
                    fmt_num(amount * close_price),
                    fmt_num(close_price),
                    price_date.to_string(),
                ],
            },
        }
    }
}

/// The original fields with the derived ones spliced in. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    fields: Vec<String>,
}

impl EnrichedRecord {
    pub fn assemble(schema: &RecordSchema, record: &TradeRecord, derived: DerivedFields) -> Self {
        Self {
            fields: schema.splice(&record.fields, derived.inline, derived.trailing),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}
