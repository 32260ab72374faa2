//! Configuration module for the ledger pricer.

// Can all be private now because we have a public re-export.
mod coinbase;
mod persistence;
mod schema;

// Re-export commonly used items
pub use coinbase::{COINBASE, CoinbaseConfig};
pub use persistence::PERSISTENCE;
pub use schema::{FILLS, HISTORY, RecordSchema, SchemaKind};
