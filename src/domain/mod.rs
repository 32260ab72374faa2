// Domain types and value objects
mod candle;
mod product_pair;
mod record;

// Re-export commonly used types to the world
pub use candle::{Candle, CandleSeries};
pub use product_pair::ProductPair;
pub use record::{Amounts, DerivedFields, EnrichedRecord, TradeRecord};
