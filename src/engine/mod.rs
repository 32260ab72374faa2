mod enricher;
mod pipeline;
mod retry;
mod selector;

pub use enricher::{EnrichError, RecordEnricher};
pub use pipeline::{Pipeline, PipelineSummary};
pub use retry::{Backoff, RetryDecision, RetryPolicy};
pub use selector::SelectionPolicy;
