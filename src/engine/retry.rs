use {
    crate::{
        config::COINBASE,
        data::{LookupErrorKind, PriceLookupError},
    },
    std::time::Duration,
};

/// How long to wait between attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    Fixed(Duration),
    Exponential {
        initial: Duration,
        factor: u32,
        max: Duration,
    },
}

impl Backoff {
    /// Delay before retry number `retry` (0-based).
    pub fn delay(&self, retry: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential {
                initial,
                factor,
                max,
            } => {
                let scale = factor.saturating_pow(retry);
                initial.saturating_mul(scale).min(*max)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Retry(Duration),
    /// Not a retryable error class.
    Fatal,
    /// Retryable, but the attempt budget is spent.
    Exhausted,
}

/// Which lookup failures are retried, how often and how far apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. `None` retries forever.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
    pub retryable: Vec<LookupErrorKind>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: Backoff::Fixed(Duration::from_millis(COINBASE.retry.backoff_ms)),
            retryable: vec![LookupErrorKind::RateLimited],
        }
    }
}

impl RetryPolicy {
    /// Retries rate-limited calls immediately. For tests and replays against fakes.
    pub fn immediate(max_attempts: Option<u32>) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(Duration::ZERO),
            ..Self::default()
        }
    }

    pub fn is_retryable(&self, err: &PriceLookupError) -> bool {
        self.retryable.contains(&err.kind())
    }

    /// What to do after `attempts_made` attempts, the last of which failed with `err`.
    pub fn decide(&self, err: &PriceLookupError, attempts_made: u32) -> RetryDecision {
        if !self.is_retryable(err) {
            return RetryDecision::Fatal;
        }
        match self.max_attempts {
            Some(max) if attempts_made >= max => RetryDecision::Exhausted,
            _ => RetryDecision::Retry(self.backoff.delay(attempts_made.saturating_sub(1))),
        }
    }
}
