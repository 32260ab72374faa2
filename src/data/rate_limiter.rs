use {
    async_trait::async_trait,
    std::{sync::Arc, time::Duration},
    tokio::{sync::Mutex, time::Instant},
};

/// Gate that every outbound lookup passes through. Acquiring never fails, it only waits.
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn acquire(&self, context: &str);
}

/// Process-wide limiter handing out evenly spaced permits (`limit` per second).
/// Clones share the same schedule.
#[derive(Clone)]
pub struct GlobalRateLimiter {
    inner: Arc<Mutex<InnerLimiter>>,
}

struct InnerLimiter {
    // Earliest instant the next permit may be handed out
    next_slot: Option<Instant>,
    spacing: Duration,
}

impl GlobalRateLimiter {
    pub fn new(per_second: u32) -> Self {
        let spacing = Duration::from_secs(1) / per_second.max(1);
        Self {
            inner: Arc::new(Mutex::new(InnerLimiter {
                next_slot: None,
                spacing,
            })),
        }
    }
}

#[async_trait]
impl Throttle for GlobalRateLimiter {
    async fn acquire(&self, context: &str) {
        // Reserve a slot under the lock, then sleep outside it
        let slot = {
            let mut guard = self.inner.lock().await;
            let now = Instant::now();
            let slot = match guard.next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            guard.next_slot = Some(slot + guard.spacing);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            log::trace!(
                "Rate limiter holding [{}] for {:.3}s",
                context,
                wait.as_secs_f64()
            );
            tokio::time::sleep_until(slot).await;
        }
    }
}

/// Admits everything immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn acquire(&self, _context: &str) {}
}
