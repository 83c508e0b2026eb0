//! Trailing debounce for free-text search input

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Delivers only the last value submitted within the quiet window.
///
/// Each `submit` waits out the window; it yields the value only if no newer
/// submission arrived in the meantime.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn submit<T>(&self, value: T) -> Option<T> {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) == mine {
            Some(value)
        } else {
            tracing::trace!("debounced input superseded");
            None
        }
    }
}
