//! Backend calls behind every user action
//!
//! There is no real server. `SimulatedBackend` waits a fixed latency and
//! fails a configurable share of calls, the way the demo pages did.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use connectcargo_types::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Perform the remote side of an action
    async fn call(&self, endpoint: &str) -> Result<()>;
}

pub struct SimulatedBackend {
    latency: Duration,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.latency(), config.failure_rate)
    }

    /// Deterministic failures for tests
    pub fn with_seed(latency: Duration, failure_rate: f64, seed: u64) -> Self {
        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// No latency, never fails
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, 0.0)
    }

    fn roll_failure(&self) -> Result<bool> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Backend("random source poisoned".to_string()))?;
        Ok(rng.random_bool(self.failure_rate))
    }
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn call(&self, endpoint: &str) -> Result<()> {
        tracing::debug!(endpoint, latency_ms = self.latency.as_millis() as u64, "backend call");
        tokio::time::sleep(self.latency).await;

        if self.roll_failure()? {
            tracing::warn!(endpoint, "simulated backend failure");
            return Err(Error::Backend(format!("{} failed", endpoint)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_latency() {
        let backend = SimulatedBackend::new(Duration::from_millis(2000), 0.0);
        let start = tokio::time::Instant::now();
        backend.call("accept-load").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_always_failing_backend() {
        let backend = SimulatedBackend::new(Duration::ZERO, 1.0);
        assert!(matches!(backend.call("export-trips").await, Err(Error::Backend(_))));
    }

    #[tokio::test]
    async fn test_failure_rate_is_roughly_honoured() {
        let backend = SimulatedBackend::with_seed(Duration::ZERO, 0.1, 7);
        let mut failures = 0;
        for _ in 0..1000 {
            if backend.call("rate").await.is_err() {
                failures += 1;
            }
        }
        assert!((50..=150).contains(&failures), "failures = {failures}");
    }
}
