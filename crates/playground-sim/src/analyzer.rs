//! Seeded analyzer with random latency and optional injected failures.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use playground_core::{Agent, Analysis, Analyzer, CoreError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Reason carried by injected failures.
pub const INJECTED_FAILURE: &str = "injected failure";

/// Draws each analysis latency from `0..=max_latency`.
///
/// Deterministic for a given seed as long as analyses start in a
/// deterministic order, which holds on a current-thread runtime.
pub struct JitterAnalyzer {
    rng: Mutex<ChaCha8Rng>,
    max_latency: Duration,
    failure_rate: f64,
}

impl JitterAnalyzer {
    pub fn new(seed: u64, max_latency: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_finite() {
            failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            max_latency,
            failure_rate,
        }
    }
}

#[async_trait]
impl Analyzer for JitterAnalyzer {
    async fn analyze(&self, agent: &Agent) -> Result<Analysis, CoreError> {
        let (latency, fail) = {
            let mut rng = self.rng.lock();
            let max_ms = self.max_latency.as_millis() as u64;
            (rng.gen_range(0..=max_ms), rng.gen_bool(self.failure_rate))
        };
        tokio::time::sleep(Duration::from_millis(latency)).await;

        if fail {
            return Err(CoreError::Analysis {
                agent: agent.id.clone(),
                reason: INJECTED_FAILURE.to_string(),
            });
        }
        Ok(Analysis {
            suggestion: agent.suggestion.clone(),
        })
    }
}
