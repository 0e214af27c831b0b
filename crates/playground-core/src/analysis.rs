//! The (simulated) analysis that runs between selecting an agent and showing its result.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use playground_config::AnalysisSection;

use crate::agent::Agent;
use crate::error::CoreError;

/// Output of analyzing one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub suggestion: String,
}

/// Produces an analysis for an agent. May take arbitrarily long.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, agent: &Agent) -> Result<Analysis, CoreError>;
}

/// How long the simulated analysis of each agent takes.
///
/// Latency is deliberately uneven across agents so that a slow, older
/// selection can finish after a fast, newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyPolicy {
    default: Duration,
    overrides: HashMap<String, Duration>,
}

impl LatencyPolicy {
    pub fn new(default: Duration) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, agent_id: impl Into<String>, latency: Duration) -> Self {
        self.overrides.insert(agent_id.into(), latency);
        self
    }

    pub fn from_config(section: &AnalysisSection) -> Self {
        let mut policy = Self::new(section.default_latency.as_duration());
        for (id, latency) in &section.latency_overrides {
            policy.overrides.insert(id.clone(), latency.as_duration());
        }
        policy
    }

    pub fn latency_for(&self, agent: &Agent) -> Duration {
        self.overrides
            .get(&agent.id)
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for LatencyPolicy {
    /// `a1` takes 900ms, every other agent 180ms.
    fn default() -> Self {
        Self::new(Duration::from_millis(180)).with_override("a1", Duration::from_millis(900))
    }
}

/// Waits out the agent's latency, then returns the agent's canned suggestion.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnalyzer {
    latency: LatencyPolicy,
}

impl SimulatedAnalyzer {
    pub fn new(latency: LatencyPolicy) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> &LatencyPolicy {
        &self.latency
    }
}

#[async_trait]
impl Analyzer for SimulatedAnalyzer {
    async fn analyze(&self, agent: &Agent) -> Result<Analysis, CoreError> {
        tokio::time::sleep(self.latency.latency_for(agent)).await;
        Ok(Analysis {
            suggestion: agent.suggestion.clone(),
        })
    }
}
