use std::sync::Arc;
use std::time::Duration;

use playground_core::{
    Agent, AgentCatalog, CancelPolicy, Effect, Panel, RecordingRenderer, Session,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::analyzer::JitterAnalyzer;
use crate::invariants::{check_effect_log, check_quiescent, check_stats, last_effects, Violation};
use crate::ops::{generate, Op};
use crate::oracle::{Expected, Oracle};

const NAMES: [&str; 6] = ["Planner", "Researcher", "Critic", "Builder", "Tester", "Scribe"];

/// Knobs for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub agents: usize,
    pub max_slots: usize,
    pub policy: CancelPolicy,
    /// Upper bound for a single analysis.
    pub max_latency: Duration,
    /// Upper bound for a `Wait` op.
    pub max_wait: Duration,
    /// Probability that an analysis fails.
    pub failure_rate: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agents: 4,
            max_slots: 2,
            policy: CancelPolicy::Suppress,
            max_latency: Duration::from_millis(1000),
            max_wait: Duration::from_millis(400),
            failure_rate: 0.0,
        }
    }
}

/// The main simulation harness.
pub struct Sim {
    pub session: Session,
    pub renderer: Arc<RecordingRenderer>,
    pub oracle: Oracle,
    pub rng: ChaCha8Rng,
    pub step: usize,
    pub violations: Vec<Violation>,
    config: SimConfig,
    agents: Vec<Agent>,
}

/// Build `count` agents with distinct ids and names.
pub fn build_agents(count: usize) -> Vec<Agent> {
    (0..count)
        .map(|i| {
            let base = NAMES[i % NAMES.len()];
            let name = if i < NAMES.len() {
                base.to_string()
            } else {
                format!("{} {}", base, i)
            };
            Agent {
                id: format!("a{}", i + 1),
                role: format!("{} role", name),
                color: format!("#{:06x}", (i as u32).wrapping_mul(0x3a5f1d) & 0xffffff),
                suggestion: format!("{} suggests step {}", name, i + 1),
                name,
            }
        })
        .collect()
}

impl Sim {
    /// Create a new deterministic simulation with the given seed.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    /// Create a new deterministic simulation with full configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let agents = build_agents(config.agents.max(1));
        let catalog = AgentCatalog::new(agents.clone()).expect("generated agent ids are unique");

        let analyzer = Arc::new(JitterAnalyzer::new(
            rng.gen(),
            config.max_latency,
            config.failure_rate,
        ));
        let renderer = Arc::new(RecordingRenderer::new());
        let session = Session::with_analyzer(
            catalog,
            analyzer,
            config.policy,
            config.max_slots,
            renderer.clone(),
        );
        session.arbiter().show_placeholder();

        Sim {
            session,
            renderer,
            oracle: Oracle::new(config.max_slots),
            rng,
            step: 0,
            violations: Vec::new(),
            config,
            agents,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Run the simulation for the given number of steps, then settle and
    /// check the final state.
    pub async fn run(&mut self, steps: usize) -> &[Violation] {
        let max_wait = self.config.max_wait.as_millis() as u64;
        for _ in 0..steps {
            let op = generate(&mut self.rng, self.agents.len(), max_wait);
            let v = self.step_with(op).await;
            self.violations.extend(v);
        }

        let v = self.finish().await;
        self.violations.extend(v);
        &self.violations
    }

    /// Execute a single operation and return any violations found for that step.
    pub async fn step_with(&mut self, op: Op) -> Vec<Violation> {
        let mut violations = Vec::new();
        let step = self.step;
        self.step += 1;

        match op {
            Op::Select { agent } => {
                let id = self.agents[agent].id.clone();
                let expected = self.oracle.predict_select();
                match self.session.select(&id) {
                    Ok(ticket) => {
                        if expected != (Expected::Selected { ticket: ticket.value() }) {
                            violations.push(Violation::new(
                                step,
                                Panel::Main,
                                "ticket-order",
                                format!("expected {:?}, got ticket {}", expected, ticket),
                            ));
                        }
                    }
                    Err(e) => violations.push(Violation::new(
                        step,
                        Panel::Main,
                        "select-accepted",
                        format!("select '{}' failed: {}", id, e),
                    )),
                }
                self.oracle.commit_select(&id);
            }
            Op::Toggle { agent } => {
                let id = self.agents[agent].id.clone();
                let expected = self.oracle.predict_toggle(&id);
                match self.session.toggle_compare(&id) {
                    Ok(outcome) if expected.matches_toggle(&outcome) => {}
                    Ok(outcome) => violations.push(Violation::new(
                        step,
                        Panel::Main,
                        "toggle-outcome",
                        format!("toggle '{}': expected {:?}, got {:?}", id, expected, outcome),
                    )),
                    Err(e) => violations.push(Violation::new(
                        step,
                        Panel::Main,
                        "toggle-accepted",
                        format!("toggle '{}' failed: {}", id, e),
                    )),
                }
                self.oracle.commit_toggle(&id);
                violations.extend(self.check_held(step));
            }
            Op::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
        }

        violations
    }

    /// Wait for every outstanding analysis and check the settled state.
    pub async fn finish(&mut self) -> Vec<Violation> {
        self.session.settle().await;
        let step = self.step;
        let effects = self.renderer.effects();

        let mut violations = check_effect_log(step, &effects);
        violations.extend(check_quiescent(step, &effects));
        violations.extend(check_stats(step, Panel::Main, &self.session.arbiter().stats()));
        violations.extend(check_stats(step, Panel::Slot(0), &self.session.compare().stats()));
        violations.extend(self.check_held(step));
        violations.extend(self.check_main_winner(step, &effects));
        violations
    }

    /// The compare slots hold exactly what the oracle says.
    fn check_held(&self, step: usize) -> Vec<Violation> {
        let compare = self.session.compare();
        let mut violations = Vec::new();
        for (slot, expected) in self.oracle.slots().iter().enumerate() {
            let actual = compare.slot(slot).map(|a| a.id);
            if actual.as_deref() != expected.as_deref() {
                violations.push(Violation::new(
                    step,
                    Panel::Slot(slot),
                    "held-set",
                    format!("expected {:?}, got {:?}", expected, actual),
                ));
            }
        }
        violations
    }

    /// After settling, the main panel shows the last selection or its failure.
    fn check_main_winner(&self, step: usize, effects: &[(Panel, Effect)]) -> Vec<Violation> {
        let Some(last_id) = self.oracle.last_selected() else {
            return Vec::new();
        };
        let arbiter = self.session.arbiter();
        let mut violations = Vec::new();

        if arbiter.current_selection().map(|a| a.id).as_deref() != Some(last_id) {
            violations.push(Violation::new(
                step,
                Panel::Main,
                "current-selection",
                format!("expected '{}' to be the current selection", last_id),
            ));
        }

        let last_main = last_effects(effects)
            .into_iter()
            .find(|(p, _)| *p == Panel::Main)
            .map(|(_, e)| e);
        match last_main {
            Some(Effect::ShowResult { name, .. }) => {
                let committed = arbiter.committed().map(|a| a.id);
                let expected_name = self
                    .agents
                    .iter()
                    .find(|a| a.id == last_id)
                    .map(|a| a.name.as_str());
                if expected_name != Some(name.as_str()) || committed.as_deref() != Some(last_id) {
                    violations.push(Violation::new(
                        step,
                        Panel::Main,
                        "last-writer-wins",
                        format!(
                            "last selected '{}' but showing '{}' (committed {:?})",
                            last_id, name, committed
                        ),
                    ));
                }
            }
            Some(Effect::ShowError { .. }) => {}
            other => violations.push(Violation::new(
                step,
                Panel::Main,
                "last-writer-wins",
                format!("last selected '{}' but main panel ended on {:?}", last_id, other),
            )),
        }
        violations
    }
}
