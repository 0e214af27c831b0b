//! Compare mode: up to `max_slots` agents analyzed side by side.
//!
//! Each slot applies the ticket rule on its own, so activity in one slot
//! never invalidates a pending result in another.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::agent::Agent;
use crate::analysis::Analyzer;
use crate::effect::{Effect, Panel, Renderer};
use crate::lane::{ArbiterStats, CancelPolicy, LaneSet, Ticket};

/// Result of toggling an agent in compare mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The agent went into `slot` and its analysis started.
    Added { slot: usize, ticket: Ticket },
    /// The agent was already held and has been removed from `slot`.
    Removed { slot: usize },
    /// Every slot is taken; nothing changed.
    Rejected,
}

pub struct CompareArbiter {
    lanes: LaneSet,
    max_slots: usize,
}

impl CompareArbiter {
    pub fn new(max_slots: usize, analyzer: Arc<dyn Analyzer>, renderer: Arc<dyn Renderer>) -> Self {
        Self::with_policy(max_slots, analyzer, renderer, CancelPolicy::default())
    }

    pub fn with_policy(
        max_slots: usize,
        analyzer: Arc<dyn Analyzer>,
        renderer: Arc<dyn Renderer>,
        policy: CancelPolicy,
    ) -> Self {
        let max_slots = max_slots.max(1);
        Self {
            lanes: LaneSet::new((0..max_slots).map(Panel::Slot).collect(), analyzer, renderer, policy),
            max_slots,
        }
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Add `agent` to the first free slot, or remove it if already held.
    ///
    /// With every slot taken, a new agent is refused with a warning on the
    /// main panel and the held set stays as it was.
    #[instrument(skip_all, fields(agent = %agent.id))]
    pub fn toggle(&self, agent: Agent) -> ToggleOutcome {
        let mut state = self.lanes.state();

        if let Some(slot) = state.find_requested(&agent.id) {
            self.lanes.vacate(&mut state, slot);
            return ToggleOutcome::Removed { slot };
        }

        if let Some(slot) = state.first_free() {
            let ticket = self.lanes.issue(&mut state, slot, agent);
            return ToggleOutcome::Added { slot, ticket };
        }

        info!(held = state.len(), "compare limit reached");
        self.lanes.render(
            Panel::Main,
            Effect::ShowWarning {
                message: format!(
                    "You can compare up to {} agents. Deselect one before adding {}.",
                    self.max_slots, agent.name
                ),
            },
        );
        ToggleOutcome::Rejected
    }

    /// Held agents in slot order.
    pub fn held(&self) -> Vec<Agent> {
        let state = self.lanes.state();
        (0..state.len())
            .filter_map(|slot| state.requested(slot).cloned())
            .collect()
    }

    /// Agent held in `slot`, if any.
    pub fn slot(&self, slot: usize) -> Option<Agent> {
        let state = self.lanes.state();
        if slot >= state.len() {
            return None;
        }
        state.requested(slot).cloned()
    }

    /// Agent whose result is currently shown in `slot`.
    pub fn committed(&self, slot: usize) -> Option<Agent> {
        let state = self.lanes.state();
        if slot >= state.len() {
            return None;
        }
        state.committed(slot).cloned()
    }

    /// Newest ticket issued for `slot`.
    pub fn slot_ticket(&self, slot: usize) -> Option<Ticket> {
        let state = self.lanes.state();
        (slot < state.len()).then(|| state.ticket(slot))
    }

    /// Panel painted by `slot`.
    pub fn panel(&self, slot: usize) -> Option<Panel> {
        let state = self.lanes.state();
        (slot < state.len()).then(|| self.lanes.panel(&state, slot))
    }

    pub fn stats(&self) -> ArbiterStats {
        self.lanes.state().stats()
    }

    pub async fn settle(&self) {
        self.lanes.settle().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::fixtures::agent;
    use crate::analysis::SimulatedAnalyzer;
    use crate::effect::RecordingRenderer;
    use std::time::Duration;

    fn compare() -> (CompareArbiter, Arc<RecordingRenderer>) {
        let renderer = Arc::new(RecordingRenderer::new());
        let arbiter = CompareArbiter::new(2, Arc::new(SimulatedAnalyzer::default()), renderer.clone());
        (arbiter, renderer)
    }

    fn ids(agents: Vec<Agent>) -> Vec<String> {
        agents.into_iter().map(|a| a.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_third_agent_rejected() {
        let (arbiter, renderer) = compare();
        assert!(matches!(
            arbiter.toggle(agent("a1", "Planner")),
            ToggleOutcome::Added { slot: 0, .. }
        ));
        assert!(matches!(
            arbiter.toggle(agent("a2", "Researcher")),
            ToggleOutcome::Added { slot: 1, .. }
        ));
        assert_eq!(arbiter.toggle(agent("a3", "Critic")), ToggleOutcome::Rejected);
        assert_eq!(ids(arbiter.held()), vec!["a1", "a2"]);
        assert!(matches!(
            renderer.showing(Panel::Main),
            Some(Effect::ShowWarning { message }) if message.contains("Critic")
        ));

        arbiter.settle().await;
        assert_eq!(arbiter.committed(0).unwrap().id, "a1");
        assert_eq!(arbiter.committed(1).unwrap().id, "a2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_held_agent_removes_it() {
        let (arbiter, renderer) = compare();
        arbiter.toggle(agent("a1", "Planner"));
        arbiter.toggle(agent("a2", "Researcher"));
        assert_eq!(
            arbiter.toggle(agent("a1", "Planner")),
            ToggleOutcome::Removed { slot: 0 }
        );
        assert_eq!(ids(arbiter.held()), vec!["a2"]);

        arbiter.settle().await;
        // a1 was removed while pending: its result must not appear.
        assert_eq!(renderer.results(), vec!["Researcher".to_string()]);
        assert_eq!(renderer.showing(Panel::Slot(0)), Some(Effect::ShowPlaceholder));
        assert!(arbiter.committed(0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_freed_slot_is_reused() {
        let (arbiter, _renderer) = compare();
        arbiter.toggle(agent("a1", "Planner"));
        arbiter.toggle(agent("a2", "Researcher"));
        arbiter.toggle(agent("a1", "Planner"));
        match arbiter.toggle(agent("a3", "Critic")) {
            ToggleOutcome::Added { slot, ticket } => {
                assert_eq!(slot, 0);
                // Issued, vacated, issued again.
                assert_eq!(ticket.value(), 3);
            }
            other => panic!("expected Added, got {:?}", other),
        }
        assert_eq!(ids(arbiter.held()), vec!["a3", "a2"]);
        arbiter.settle().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_do_not_invalidate_each_other() {
        let (arbiter, renderer) = compare();
        // Slow analysis pending in slot 0.
        arbiter.toggle(agent("a1", "Planner"));
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Churn in slot 1 while slot 0 is still pending.
        arbiter.toggle(agent("a2", "Researcher"));
        arbiter.toggle(agent("a2", "Researcher"));
        arbiter.toggle(agent("a3", "Critic"));
        assert_eq!(arbiter.slot_ticket(0).unwrap().value(), 1);
        assert_eq!(arbiter.slot_ticket(1).unwrap().value(), 3);

        arbiter.settle().await;
        assert_eq!(arbiter.committed(0).unwrap().id, "a1");
        assert_eq!(arbiter.committed(1).unwrap().id, "a3");
        let mut results = renderer.results();
        results.sort();
        assert_eq!(results, vec!["Critic".to_string(), "Planner".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_accessors_out_of_range() {
        let (arbiter, _renderer) = compare();
        assert_eq!(arbiter.max_slots(), 2);
        assert!(arbiter.slot(5).is_none());
        assert!(arbiter.committed(5).is_none());
        assert!(arbiter.slot_ticket(2).is_none());
        assert_eq!(arbiter.panel(1), Some(Panel::Slot(1)));
        assert_eq!(arbiter.panel(2), None);
    }

    #[test]
    fn test_zero_slots_clamped() {
        let renderer = Arc::new(RecordingRenderer::new());
        let arbiter = CompareArbiter::new(0, Arc::new(SimulatedAnalyzer::default()), renderer);
        assert_eq!(arbiter.max_slots(), 1);
    }
}
