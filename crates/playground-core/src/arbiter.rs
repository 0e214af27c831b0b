//! Single-selection arbiter: only the newest selection's analysis may reach the screen.

use std::sync::Arc;

use tracing::instrument;

use crate::agent::Agent;
use crate::analysis::Analyzer;
use crate::effect::{Effect, Panel, Renderer};
use crate::lane::{ArbiterStats, CancelPolicy, LaneSet, Ticket};

const MAIN: usize = 0;

/// Owns "which agent is currently of interest" for the main panel.
///
/// Results are applied in issuance order, not completion order: a slow
/// analysis for an older selection is dropped when it finishes after a
/// newer selection was made, even when both target the same agent.
pub struct SelectionArbiter {
    lanes: LaneSet,
}

impl SelectionArbiter {
    pub fn new(analyzer: Arc<dyn Analyzer>, renderer: Arc<dyn Renderer>) -> Self {
        Self::with_policy(analyzer, renderer, CancelPolicy::default())
    }

    pub fn with_policy(
        analyzer: Arc<dyn Analyzer>,
        renderer: Arc<dyn Renderer>,
        policy: CancelPolicy,
    ) -> Self {
        Self {
            lanes: LaneSet::new(vec![Panel::Main], analyzer, renderer, policy),
        }
    }

    /// Paint the "nothing selected" state.
    pub fn show_placeholder(&self) {
        self.lanes.render(Panel::Main, Effect::ShowPlaceholder);
    }

    /// Select `agent`, emit `ShowPending` immediately, and start its analysis.
    ///
    /// Always accepted. Re-selecting the current agent still mints a new
    /// ticket and restarts the analysis. Must be called from within a tokio
    /// runtime.
    #[instrument(skip_all, fields(agent = %agent.id))]
    pub fn select(&self, agent: Agent) -> Ticket {
        let mut state = self.lanes.state();
        self.lanes.issue(&mut state, MAIN, agent)
    }

    /// The agent most recently passed to `select`, committed or not.
    pub fn current_selection(&self) -> Option<Agent> {
        self.lanes.state().requested(MAIN).cloned()
    }

    /// The agent whose result is currently on screen.
    pub fn committed(&self) -> Option<Agent> {
        self.lanes.state().committed(MAIN).cloned()
    }

    /// The newest ticket issued; `Ticket::NONE` before the first selection.
    pub fn current_ticket(&self) -> Ticket {
        self.lanes.state().ticket(MAIN)
    }

    /// True while the newest selection's analysis has not resolved.
    pub fn is_pending(&self) -> bool {
        self.lanes.state().is_pending(MAIN)
    }

    pub fn stats(&self) -> ArbiterStats {
        self.lanes.state().stats()
    }

    pub fn policy(&self) -> CancelPolicy {
        self.lanes.policy()
    }

    /// Wait until every analysis started so far has finished or been aborted.
    pub async fn settle(&self) {
        self.lanes.settle().await;
    }
}
