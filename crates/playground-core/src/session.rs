//! Wires the agent catalog to the arbiters the way the playground page uses them.

use std::path::Path;
use std::sync::Arc;

use playground_config::PlaygroundConfig;
use tracing::{info, warn};

use crate::agent::{Agent, AgentCatalog};
use crate::analysis::{Analyzer, LatencyPolicy, SimulatedAnalyzer};
use crate::arbiter::SelectionArbiter;
use crate::compare::{CompareArbiter, ToggleOutcome};
use crate::effect::{Effect, Panel, Renderer};
use crate::error::CoreError;
use crate::lane::{CancelPolicy, Ticket};

/// Shown when the agent list cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Could not load agents data.";

/// Knobs for building a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub latency: LatencyPolicy,
    pub cancel: CancelPolicy,
    pub max_slots: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            latency: LatencyPolicy::default(),
            cancel: CancelPolicy::default(),
            max_slots: 2,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &PlaygroundConfig) -> Self {
        Self {
            latency: LatencyPolicy::from_config(&config.analysis),
            cancel: config.analysis.cancel.into(),
            max_slots: config.compare.max_slots,
        }
    }
}

/// One user's view of the playground: a catalog plus a single-selection
/// arbiter and a compare arbiter sharing the same renderer.
pub struct Session {
    catalog: AgentCatalog,
    arbiter: SelectionArbiter,
    compare: CompareArbiter,
    renderer: Arc<dyn Renderer>,
}

impl Session {
    /// Build a session over an already-loaded catalog and paint the placeholder.
    pub fn new(catalog: AgentCatalog, options: SessionOptions, renderer: Arc<dyn Renderer>) -> Self {
        let analyzer: Arc<dyn Analyzer> = Arc::new(SimulatedAnalyzer::new(options.latency));
        let session = Self::with_analyzer(catalog, analyzer, options.cancel, options.max_slots, renderer);
        session.arbiter.show_placeholder();
        session
    }

    /// Build a session with a custom analyzer. Paints nothing.
    pub fn with_analyzer(
        catalog: AgentCatalog,
        analyzer: Arc<dyn Analyzer>,
        cancel: CancelPolicy,
        max_slots: usize,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            arbiter: SelectionArbiter::with_policy(analyzer.clone(), renderer.clone(), cancel),
            compare: CompareArbiter::with_policy(max_slots, analyzer, renderer.clone(), cancel),
            catalog,
            renderer,
        }
    }

    /// Load the agent list from `source` and build a session over it.
    ///
    /// Never fails: if the list cannot be loaded the session starts empty,
    /// with an error message painted instead of the placeholder.
    pub async fn open(source: &Path, options: SessionOptions, renderer: Arc<dyn Renderer>) -> Self {
        match AgentCatalog::load(source).await {
            Ok(catalog) => {
                info!(agents = catalog.len(), source = %source.display(), "session opened");
                Self::new(catalog, options, renderer)
            }
            Err(e) => {
                warn!(source = %source.display(), error = %e, "agent data unavailable");
                let analyzer: Arc<dyn Analyzer> = Arc::new(SimulatedAnalyzer::new(options.latency));
                let session = Self::with_analyzer(
                    AgentCatalog::empty(),
                    analyzer,
                    options.cancel,
                    options.max_slots,
                    renderer,
                );
                session.renderer.render(
                    Panel::Main,
                    Effect::ShowError {
                        message: LOAD_FAILURE_MESSAGE.to_string(),
                    },
                );
                session
            }
        }
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn arbiter(&self) -> &SelectionArbiter {
        &self.arbiter
    }

    pub fn compare(&self) -> &CompareArbiter {
        &self.compare
    }

    /// Filter the catalog for the agent list.
    pub fn search(&self, query: &str) -> Vec<&Agent> {
        self.catalog.search(query)
    }

    fn lookup(&self, id: &str) -> Result<Agent, CoreError> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownAgent(id.to_string()))
    }

    /// Select the agent with `id` in the main panel.
    pub fn select(&self, id: &str) -> Result<Ticket, CoreError> {
        let agent = self.lookup(id)?;
        Ok(self.arbiter.select(agent))
    }

    /// Toggle the agent with `id` in compare mode.
    pub fn toggle_compare(&self, id: &str) -> Result<ToggleOutcome, CoreError> {
        let agent = self.lookup(id)?;
        Ok(self.compare.toggle(agent))
    }

    /// Wait for every outstanding analysis in both modes.
    pub async fn settle(&self) {
        self.arbiter.settle().await;
        self.compare.settle().await;
    }
}
