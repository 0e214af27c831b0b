//! Agent records and the immutable catalog they are loaded into.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::CoreError;

/// A single agent as described by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: String,
    /// Color token used by the visualization, usually a hex color.
    pub color: String,
    /// Text shown once analysis of this agent completes.
    pub suggestion: String,
}

/// Ordered, read-only list of agents. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: Arc<[Agent]>,
}

impl Default for AgentCatalog {
    fn default() -> Self {
        Self {
            agents: Arc::from(Vec::new()),
        }
    }
}

impl AgentCatalog {
    /// A catalog with no agents. Nothing can be selected from it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate ids.
    pub fn new(agents: Vec<Agent>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.id.as_str()) {
                return Err(CoreError::DuplicateAgent(agent.id.clone()));
            }
        }
        Ok(Self {
            agents: agents.into(),
        })
    }

    /// Parse a JSON array of agents.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let agents: Vec<Agent> = serde_json::from_str(json)?;
        Self::new(agents)
    }

    /// Read and parse the agent file at `path`.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, CoreError> {
        let json = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&json)?;
        debug!(agents = catalog.len(), "agent catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents whose name or role contains `query`, ignoring case and surrounding
    /// whitespace. An empty query matches everything. Catalog order is kept.
    pub fn search(&self, query: &str) -> Vec<&Agent> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.agents.iter().collect();
        }
        self.agents
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle) || a.role.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
