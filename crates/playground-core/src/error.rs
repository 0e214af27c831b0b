/// Errors raised by the playground core.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// No agent with this id exists in the catalog.
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Two agents in the data source share an id.
    #[error("Duplicate agent id in agent data: {0}")]
    DuplicateAgent(String),

    /// The agent data source could not be read.
    #[error("Failed to read agent data: {0}")]
    Io(#[from] std::io::Error),

    /// The agent data source is not a JSON array of agents.
    #[error("Failed to parse agent data: {0}")]
    Json(#[from] serde_json::Error),

    /// An analyzer gave up on an agent.
    #[error("Analysis failed for '{agent}': {reason}")]
    Analysis { agent: String, reason: String },
}
