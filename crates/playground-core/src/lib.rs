//! Core of the agent playground.
//!
//! Holds the agent catalog, the render effects handed to the UI, and the
//! selection arbiters that keep slow, superseded analyses from overwriting
//! newer ones.

mod agent;
mod analysis;
mod arbiter;
mod compare;
mod effect;
mod error;
mod lane;
mod session;

pub use agent::{Agent, AgentCatalog};
pub use analysis::{Analysis, Analyzer, LatencyPolicy, SimulatedAnalyzer};
pub use arbiter::SelectionArbiter;
pub use compare::{CompareArbiter, ToggleOutcome};
pub use effect::{ChannelRenderer, Effect, Panel, RecordingRenderer, Renderer};
pub use error::CoreError;
pub use lane::{ArbiterStats, CancelPolicy, Ticket};
pub use session::{Session, SessionOptions, LOAD_FAILURE_MESSAGE};
