pub mod analyzer;
pub mod invariants;
pub mod ops;
pub mod oracle;
pub mod sim;

pub use analyzer::JitterAnalyzer;
pub use sim::{Sim, SimConfig};
