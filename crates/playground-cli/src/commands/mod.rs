pub mod agents;
pub mod compare;
pub mod config;
pub mod resolve;
pub mod select;
pub mod serve;

use std::sync::Arc;

use playground_config::PlaygroundConfig;
use playground_core::{Effect, Panel, RecordingRenderer, Session, SessionOptions};

/// Open a session over the configured agent source, recording every effect.
pub(crate) async fn open_session(config: &PlaygroundConfig) -> (Session, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::new());
    let session = Session::open(
        &config.agents.source,
        SessionOptions::from_config(config),
        renderer.clone(),
    )
    .await;
    (session, renderer)
}

pub(crate) fn print_effects(effects: &[(Panel, Effect)]) {
    for (panel, effect) in effects {
        println!("[{}] {}", panel, effect);
    }
}
