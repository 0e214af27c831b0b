use playground_config::PlaygroundConfig;
use playground_core::ToggleOutcome;

use super::{open_session, print_effects};

pub async fn run(config: &PlaygroundConfig, ids: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let (session, renderer) = open_session(config).await;

    for id in ids {
        match session.toggle_compare(id)? {
            ToggleOutcome::Added { slot, ticket } => {
                tracing::debug!(agent = %id, slot, %ticket, "added to compare");
            }
            ToggleOutcome::Removed { slot } => {
                tracing::debug!(agent = %id, slot, "removed from compare");
            }
            ToggleOutcome::Rejected => {
                tracing::debug!(agent = %id, "compare full");
            }
        }
    }
    session.settle().await;

    print_effects(&renderer.effects());

    let compare = session.compare();
    for slot in 0..compare.max_slots() {
        match compare.committed(slot) {
            Some(agent) => println!("slot{}: {} ({})", slot, agent.name, agent.id),
            None => println!("slot{}: empty", slot),
        }
    }

    Ok(())
}
