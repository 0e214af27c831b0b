use std::time::Duration;

use playground_config::PlaygroundConfig;

use super::{open_session, print_effects};

pub async fn run(config: &PlaygroundConfig, ids: &[String], gap_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let (session, renderer) = open_session(config).await;

    for (i, id) in ids.iter().enumerate() {
        if i > 0 && gap_ms > 0 {
            tokio::time::sleep(Duration::from_millis(gap_ms)).await;
        }
        session.select(id)?;
    }
    session.settle().await;

    print_effects(&renderer.effects());

    let arbiter = session.arbiter();
    match arbiter.committed() {
        Some(agent) => println!("showing: {} ({})", agent.name, agent.id),
        None => println!("showing: nothing"),
    }
    println!("stats: {}", serde_json::to_string(&arbiter.stats())?);

    Ok(())
}
