use playground_config::PlaygroundConfig;
use playground_core::AgentCatalog;

pub async fn run(config: &PlaygroundConfig, query: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = AgentCatalog::load(&config.agents.source).await?;
    let agents = catalog.search(query.as_deref().unwrap_or(""));

    if agents.is_empty() {
        eprintln!("No agents match.");
        return Ok(());
    }

    let name_width = agents.iter().map(|a| a.name.len()).max().unwrap_or(0);
    for agent in agents {
        println!(
            "{:<4} {:<width$}  {}",
            agent.id,
            agent.name,
            agent.role,
            width = name_width
        );
    }

    Ok(())
}
