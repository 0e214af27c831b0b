use playground_config::PlaygroundConfig;

pub fn run(config: &PlaygroundConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Print as YAML for readability
    let yaml = config.to_yaml()?;
    println!("{}", yaml);

    Ok(())
}
