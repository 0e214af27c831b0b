use std::path::PathBuf;

use playground_config::PlaygroundConfig;
use playground_server::PathResolver;

pub fn run(
    config: &PlaygroundConfig,
    paths: &[String],
    public_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = public_dir.unwrap_or_else(|| config.server.public_dir.clone());
    let resolver = PathResolver::new(&root, config.server.default_document.clone())?;

    for path in paths {
        println!("{}\t{}", path, resolver.resolve(path));
    }

    Ok(())
}
