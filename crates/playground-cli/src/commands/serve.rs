use std::path::PathBuf;

use playground_config::PlaygroundConfig;
use playground_server::ServerConfig;

pub async fn run(
    config: &PlaygroundConfig,
    host: Option<String>,
    port: Option<u16>,
    public_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut server = ServerConfig::from_config(config);
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(dir) = public_dir {
        server.public_dir = dir;
    }

    eprintln!("Serving {} on http://{}", server.public_dir.display(), server.addr());
    eprintln!("Endpoints: /health, /health/live, /status, and static files");

    playground_server::serve(server).await?;
    Ok(())
}
