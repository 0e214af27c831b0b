use std::path::PathBuf;

use clap::{Parser, Subcommand};
use playground_config::PlaygroundConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "playground", version, about = "Agent Playground - race-free agent selection and a confined static server")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the playground's public directory over HTTP
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
        /// Directory to serve (overrides server.public_dir)
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },
    /// Show how request paths resolve against the public directory
    Resolve {
        /// Request paths, e.g. /styles.css?v=2
        #[arg(required = true)]
        paths: Vec<String>,
        /// Directory to resolve against (overrides server.public_dir)
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },
    /// List agents, optionally filtered by name or role
    Agents {
        /// Case-insensitive filter
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Select agents in order and show what the main panel renders
    Select {
        /// Agent ids, selected in order
        #[arg(required = true)]
        ids: Vec<String>,
        /// Milliseconds to wait between selections
        #[arg(short, long, default_value = "0")]
        gap_ms: u64,
    },
    /// Toggle agents in compare mode and show each slot
    Compare {
        /// Agent ids, toggled in order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show effective configuration
    Config,
}

fn find_config() -> Option<PathBuf> {
    // 1. PLAYGROUND_CONFIG environment variable
    if let Ok(path) = std::env::var("PLAYGROUND_CONFIG") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. playground.yaml in current directory
    let cwd_config = PathBuf::from("playground.yaml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. ~/.config/playground/config.yaml
    if let Some(home) = dirs_next::home_dir() {
        let home_config = home.join(".config/playground/config.yaml");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}

fn load_config(explicit: Option<PathBuf>) -> Result<PlaygroundConfig, Box<dyn std::error::Error>> {
    let config = match explicit.or_else(find_config) {
        Some(path) => PlaygroundConfig::from_file(&path)?,
        // Built-in defaults are relative to the working directory.
        None => PlaygroundConfig::default().effective(&std::env::current_dir()?),
    };
    config.validate_or_err()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config)?;
    logging::init(&config.logging);

    match cli.command {
        Commands::Serve {
            host,
            port,
            public_dir,
        } => {
            commands::serve::run(&config, host, port, public_dir).await?;
        }
        Commands::Resolve { paths, public_dir } => {
            commands::resolve::run(&config, &paths, public_dir)?;
        }
        Commands::Agents { query } => {
            commands::agents::run(&config, query).await?;
        }
        Commands::Select { ids, gap_ms } => {
            commands::select::run(&config, &ids, gap_ms).await?;
        }
        Commands::Compare { ids } => {
            commands::compare::run(&config, &ids).await?;
        }
        Commands::Config => {
            commands::config::run(&config)?;
        }
    }

    Ok(())
}
