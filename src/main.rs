use anyhow::{Context, Result};
use clap::Parser;
use covetalks::config::AppConfig;
use covetalks::server::ServerBuilder;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about = "CoveTalks directory API", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Start the API server (default)
    Serve {
        /// Override `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Load and validate the configuration, then exit
    CheckConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("covetalks=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path)),
        None => {
            tracing::info!("no configuration file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            let mut config = load_config(args.config.as_deref())?;
            if let Some(bind) = bind {
                config = config.with_bind(bind)?;
            }
            ServerBuilder::from_config(config).await?.serve().await
        }
        Command::CheckConfig => {
            let config = load_config(args.config.as_deref())?;
            println!(
                "configuration ok: backend={:?}, bind={}, page size {} (max {})",
                config.store.backend,
                config.server.bind,
                config.pagination.default_limit,
                config.pagination.max_limit
            );
            Ok(())
        }
    }
}
