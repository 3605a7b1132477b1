//! lens-server main binary

use clap::{Parser, Subcommand};
use lens_config::AppConfig;
use lens_provider::SnapshotProvider;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lens-server")]
#[command(about = "Code-intelligence server for C# solutions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tool protocol on stdio
    Start,
    /// Print the tool list and exit
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    lens_config::logging::initialize(&config);
    tracing::info!("Starting Lens server");

    let provider = Arc::new(SnapshotProvider::new());
    let dispatcher = lens_server::create_dispatcher(provider, &config);

    match cli.command {
        Some(Commands::Tools) => {
            for tool in lens_handlers::tool_definitions() {
                println!("{}  {}", tool.name, tool.description);
            }
        }
        Some(Commands::Start) | None => {
            if let Err(e) = lens_transport::start_stdio_server(dispatcher).await {
                tracing::error!(error = %e, "Failed to run stdio server");
                anyhow::bail!("stdio server failed: {e}");
            }
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
