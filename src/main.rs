use clap::{Parser, Subcommand};
use database::InMemoryStore;

/// The main entry point for the Rollcall attendance backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and defaults still apply.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_settings()?;
    let _log_guard = configuration::init_tracing(&settings)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Record-keeping backend for students, courses and daily attendance.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Port to listen on. Overrides PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Keep all data in process memory instead of connecting to MongoDB.
    /// Everything is lost on shutdown.
    #[arg(long)]
    in_memory: bool,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: configuration::Settings) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        settings.port = port;
    }
    let addr = settings.socket_addr()?;

    if args.in_memory {
        tracing::warn!("Using the in-memory document store; data will not survive a restart");
        web_server::run_server(InMemoryStore::new(), addr).await
    } else {
        tracing::info!(db_name = %settings.db_name, "Connecting to MongoDB");
        let store = database::connect(&settings.mongo_uri, &settings.db_name).await?;
        web_server::run_server(store, addr).await
    }
}
