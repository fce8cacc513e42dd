//! Taskdeck Server
//!
//! A task-management web server backed by SQLite, with a chat relay and
//! an AI-enhance action proxied to external workflow webhooks.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;
use taskdeck::config::Config;
use taskdeck::db::Database;
use taskdeck::server::{self, ApiKeys, AppState};
use taskdeck::service::TaskService;
use taskdeck::workflow::chat::ChatClient;
use taskdeck::workflow::enhance::EnhanceClient;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Task-management web server with workflow-webhook integrations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long, env = "TASKDECK_DB", default_value = "taskdeck.db")]
    database: String,

    /// Address to bind (overrides TASKDECK_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Port for the HTTP server (overrides TASKDECK_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log output: 0=off, 1=stdout, 2=stderr, or a filename
    #[arg(long, default_value = "2")]
    log: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Load configuration from the environment, then apply CLI overrides
    let mut config = Config::from_env();
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!("Starting Taskdeck v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", cli.database);
    info!("Enhance webhook: {}", config.webhooks.enhance_url);
    info!("Chat webhook: {}", config.webhooks.chat_url);

    let db = Database::open(&cli.database)?;
    info!("Database initialized successfully");

    let state = AppState {
        service: Arc::new(TaskService::new(db)),
        enhance: Arc::new(EnhanceClient::new(&config.webhooks)?),
        chat: Arc::new(ChatClient::new(&config.webhooks)?),
        api_keys: ApiKeys::new(config.api_keys.clone()),
    };

    server::start_server(state, &config.bind, config.port).await
}
