//! Main entry point for the match-analytics service
//!
//! Loads configuration, initializes logging and storage, and serves the
//! REST API until a shutdown signal arrives.

use anyhow::Result;
use clap::Parser;
use match_analytics::config::{validate_config, AppConfig, StorageBackend};
use match_analytics::service::{ApiServer, AppState, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Match Analytics Service - football events and player form ratings
#[derive(Parser)]
#[command(
    name = "match-analytics",
    version,
    about = "A match analytics backend that tracks football events and player form ratings",
    long_about = "Match Analytics stores a match, its players and its events, and recomputes \
                 each player's form rating whenever a goal or assist is recorded. It serves \
                 the match state to a front end over a small REST API."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// HTTP host override
    #[arg(long, value_name = "HOST", help = "Override HTTP bind host")]
    http_host: Option<String>,

    /// HTTP port override
    #[arg(long, value_name = "PORT", help = "Override HTTP server port")]
    http_port: Option<u16>,

    /// Database path override
    #[arg(long, value_name = "PATH", help = "Override SQLite database path")]
    database: Option<PathBuf>,

    /// Use in-memory storage
    #[arg(long, help = "Keep all data in memory instead of SQLite")]
    in_memory: bool,

    /// Skip demo seeding
    #[arg(long, help = "Do not seed the demo match and players")]
    no_seed: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting service"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C) signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

/// Display startup banner with service information
fn display_startup_banner(config: &AppConfig) {
    info!("⚽ Match Analytics Service");
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!("   HTTP: {}", config.http_addr());
    info!("   Storage: {}", config.storage.backend);
    if config.storage.backend == StorageBackend::Sqlite {
        info!("   Database: {}", config.storage.database_path.display());
    }
    info!("   Seed demo data: {}", config.storage.seed_demo_data);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(host) = &args.http_host {
        config.http.host = host.clone();
    }

    if let Some(port) = args.http_port {
        config.http.port = port;
    }

    if let Some(database) = &args.database {
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.database_path = database.clone();
    }

    if args.in_memory {
        config.storage.backend = StorageBackend::Memory;
    }

    if args.no_seed {
        config.storage.seed_demo_data = false;
    }

    validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        display_startup_banner(&config);
        info!("Dry run completed - exiting without starting service");
        return Ok(());
    }

    display_startup_banner(&config);

    info!("Initializing service components...");
    let app_state = match AppState::new(config.clone()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let server = Arc::new(ApiServer::new(ServerConfig::from(&config), app_state));
    let mut server_task = {
        let server = server.clone();
        tokio::spawn(async move { server.start().await })
    };

    info!("✅ Match Analytics Service is running");
    info!("Press Ctrl+C to shutdown gracefully...");

    tokio::select! {
        _ = wait_for_shutdown_signal() => {
            info!("🛑 Shutdown signal received, beginning graceful shutdown...");
            server.stop();
        }
        result = &mut server_task => {
            // The server only returns on its own when it could not start or crashed
            match result {
                Ok(Ok(())) => warn!("API server exited unexpectedly"),
                Ok(Err(e)) => error!("API server failed: {}", e),
                Err(e) => error!("API server task panicked: {}", e),
            }
            std::process::exit(1);
        }
    }

    match tokio::time::timeout(config.shutdown_timeout(), server_task).await {
        Ok(Ok(Ok(()))) => info!("✅ Graceful shutdown completed successfully"),
        Ok(Ok(Err(e))) => error!("API server failed during shutdown: {}", e),
        Ok(Err(e)) => error!("API server task panicked: {}", e),
        Err(_) => warn!("⚠️  Shutdown timeout exceeded, forcing exit"),
    }

    info!("🛑 Match Analytics Service stopped");
    Ok(())
}
