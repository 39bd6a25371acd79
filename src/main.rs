//! # Law Links Service Main Driver
//!
//! ## Purpose
//! Main entry point for the law-links server. Orchestrates initialization of
//! all system components and starts the web server for handling detection
//! requests.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration files, command line arguments, environment variables
//! - **Output**: Running web server with detection API endpoints
//! - **Initialization**: Loads the alias table, compiles the grammar, health checks
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load the alias table and build the detector (startup barrier)
//! 4. Start web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use law_links::{
    aliases::AliasTable,
    api::ApiServer,
    config::Config,
    detector::LinkDetector,
    errors::{DetectError, Result},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("law-links-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Law Links Team")
        .about("Service for extracting structured legal-citation references from Russian legal text")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("aliases")
                .short('a')
                .long("aliases")
                .value_name("FILE")
                .help("Alias file path (law id -> alias list, JSON)"),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Run health checks and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    // Apply CLI overrides
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(aliases) = matches.get_one::<String>("aliases") {
        config.aliases.path = PathBuf::from(aliases);
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Law Links Service v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Run health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    // Initialize application components
    let app_state = initialize_components(config.clone())?;

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Law Links Service started successfully on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Law Links Service shut down successfully");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let log_level: tracing::Level =
        config.logging.level.parse().map_err(|_| DetectError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;
    let filter = tracing_subscriber::filter::LevelFilter::from_level(log_level);

    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .json()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_filter(filter),
            )
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components. The alias table and grammar must
/// be fully built before any request is served.
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Loading alias table from {:?}", config.aliases.path);
    let table = AliasTable::from_file(&config.aliases.path)?;
    info!(
        "Loaded {} laws with {} aliases",
        table.law_count(),
        table.alias_count()
    );

    info!("Compiling citation grammar and building alias index...");
    let detector = Arc::new(LinkDetector::new(&table, &config.detection));

    info!("All components initialized successfully");
    Ok(AppState {
        config,
        detector,
        started_at: chrono::Utc::now(),
    })
}

/// Run startup health checks without serving
fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");

    let table = AliasTable::from_file(&config.aliases.path)?;
    info!(
        "✓ Alias table is loadable ({} laws, {} aliases)",
        table.law_count(),
        table.alias_count()
    );

    let detector = LinkDetector::new(&table, &config.detection);
    let probe = detector.detect("статья 1 Гражданского кодекса");
    info!("✓ Detection pipeline responds ({} links on probe)", probe.len());

    info!("All health checks passed!");
    Ok(())
}
