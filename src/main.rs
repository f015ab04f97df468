use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use staffdir::config::Config;
use staffdir::search::SearchIndex;
use staffdir::state::AppState;
use staffdir::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "-help" || arg == "--help") {
        println!("Usage: staffdir [OPTIONS]");
        println!("Options:");
        println!("  -config <path>  Path to configuration file (default: ./etc/staffdir.toml)");
        println!("  -help, --help   Print this help message");
        return Ok(());
    }

    let config_path = args
        .iter()
        .skip_while(|arg| arg.as_str() != "-config")
        .nth(1)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "./etc/staffdir.toml".to_string());

    // Load configuration first (before logging init)
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Could not load config file: {}, using defaults", e);
        Config::default()
    });

    // Initialize logging
    // Priority: RUST_LOG env var > config file > default "info"
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!("Starting staffdir server...");

    // Open the store and create tables
    let db_conn = db::init_database(&config.database).await.map_err(|e| {
        tracing::error!("Database initialization failed: {}", e);
        anyhow::anyhow!("Database initialization failed: {}", e)
    })?;

    // Build the search index from the person table
    let index = Arc::new(SearchIndex::default());
    db::reindex_persons(&db_conn, &index).await?;

    // Create application state (spawns the index writer task)
    let state = AppState::new(db_conn, index, config.clone());

    // Load the list of uploaded images
    match state.images.load_from_dir().await {
        Ok(n) => info!("Loaded {} image files from {}", n, state.images.dir().display()),
        Err(e) => tracing::warn!(
            "failed to read image directory {}: {}",
            state.images.dir().display(),
            e
        ),
    }

    // Create router
    let app = routes::create_router(state);

    // Parse address
    let addr: SocketAddr = config.addr.parse().unwrap_or_else(|_| {
        tracing::warn!("Invalid address '{}', using default 0.0.0.0:9999", config.addr);
        "0.0.0.0:9999".parse().unwrap()
    });

    info!("Server listening on {}", addr);

    // Start server; shut down cleanly on interrupt so the store is flushed
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("interrupt signal received; shutting down");
}
