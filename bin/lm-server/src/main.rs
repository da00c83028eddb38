//! Library Platform Server
//!
//! Startup order: configuration → logging → store → bootstrap seeding → HTTP.
//! A seeding failure aborts startup.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LIBRARY_CONFIG` | - | Path to a TOML config file |
//! | `LIBRARY_HTTP_PORT` | `8080` | HTTP API port |
//! | `LIBRARY_HTTP_HOST` | `0.0.0.0` | Bind address |
//! | `LIBRARY_CORS_ORIGINS` | `http://localhost:4200` | Comma-separated allowed origins |
//! | `LIBRARY_STORE_BACKEND` | `sqlite` | `sqlite` or `memory` |
//! | `LIBRARY_SQLITE_URL` | `sqlite://library.db?mode=rwc` | SQLite connection string |
//! | `LIBRARY_STORE_MAX_CONNECTIONS` | `5` | SQLite pool size |
//! | `LIBRARY_SEED_ENABLED` | `true` | Run bootstrap seeding |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | `info` | Log level |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::info;

use lm_common::init_logging;
use lm_config::{AppConfig, ConfigLoader, StoreBackend, StoreConfig};
use lm_platform::{build_router, DataSeeder, InMemoryStore, Repositories, SqliteStore};

#[derive(Parser, Debug)]
#[command(name = "lm-server")]
#[command(about = "Library Platform Server - members, roles and demo authentication")]
struct Args {
    /// Config file (overrides LIBRARY_CONFIG and the standard search paths)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print an example config file and exit
    #[arg(long)]
    print_example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_example_config {
        println!("{}", AppConfig::example_toml());
        return Ok(());
    }

    init_logging("lm-server");
    info!("Starting Library Platform Server");

    let loader = match &args.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    let repos = open_store(&config.store).await?;

    if config.seed.enabled {
        DataSeeder::new(repos.roles.clone(), repos.users.clone())
            .seed()
            .await?;
    } else {
        info!("Bootstrap seeding disabled");
    }

    let app = build_router(&repos, &config.http.cors_origins);

    let addr = config.http.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Library Platform Server shutdown complete");
    Ok(())
}

async fn open_store(config: &StoreConfig) -> Result<Repositories> {
    let repos = match config.backend {
        StoreBackend::Sqlite => {
            info!(url = %config.sqlite_url, "Opening SQLite store");
            let store = SqliteStore::connect(&config.sqlite_url, config.max_connections).await?;
            Repositories::from_store(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            Repositories::from_store(Arc::new(InMemoryStore::new()))
        }
    };
    Ok(repos)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
