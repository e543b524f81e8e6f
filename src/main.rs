use bookmarks::bookmarks::{LibsqlBookmarkStore, MemoryBookmarkStore};
use bookmarks::config::{Cli, Config, LogFormat, StoreKind, default_config_dir, default_config_path};
use bookmarks::db::Database;
use bookmarks::handler::AppState;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // With --config, the config file's directory also holds the database;
    // otherwise both live under ~/.bookmarks/.
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    let cfg = if config_path.exists() {
        Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
            eprintln!("failed to load config file {:?}: {}", config_path, e);
            std::process::exit(1);
        })
    } else {
        Config::default()
    };

    init_tracing(cfg.app.log_format);
    tracing::info!("bookmarks.svc starting");
    for var in &cfg.missing_env {
        tracing::warn!(var = %var, "environment variable referenced in config is not set");
    }

    let state = match cfg.app.store {
        StoreKind::Libsql => {
            if let Err(e) = std::fs::create_dir_all(&data_dir) {
                tracing::error!(error = %e, path = ?data_dir, "failed to create data directory");
                std::process::exit(1);
            }
            let db = Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
                tracing::error!(error = %e, "failed to setup database");
                std::process::exit(1);
            });
            AppState::new(LibsqlBookmarkStore::new(Arc::new(db)))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store, bookmarks will not survive a restart");
            AppState::new(MemoryBookmarkStore::new())
        }
    };

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let cancellation_token = CancellationToken::new();

    let shutdown_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        shutdown_token.cancel();
    });

    let app = bookmarks::router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookmarks.svc running on {}", &address);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("bookmarks.svc going off, graceful shutdown complete");
}
