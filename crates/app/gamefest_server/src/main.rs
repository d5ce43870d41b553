//! Gamefest API server binary.
//!
//! Connects to PostgreSQL, runs migrations, optionally bootstraps a
//! superuser, then serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use gamefest_api::config::ApiConfig;
use gamefest_api::{AppState, router};
use gamefest_core::auth::bootstrap::ensure_superuser;
use gamefest_core::store::PgStore;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments. Anything not given falls back to the environment.
#[derive(Parser, Debug)]
#[command(name = "gamefest_server", about = "Gamefest registration API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Username of the superuser created on first start.
    #[arg(long, env = "BOOTSTRAP_ADMIN_USERNAME")]
    bootstrap_username: Option<String>,

    /// Password of the superuser created on first start.
    #[arg(long, env = "BOOTSTRAP_ADMIN_PASSWORD", hide_env_values = true)]
    bootstrap_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gamefest_api=debug,gamefest_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!(
        bind = %config.bind_addr,
        environment = ?config.environment,
        max_connections = args.max_connections,
        "starting gamefest_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    gamefest_core::migrate::migrate(&pool).await?;

    let store = Arc::new(PgStore::new(pool));

    match (args.bootstrap_username, args.bootstrap_password) {
        (Some(username), Some(password)) => {
            ensure_superuser(store.as_ref(), &username, &password).await?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must both be set; skipping bootstrap");
        }
        (None, None) => {}
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let app = router(AppState::new(store.clone(), store, config));

    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
