//! FireWatch API — firewall log ingestion and analysis REST server.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use fw_api::config::ApiConfig;
use fw_api::state::AppState;
use fw_api::{db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fw-api starting");

    let config = ApiConfig::from_env();

    let state = if let Some(database_url) = &config.database_url {
        tracing::info!("connecting to PostgreSQL");
        let pool = db::connect(database_url).await?;
        AppState::with_pool(pool, config.thresholds)
    } else {
        tracing::warn!("DATABASE_URL not set, records are kept in memory");
        AppState::in_memory(config.thresholds)
    };

    let app = routes::build_router(state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        max_upload_bytes = config.max_upload_bytes,
        multiple_drop_threshold = config.thresholds.multiple_drop,
        brute_force_ports_threshold = config.thresholds.brute_force_ports,
        "listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
