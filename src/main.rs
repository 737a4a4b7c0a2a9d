//! Portal binary — configuration, tracing, store, HTTP server.

use tracing_subscriber::EnvFilter;

use careportal::api::{portal_router, ApiContext};
use careportal::config::{self, PortalConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = match PortalConfig::load_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "cannot load configuration");
            std::process::exit(1);
        }
    };

    let credentials = match cfg.credential_set() {
        Ok(set) => set,
        Err(e) => {
            tracing::error!(error = %e, "cannot load credentials");
            std::process::exit(1);
        }
    };

    let db_path = cfg.database_path();
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!(error = %e, "cannot create data directory");
            std::process::exit(1);
        }
    }

    let ctx = match ApiContext::open(&db_path, credentials) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "cannot open the store");
            std::process::exit(1);
        }
    };

    let app = portal_router(ctx);

    let listener = match tokio::net::TcpListener::bind(&cfg.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %cfg.bind_addr, "cannot bind");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %cfg.bind_addr, "portal listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
