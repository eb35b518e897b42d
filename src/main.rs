use medinsight::api::{api_router, ApiContext};
use medinsight::config::{self, AppConfig};
use medinsight::db;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env();
    if let Err(e) = run(config).await {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), String> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create data directory: {e}"))?;
    }

    // Open once at startup so migrations run before the first request.
    db::sqlite::open_database(&config.db_path)
        .map_err(|e| format!("Cannot open database: {e}"))?;
    tracing::info!(path = %config.db_path.display(), "Database ready");

    let app = api_router(ApiContext::new(config.db_path));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {e}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {e}"))
}
