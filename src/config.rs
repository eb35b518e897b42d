use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MedInsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "medinsight=info,tower_http=info".to_string()
}

/// Runtime configuration, resolved once at process start.
///
/// Everything is supplied through the environment; nothing is
/// hard-coded into the binary:
/// - `MEDINSIGHT_ADDR`: socket address to bind (default `127.0.0.1:8000`)
/// - `MEDINSIGHT_DB`:   path to the SQLite database file
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = match std::env::var("MEDINSIGHT_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(addr = %raw, "Invalid MEDINSIGHT_ADDR, using default");
                default_bind_addr()
            }),
            Err(_) => default_bind_addr(),
        };

        let db_path = std::env::var("MEDINSIGHT_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        Self { bind_addr, db_path }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Get the application data directory
/// ~/MedInsight/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

fn default_db_path() -> PathBuf {
    app_data_dir().join("medinsight.db")
}
