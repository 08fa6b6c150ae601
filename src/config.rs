use clap::{Args, Parser, ValueEnum};
use std::time::Duration;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    #[command(flatten)]
    pub health: HealthConfig,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite::memory:` keeps everything in RAM)
    #[arg(long = "database-url", env = "MSGBOARD_DATABASE_URL", default_value = "sqlite://messages.db")]
    pub url: String,

    /// Maximum number of pooled connections
    #[arg(long = "db-max-connections", env = "MSGBOARD_DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Minimum number of idle connections kept open
    #[arg(long = "db-min-connections", env = "MSGBOARD_DB_MIN_CONNECTIONS", default_value_t = 1)]
    pub min_connections: u32,

    /// How long to wait for a free connection before giving up
    #[arg(long = "db-acquire-timeout-secs", env = "MSGBOARD_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 3)]
    pub acquire_timeout_secs: u64,

    /// How long SQLite waits on a locked database before failing a statement
    #[arg(long = "db-busy-timeout-ms", env = "MSGBOARD_DB_BUSY_TIMEOUT_MS", default_value_t = 2000)]
    pub busy_timeout_ms: u64,

    /// Upper bound on any single storage operation
    #[arg(long = "db-operation-timeout-ms", env = "MSGBOARD_DB_OPERATION_TIMEOUT_MS", default_value_t = 5000)]
    pub operation_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "MSGBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "MSGBOARD_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health) server
    #[arg(long, env = "MSGBOARD_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Hard limit on how long a single HTTP request may take
    #[arg(long, env = "MSGBOARD_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight work after a shutdown signal
    #[arg(long, env = "MSGBOARD_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "MSGBOARD_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are only exported when set
    #[arg(long, env = "MSGBOARD_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the readiness database check
    #[arg(long = "health-db-timeout-ms", env = "MSGBOARD_HEALTH_DB_TIMEOUT_MS", default_value_t = 2000)]
    pub db_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Per-operation storage bound, never shorter than the SQLite busy timeout
    /// so a statement waiting on a lock is not abandoned before SQLite gives up.
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms.max(self.busy_timeout_ms))
    }
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
