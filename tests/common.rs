#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub)]
use msgboard_server::AppBuilder;
use msgboard_server::adapters::database::{DbPool, MessageStore, init_pool};
use msgboard_server::api::{MgmtState, app_router, mgmt_router};
use msgboard_server::config::{Config, DatabaseConfig, HealthConfig, LogFormat, ServerConfig, TelemetryConfig};
use serde_json::Value;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("msgboard_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 2,
            busy_timeout_ms: 1000,
            operation_timeout_ms: 2000,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            request_timeout_secs: 10,
            shutdown_timeout_secs: 1,
        },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
        health: HealthConfig { db_timeout_ms: 1000 },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub pool: DbPool,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(get_test_config(), None).await
    }

    pub async fn spawn_with_store(store: Arc<dyn MessageStore>) -> Self {
        Self::spawn_with(get_test_config(), Some(store)).await
    }

    pub async fn spawn_with_config_and_store(config: Config, store: Arc<dyn MessageStore>) -> Self {
        Self::spawn_with(config, Some(store)).await
    }

    async fn spawn_with(config: Config, store: Option<Arc<dyn MessageStore>>) -> Self {
        setup_tracing();

        let pool = init_pool(&config.database).await.expect("Failed to open test database");
        msgboard_server::run_migrations(&pool).await.expect("Failed to run migrations");

        let mut builder = AppBuilder::new(config.clone()).with_database(pool.clone());
        if let Some(store) = store {
            builder = builder.with_store(store);
        }
        let app = builder.build().unwrap();

        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let router = app_router(&config, app.services);
        let mgmt = mgmt_router(MgmtState { health_service: app.health_service });

        tokio::spawn(async move {
            axum::serve(api_listener, router).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), pool, config }
    }

    pub fn messages_url(&self) -> String {
        format!("{}/api/messages", self.server_url)
    }

    pub fn message_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/api/messages/{}", self.server_url, id)
    }

    pub async fn post_message(&self, body: &Value) -> reqwest::Response {
        self.client.post(self.messages_url()).json(body).send().await.unwrap()
    }

    /// Posts `text` and returns the created message, asserting 201.
    pub async fn create_message(&self, text: &str) -> Value {
        let resp = self.post_message(&serde_json::json!({ "text": text })).await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    pub async fn list_messages(&self) -> Vec<Value> {
        let resp = self.client.get(self.messages_url()).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.json().await.unwrap()
    }
}
