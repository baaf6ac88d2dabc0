use auth_gateway::AuthSettings;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,
    #[serde(default)]
    pub log_format: Option<String>,
}

/// Where the book service lives
#[derive(Debug, Clone, Deserialize)]
pub struct BookServiceConfig {
    pub book_service_url: String,
    #[serde(default = "default_book_service_timeout_ms")]
    pub book_service_timeout_ms: u64,
}

impl BookServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.book_service_timeout_ms)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_book_service_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub book_service: BookServiceConfig,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: envy::from_env()?,
            book_service: envy::from_env()?,
            auth: AuthSettings::from_env()?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn json_logs(&self) -> bool {
        self.server
            .log_format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}
