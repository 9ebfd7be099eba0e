//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_API_BASE_PATH, DEFAULT_APP_NAME, DEFAULT_APP_SERVING_URL, DEFAULT_AUTH_TOKEN,
    DEFAULT_CLOXEL_API_URL, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL,
    DEFAULT_PDF_TIMEOUT_SECONDS, DEFAULT_RECEIPTS_DIR, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TEMPLATES_DIR,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_path: String,
    pub app_name: String,
    pub app_serving_url: String,
    auth_token: String,
    pub pdf_service_url: String,
    pub pdf_timeout_seconds: u64,
    pub templates_dir: PathBuf,
    pub receipts_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("api_base_path", &self.api_base_path)
            .field("app_name", &self.app_name)
            .field("app_serving_url", &self.app_serving_url)
            .field("auth_token", &"[REDACTED]")
            .field("pdf_service_url", &self.pdf_service_url)
            .field("pdf_timeout_seconds", &self.pdf_timeout_seconds)
            .field("templates_dir", &self.templates_dir)
            .field("receipts_dir", &self.receipts_dir)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            app_serving_url: DEFAULT_APP_SERVING_URL.to_string(),
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            pdf_service_url: pdf_service_url_from(DEFAULT_CLOXEL_API_URL),
            pdf_timeout_seconds: DEFAULT_PDF_TIMEOUT_SECONDS,
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            receipts_dir: PathBuf::from(DEFAULT_RECEIPTS_DIR),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let auth_token = env::var("AUTH_TOKEN").unwrap_or_else(|_| {
            tracing::warn!("AUTH_TOKEN not set, using the built-in development token");
            defaults.auth_token.clone()
        });

        let pdf_service_url = env::var("PDF_SERVICE_URL").unwrap_or_else(|_| {
            let api_url =
                env::var("CLOXEL_API_URL").unwrap_or_else(|_| DEFAULT_CLOXEL_API_URL.to_string());
            pdf_service_url_from(&api_url)
        });

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_base_path: env::var("API_BASE_PATH").unwrap_or(defaults.api_base_path),
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_serving_url: env::var("APP_SERVING_URL").unwrap_or(defaults.app_serving_url),
            auth_token,
            pdf_service_url,
            pdf_timeout_seconds: parse_var("PDF_TIMEOUT_SECONDS")
                .unwrap_or(defaults.pdf_timeout_seconds),
            templates_dir: env::var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
            receipts_dir: env::var("RECEIPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.receipts_dir),
        }
    }

    /// Override the token secured routes compare against.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Token the Authorization header must match.
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// The PDF renderer lives next to the Cloxel API, on the `nodemium` host.
fn pdf_service_url_from(api_url: &str) -> String {
    api_url.replacen("api", "nodemium", 1)
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
