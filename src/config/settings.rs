use anyhow::{Context, Result};
use secrecy::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use url::Url;
use validator::Validate;

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Settings {
    /// Address the HTML front-end listens on.
    #[serde(default = "default_bind_address")]
    #[validate(custom = "validate_socket_addr")]
    pub bind_address: String,
    /// Base URL of the upstream users API.
    #[validate(custom = "validate_url")]
    pub backend_base_url: String,
    /// Transport-level timeout for every backend call.
    #[serde(default = "default_backend_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub backend_timeout_secs: u64,
    /// Bearer token attached to the import endpoint, if the backend requires one.
    pub import_token: Option<Secret<String>>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings: Settings = envy::prefixed("USERDESK_")
            .from_env()
            .context("Failed to load settings from environment")?;

        settings.validate().context("Invalid settings")?;

        Ok(settings)
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_backend_timeout_secs() -> u64 {
    10
}

fn validate_socket_addr(addr: &str) -> Result<(), validator::ValidationError> {
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_socket_address"))
}

fn validate_url(url: &str) -> Result<(), validator::ValidationError> {
    Url::parse(url)
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("invalid_url"))
}
