//! Configuration for the chat client and the relay, read from the environment (and `.env`).

use std::env;

use reqwest::Url;

use crate::core::models::{self, ModelInfo};

/// Default relay chat endpoint used by the client.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3001/api/chat";
/// Default upstream base URL the relay forwards to.
pub const DEFAULT_UPSTREAM_URL: &str = "https://meeeapi.vercel.app";
/// Default model id.
pub const DEFAULT_MODEL: &str = "a4";
pub const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
pub const DEFAULT_RELAY_PORT: u16 = 3001;

/// Client-side configuration. Holds no credential.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay chat base, e.g. `http://localhost:3001/api/chat`.
    pub relay_url: Url,
    /// Model selected at startup.
    pub model_id: String,
    /// Models offered in the selector.
    pub models: Vec<ModelInfo>,
    /// Show HH:MM next to message labels in the TUI.
    pub show_timestamps: bool,
}

/// Relay configuration. The API key only ever lives here.
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub upstream_url: Url,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"[HIDDEN]")
            .field("upstream_url", &self.upstream_url.as_str())
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl RelayConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MEEE_API_KEY is not set (the relay needs it to reach the upstream API)")]
    MissingApiKey,
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("MEEE_RELAY_PORT is not a valid port: {0}")]
    InvalidPort(String),
    #[error("MEEE_MODELS has an invalid entry: {0:?}")]
    InvalidModelEntry(String),
}

/// Load client configuration from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_with(|key| env::var(key).ok())
}

/// Load relay configuration from the process environment. Fails without an API key.
pub fn load_relay() -> Result<RelayConfig, ConfigError> {
    load_relay_with(|key| env::var(key).ok())
}

/// Load client configuration using `get` to look up variables.
pub fn load_with(get: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let relay_url = parse_url(
        "MEEE_API_URL",
        get("MEEE_API_URL").unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
    )?;
    let model_id = get("MEEE_MODEL")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let models = match get("MEEE_MODELS") {
        Some(list) if !list.trim().is_empty() => models::parse_model_list(&list)?,
        _ => models::builtin_catalog().to_vec(),
    };
    let show_timestamps = get("MEEE_SHOW_TIMESTAMPS")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    Ok(Config {
        relay_url,
        model_id,
        models,
        show_timestamps,
    })
}

/// Load relay configuration using `get` to look up variables.
pub fn load_relay_with(get: impl Fn(&str) -> Option<String>) -> Result<RelayConfig, ConfigError> {
    let api_key = get("MEEE_API_KEY")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingApiKey)?;
    let upstream_url = parse_url(
        "MEEE_UPSTREAM_URL",
        get("MEEE_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
    )?;
    let host = get("MEEE_RELAY_HOST").unwrap_or_else(|| DEFAULT_RELAY_HOST.to_string());
    let port = match get("MEEE_RELAY_PORT") {
        Some(p) => p
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(p))?,
        None => DEFAULT_RELAY_PORT,
    };

    Ok(RelayConfig {
        api_key,
        upstream_url,
        host,
        port,
    })
}

fn parse_url(var: &'static str, value: String) -> Result<Url, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|_| ConfigError::InvalidUrl { var, value })
}
