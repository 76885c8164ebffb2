//! CLI-only commands: config info, models list, model test, relay health.
//!
//! These run without opening the TUI and produce plain text output.

use std::env;

use crate::core::assistant::Assistant;
use crate::core::config::{self, Config, ConfigError};
use crate::core::models::{self, ModelInfo};
use crate::core::paths;

/// Run the `config` command: display paths, relay URL, model, and key status.
pub fn run_config() {
    let config_dir = paths::config_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());
    let log_file = paths::log_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string());

    println!("Config:       {}", config_dir);
    println!("Log (TUI):    {}", log_file);
    match config::load() {
        Ok(c) => {
            println!("Relay URL:    {}", c.relay_url);
            println!("Model:        {} ({})", c.model_id, model_source());
            println!("Models:       {}", c.models.len());
        }
        Err(e) => println!("Client:       invalid ({})", e),
    }
    let relay_status = match config::load_relay() {
        Ok(r) => format!("set ✓ (relay binds {}, upstream {})", r.bind_addr(), r.upstream_url),
        Err(ConfigError::MissingApiKey) => "not set".to_string(),
        Err(e) => format!("invalid ({})", e),
    };
    println!("API key:      {}", relay_status);
}

fn model_source() -> &'static str {
    if env::var("MEEE_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .is_some()
    {
        "from MEEE_MODEL"
    } else {
        "default"
    }
}

/// Render models as a provider-grouped table.
fn format_models(models: &[&ModelInfo]) -> String {
    let id_w = models.iter().map(|m| m.id.len()).max().unwrap_or(10).max(10);
    let mut out = String::new();
    for (provider, members) in models::group_by_provider(models) {
        out.push_str(&format!("{}\n", provider));
        for m in members {
            let status = if m.active { "active" } else { "inactive" };
            out.push_str(&format!("  {:<id_w$}  {}\n", m.id, status));
        }
    }
    out
}

/// Run the `models` command: list catalog models grouped by provider.
pub fn run_models(config: &Config, query: Option<&str>) {
    let filtered = models::filter_models(&config.models, query.unwrap_or(""));
    if filtered.is_empty() {
        println!("No models found.");
        return;
    }
    print!("{}", format_models(&filtered));
    println!("\n{} model(s) listed", filtered.len());
}

/// Run the `test` command. With a model: probe it. Without: greet the default model.
pub async fn run_test(config: &Config, model: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = Assistant::new(config);
    match model {
        Some(id) => {
            if assistant.test_model(id).await {
                println!("{} ✓ available", id);
                Ok(())
            } else {
                Err(format!("{} ✗ unavailable", id).into())
            }
        }
        None => {
            let reply = assistant.test_api().await?;
            println!("API test response: {}", reply);
            Ok(())
        }
    }
}

/// Run the `health` command against the relay.
pub async fn run_health(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let report = Assistant::new(config).relay_health().await?;
    println!("{} ({})", report.status, report.timestamp);
    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("relay reported status {}", report.status).into())
    }
}
