//! Built-in model catalog and `MEEE_MODELS` parsing.
//!
//! The catalog is loaded from `config/models.json` (embedded at compile time, checked by build.rs).

use std::sync::OnceLock;

use crate::core::config::ConfigError;

use super::info::ModelInfo;

/// Provider assigned to bare ids in `MEEE_MODELS`.
pub const DEFAULT_PROVIDER: &str = "Meee API";

fn load_builtin_catalog() -> Vec<ModelInfo> {
    let json = include_str!("../../../config/models.json");
    serde_json::from_str(json).expect("models.json must be valid")
}

static BUILTIN_CATALOG: OnceLock<Vec<ModelInfo>> = OnceLock::new();

/// Returns the built-in catalog, loading it on first access.
pub fn builtin_catalog() -> &'static [ModelInfo] {
    BUILTIN_CATALOG.get_or_init(load_builtin_catalog)
}

/// Parse a comma separated list of `provider:id` or bare `id` entries.
pub fn parse_model_list(list: &str) -> Result<Vec<ModelInfo>, ConfigError> {
    let mut models = Vec::new();
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (provider, id) = match entry.split_once(':') {
            Some((provider, id)) => (provider.trim(), id.trim()),
            None => (DEFAULT_PROVIDER, entry),
        };
        if id.is_empty() || provider.is_empty() {
            return Err(ConfigError::InvalidModelEntry(entry.to_string()));
        }
        if models.iter().any(|m: &ModelInfo| m.id == id) {
            log::warn!("Duplicate model id in MEEE_MODELS ignored: {}", id);
            continue;
        }
        models.push(ModelInfo::new(id, provider));
    }
    if models.is_empty() {
        return Err(ConfigError::InvalidModelEntry(list.to_string()));
    }
    Ok(models)
}
