//! Shared model descriptor type (no dependencies on the catalog or the network).

use serde::{Deserialize, Serialize};

/// Provider label used when a descriptor names none.
pub const UNKNOWN_PROVIDER: &str = "Unknown";

/// Outcome of the last request made with a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelHealth {
    /// Never probed in this session.
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl ModelHealth {
    pub fn from_probe(ok: bool) -> Self {
        if ok { Self::Available } else { Self::Unavailable }
    }

    /// Short marker for lists: "✓", "✗" or "·".
    pub fn marker(self) -> &'static str {
        match self {
            Self::Unknown => "·",
            Self::Available => "✓",
            Self::Unavailable => "✗",
        }
    }
}

/// Model descriptor for display and selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default = "unknown_provider")]
    pub provider: String,
    /// Whether the model may be used at all (catalog flag).
    #[serde(default = "active_by_default")]
    pub active: bool,
    #[serde(default)]
    pub health: ModelHealth,
}

fn unknown_provider() -> String {
    UNKNOWN_PROVIDER.to_string()
}

fn active_by_default() -> bool {
    true
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            active: true,
            health: ModelHealth::Unknown,
        }
    }

    /// Provider label for grouping; empty providers fall back to "Unknown".
    pub fn provider_label(&self) -> &str {
        if self.provider.trim().is_empty() {
            UNKNOWN_PROVIDER
        } else {
            &self.provider
        }
    }
}
