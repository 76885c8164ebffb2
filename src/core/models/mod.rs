//! Model descriptors, the built-in catalog, filtering and provider grouping.

mod catalog;
mod info;

pub use catalog::{DEFAULT_PROVIDER, builtin_catalog, parse_model_list};
pub use info::{ModelHealth, ModelInfo, UNKNOWN_PROVIDER};

/// Filter models by query (case-insensitive match on id or provider).
/// Surrounding whitespace in the query is ignored; an empty query keeps everything.
pub fn filter_models<'a>(models: &'a [ModelInfo], query: &str) -> Vec<&'a ModelInfo> {
    let q = query.trim().to_lowercase();
    models
        .iter()
        .filter(|m| {
            q.is_empty()
                || m.id.to_lowercase().contains(&q)
                || m.provider_label().to_lowercase().contains(&q)
        })
        .collect()
}

/// Look a model up by id.
pub fn find_model<'a>(models: &'a [ModelInfo], id: &str) -> Option<&'a ModelInfo> {
    models.iter().find(|m| m.id == id)
}

/// Group models by provider, keeping providers in order of first appearance.
pub fn group_by_provider<'a>(models: &[&'a ModelInfo]) -> Vec<(&'a str, Vec<&'a ModelInfo>)> {
    let mut groups: Vec<(&'a str, Vec<&'a ModelInfo>)> = Vec::new();
    for &model in models {
        let provider = model.provider_label();
        match groups.iter_mut().find(|(p, _)| *p == provider) {
            Some((_, members)) => members.push(model),
            None => groups.push((provider, vec![model])),
        }
    }
    groups
}
