//! Build script: validates models.json at compile time.

use std::path::PathBuf;

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let catalog_path: PathBuf = [&manifest_dir, "config", "models.json"].iter().collect();
    println!("cargo:rerun-if-changed={}", catalog_path.display());
    let json = std::fs::read_to_string(&catalog_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. models.json must exist and be valid.",
            catalog_path.display(),
            e
        )
    });
    // Mirrors the runtime model entry: only `id` is required.
    #[derive(serde::Deserialize)]
    struct CatalogEntry {
        id: String,
        provider: Option<String>,
    }
    let entries: Vec<CatalogEntry> = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!("models.json is invalid JSON: {}. Fix the file and rebuild.", e)
    });
    if entries.is_empty() {
        panic!("models.json must list at least one model");
    }
    if let Some(bad) = entries.iter().find(|e| e.id.trim().is_empty()) {
        panic!(
            "models.json has an entry with an empty id (provider {:?})",
            bad.provider
        );
    }
}
