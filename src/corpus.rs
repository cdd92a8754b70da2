//! Loading recipe corpora and engine configs from JSON files

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use recipex_core::RecipeRecord;
use recipex_engine::EngineConfig;

/// Read a JSON array of recipe objects.
///
/// Keys follow the dataset columns: `recipe_name`, `prep_time`, `calories`,
/// `fat`, `carbohydrates`, `protein`, `cholesterol`, `sodium`, `fiber`,
/// `ingredients_list` and optionally `formatted_directions`.
pub fn load_corpus(path: impl AsRef<Path>) -> anyhow::Result<Vec<RecipeRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    let records: Vec<RecipeRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse corpus {}", path.display()))?;
    if records.is_empty() {
        bail!("corpus {} contains no recipes", path.display());
    }
    tracing::debug!(recipes = records.len(), path = %path.display(), "loaded corpus");
    Ok(records)
}

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<EngineConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}
