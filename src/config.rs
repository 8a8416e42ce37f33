use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::interaction::InteractionConstants;
use crate::engine::layout::LayoutConstants;

/// Tuning overrides read from a JSON file. Any key left out keeps its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConstants,
    pub interaction: InteractionConstants,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read engine config {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("failed to parse engine config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
