// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Fracture Match Team

//! Matching configuration system

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
const CONFIG_FILE: &str = "fracture-match.toml";

/// Matching configuration
///
/// Passed explicitly into the loader, engine, and pipeline so that parallel
/// jobs and tests can use independent configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Root data folder; `{root}/{name}` holds one object's point clouds
    pub data_root: PathBuf,
    /// Proximity distance threshold, in point-coordinate units
    pub epsilon: f64,
    /// Minimum match count; a pair is adjacent when its count strictly
    /// exceeds this
    pub min_matches: usize,
    /// Cap on the fragment index scan per object
    pub max_fragments: usize,
    /// Export a color-coded scatter of the loaded fragments
    pub visualize: bool,
    /// Worker-pool size for batch processing
    pub workers: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            epsilon: 1e-3,
            min_matches: 100,
            max_fragments: 1000,
            visualize: false,
            workers: 4,
        }
    }
}

impl MatchConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: MatchConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `fracture-match.toml` from the working directory if present,
    /// otherwise the defaults
    pub fn load() -> Result<Self> {
        if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
