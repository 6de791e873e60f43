//! Configuration loading for Sugarloaf.
//! Reads sugarloaf.toml from the current directory, or the path given by
//! `--config` / the SUGARLOAF_CONFIG env var.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sugarloaf_embed::EncoderConfig;
use sugarloaf_resolve::catalog::{catalog_path, DEFAULT_NAME_COLUMN};
use sugarloaf_resolve::ResolverConfig;

const DEFAULT_CONFIG_FILE: &str = "sugarloaf.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub embedding: EncoderConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Parquet file, or a dataset root containing metadata/obs_metadata.parquet
    pub path: Option<PathBuf>,
    #[serde(default = "default_name_column")]
    pub column: String,
}

fn default_name_column() -> String { DEFAULT_NAME_COLUMN.to_string() }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: None, column: default_name_column() }
    }
}

impl CatalogConfig {
    /// The Parquet file to read, if a catalog is configured.
    pub fn file(&self) -> Option<PathBuf> {
        self.path.as_ref().map(|p| if p.is_dir() { catalog_path(p) } else { p.clone() })
    }
}

impl Config {
    /// Load from an explicit path, or from ./sugarloaf.toml when present.
    /// With neither, every section takes its defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_path(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Config file not found: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests;
