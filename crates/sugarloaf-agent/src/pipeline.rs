//! Name collection and the JSON report written at the end of a run.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use sugarloaf_common::{Embeddings, FailureLog, Modalities};
use sugarloaf_embed::BatchEncoding;
use sugarloaf_resolve::{catalog, BatchResolution};
use tracing::info;

use crate::config::CatalogConfig;

/// Names given on the command line win; otherwise read the catalog column.
///
/// Repeated command-line names are dropped, keeping the first occurrence.
pub fn collect_names(cli_names: &[String], catalog: &CatalogConfig) -> anyhow::Result<Vec<String>> {
    if !cli_names.is_empty() {
        let mut seen = HashSet::new();
        let mut names = cli_names.to_vec();
        names.retain(|name| seen.insert(name.clone()));
        return Ok(names);
    }

    let Some(file) = catalog.file() else {
        bail!("No compound names: pass names as arguments or set [catalog] path in sugarloaf.toml");
    };

    let names = catalog::read_column(&file, &catalog.column)
        .with_context(|| format!("Failed to read '{}' from {}", catalog.column, file.display()))?;
    info!("Loaded {} unique compound names from {}", names.len(), file.display());
    Ok(names.into_iter().collect())
}

/// Everything a run produced, keyed by original compound name.
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub modalities: Modalities,
    pub embeddings: Embeddings,
    pub failed_resolution: FailureLog,
    pub failed_encoding: FailureLog,
}

impl PipelineReport {
    pub fn new(resolution: BatchResolution, encoding: BatchEncoding) -> Self {
        Self {
            modalities: resolution.resolved,
            embeddings: encoding.embeddings,
            failed_resolution: resolution.failures,
            failed_encoding: encoding.failures,
        }
    }

    /// Pretty JSON to `path`, or stdout.
    pub fn write(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        match path {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                info!("Report written to {}", path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}
