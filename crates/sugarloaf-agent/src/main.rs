//! Sugarloaf - compound name resolution and molecular embeddings.
//! Entry point for the `sugarloaf` binary.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use sugarloaf_embed::{BatchEncoder, BatchEncoding, ChembertaBackend, MolecularEncoder};
use sugarloaf_resolve::{BatchResolver, ResolutionClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::pipeline::PipelineReport;

/// Resolve compound names to PubChem SMILES/CIDs and embed them with ChemBERTa.
#[derive(Debug, Parser)]
#[command(name = "sugarloaf", version, about)]
struct Cli {
    /// Config file (defaults to ./sugarloaf.toml when present)
    #[arg(long, env = "SUGARLOAF_CONFIG")]
    config: Option<PathBuf>,

    /// Parquet catalog file or dataset root, overriding [catalog] path
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Catalog column holding compound names, overriding [catalog] column
    #[arg(long)]
    column: Option<String>,

    /// Write the JSON report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Stop after resolution
    #[arg(long)]
    skip_embedding: bool,

    /// Compound names; when empty, names come from the catalog
    names: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sugarloaf=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Sugarloaf v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog.path = Some(catalog);
    }
    if let Some(column) = cli.column {
        config.catalog.column = column;
    }

    let names = pipeline::collect_names(&cli.names, &config.catalog)?;
    info!(
        "Resolving {} compounds (query_rate={}s, max_retries={})",
        names.len(),
        config.resolver.query_rate,
        config.resolver.max_retries
    );

    let client = ResolutionClient::new(&config.resolver)?;
    let resolution = BatchResolver::new(client).resolve_batch(&names).await;
    info!("Retrieved SMILES for {} compounds", resolution.resolved.len());

    let encoding = if cli.skip_embedding {
        BatchEncoding::default()
    } else if resolution.resolved.is_empty() {
        warn!("Nothing resolved, skipping model load");
        BatchEncoding::default()
    } else {
        let backend = ChembertaBackend::load(&config.embedding).await?;
        info!(
            "Encoder ready: {} ({}-dim, gpu={})",
            backend.model_id(),
            backend.hidden_size(),
            backend.is_gpu()
        );
        let encoder = MolecularEncoder::new(backend).with_normalize(config.embedding.normalize);
        BatchEncoder::new(encoder).encode_batch(&resolution.resolved)
    };

    PipelineReport::new(resolution, encoding).write(cli.output.as_deref())
}
