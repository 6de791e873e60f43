//! Sugarloaf molecular embeddings
//!
//! Pure Rust ChemBERTa embeddings using Candle (Hugging Face).
//! No Python dependency - direct model loading from Hugging Face Hub.
//!
//! # Features
//! - Attention-masked mean pooling of the encoder's last hidden state
//! - Encoder capability behind [`EncoderBackend`], so pooling and batching run
//!   against any tokenizer + forward pass
//! - GPU support (CUDA, Metal) with automatic fallback to CPU
//! - Per-molecule failure containment: one bad SMILES never aborts a batch
//!
//! # Example
//! ```no_run
//! use sugarloaf_common::{Modalities, ResolvedModality};
//! use sugarloaf_embed::{BatchEncoder, ChembertaBackend, EncoderConfig, MolecularEncoder};
//!
//! #[tokio::main]
//! async fn main() -> sugarloaf_embed::Result<()> {
//!     let backend = ChembertaBackend::load(&EncoderConfig::cpu()).await?;
//!     let encoder = BatchEncoder::new(MolecularEncoder::new(backend));
//!
//!     let mut resolved = Modalities::new();
//!     resolved.insert("Aspirin".into(), ResolvedModality::new("CC(=O)OC1=CC=CC=C1C(=O)O", "2244"));
//!
//!     let batch = encoder.encode_batch(&resolved);
//!     println!("Embedding dimension: {}", batch.embeddings["Aspirin"].len()); // 384
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod batch;
pub mod chemberta;
pub mod config;
pub mod encoder;
pub mod error;
pub mod pooling;

pub use backend::{EncoderBackend, TokenizedInput};
pub use batch::{BatchEncoder, BatchEncoding};
pub use chemberta::ChembertaBackend;
pub use config::EncoderConfig;
pub use encoder::MolecularEncoder;
pub use error::{EmbedError, Result};
