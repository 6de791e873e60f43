//! sugarloaf-common - Shared compound types passed between the resolution and embedding stages.

pub mod modality;

pub use modality::{Embeddings, FailureLog, Modalities, ResolvedModality};
