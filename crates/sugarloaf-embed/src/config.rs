//! Configuration for the molecular encoder.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::ChembertaBackend`] and [`crate::MolecularEncoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Hugging Face model ID
    pub model_id: String,

    /// Maximum sequence length in tokens (default: 512)
    pub max_length: usize,

    /// Use GPU if available (default: false)
    pub use_gpu: bool,

    /// L2-normalize pooled vectors (default: false)
    pub normalize: bool,

    /// Cache directory for downloaded models
    pub cache_dir: Option<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_id: "DeepChem/ChemBERTa-77M-MTR".to_string(),
            max_length: 512,
            use_gpu: false,
            normalize: false,
            cache_dir: None,
        }
    }
}

impl EncoderConfig {
    /// Create config for CPU-only inference.
    pub fn cpu() -> Self {
        Self {
            use_gpu: false,
            ..Default::default()
        }
    }

    /// Create config for GPU inference.
    pub fn gpu() -> Self {
        Self {
            use_gpu: true,
            ..Default::default()
        }
    }

    /// Use a custom model.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Set maximum sequence length.
    pub fn with_max_length(mut self, length: usize) -> Self {
        self.max_length = length;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}
