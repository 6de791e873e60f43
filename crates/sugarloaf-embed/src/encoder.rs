//! Single-molecule encoding: tokenize, forward, masked mean pool.

use candle_core::{DType, Tensor};
use tracing::{debug, warn};

use crate::pooling::{l2_normalize, masked_mean};
use crate::{EmbedError, EncoderBackend, Result};

/// Turns one SMILES string into a fixed-size embedding.
pub struct MolecularEncoder<B> {
    backend: B,
    normalize: bool,
}

impl<B: EncoderBackend> MolecularEncoder<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, normalize: false }
    }

    /// L2-normalize pooled vectors.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Encode, logging and swallowing any tokenizer or model failure.
    pub fn encode(&self, smiles: &str) -> Option<Vec<f32>> {
        match self.try_encode(smiles) {
            Ok(embedding) => Some(embedding),
            Err(e) => {
                warn!(smiles, error = %e, "Failed to encode SMILES");
                None
            }
        }
    }

    /// Encode, returning the failure to the caller.
    pub fn try_encode(&self, smiles: &str) -> Result<Vec<f32>> {
        let mut input = self.backend.tokenize(smiles)?;
        input.truncate(self.backend.max_length());
        if input.attention_mask.len() != input.ids.len() {
            return Err(EmbedError::InvalidInput(format!(
                "attention mask has {} entries for {} tokens",
                input.attention_mask.len(),
                input.ids.len()
            )));
        }

        let hidden = self.backend.forward(&input)?.to_dtype(DType::F32)?;
        let (batch, seq_len, hidden_dim) = hidden.dims3()?;
        if batch != 1 || seq_len != input.len() {
            return Err(EmbedError::Inference(format!(
                "expected hidden states (1, {}, _), got ({}, {}, {})",
                input.len(),
                batch,
                seq_len,
                hidden_dim
            )));
        }

        let mask = Tensor::new(input.attention_mask.as_slice(), hidden.device())?
            .to_dtype(DType::F32)?
            .unsqueeze(0)?;
        let pooled = masked_mean(&hidden, &mask)?;
        let pooled = if self.normalize { l2_normalize(&pooled)? } else { pooled };

        debug!(tokens = seq_len, dim = hidden_dim, "Encoded molecule");
        Ok(pooled.squeeze(0)?.to_vec1::<f32>()?)
    }
}
