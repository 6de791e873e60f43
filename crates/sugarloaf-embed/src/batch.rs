//! Batch encoding of resolved compounds.

use serde::Serialize;
use sugarloaf_common::{Embeddings, FailureLog, Modalities};
use tracing::info;

use crate::{EncoderBackend, MolecularEncoder};

/// Result of one [`BatchEncoder::encode_batch`] call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchEncoding {
    pub embeddings: Embeddings,
    /// Names whose SMILES failed to encode.
    pub failures: FailureLog,
}

impl BatchEncoding {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// Encodes every resolved compound, one molecule at a time.
///
/// Failures are counted and skipped, never retried: they come from model
/// execution, not from anything transient.
pub struct BatchEncoder<B> {
    encoder: MolecularEncoder<B>,
}

impl<B: EncoderBackend> BatchEncoder<B> {
    pub fn new(encoder: MolecularEncoder<B>) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &MolecularEncoder<B> {
        &self.encoder
    }

    pub fn encode_batch(&self, resolved: &Modalities) -> BatchEncoding {
        let mut batch = BatchEncoding::default();

        for (name, modality) in resolved {
            match self.encoder.encode(&modality.smiles) {
                Some(embedding) => {
                    batch.embeddings.insert(name.clone(), embedding);
                }
                None => batch.failures.record(name.as_str()),
            }
        }

        info!(
            encoded = batch.embeddings.len(),
            failed = batch.failed_count(),
            "Compounds encoded"
        );
        batch
    }
}
