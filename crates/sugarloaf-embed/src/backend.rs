//! Encoder capability: a tokenizer plus a frozen forward pass.

use candle_core::Tensor;

use crate::Result;

/// Token ids and attention mask for one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenizedInput {
    pub ids: Vec<u32>,
    /// 1 for real tokens, 0 for padding.
    pub attention_mask: Vec<u32>,
}

impl TokenizedInput {
    pub fn new(ids: Vec<u32>, attention_mask: Vec<u32>) -> Self {
        Self { ids, attention_mask }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drop tokens beyond `max_length`.
    pub fn truncate(&mut self, max_length: usize) {
        self.ids.truncate(max_length);
        self.attention_mask.truncate(max_length);
    }
}

/// Pretrained sequence encoder used for inference only.
///
/// `forward` returns the last hidden state, shaped (1, seq_len, hidden_dim),
/// for a single tokenized sequence.
pub trait EncoderBackend: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<TokenizedInput>;

    fn forward(&self, input: &TokenizedInput) -> Result<Tensor>;

    /// Longest sequence the model accepts.
    fn max_length(&self) -> usize;
}

impl<B: EncoderBackend + ?Sized> EncoderBackend for std::sync::Arc<B> {
    fn tokenize(&self, text: &str) -> Result<TokenizedInput> {
        (**self).tokenize(text)
    }

    fn forward(&self, input: &TokenizedInput) -> Result<Tensor> {
        (**self).forward(input)
    }

    fn max_length(&self) -> usize {
        (**self).max_length()
    }
}
