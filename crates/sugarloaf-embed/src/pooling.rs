//! Reducing per-token hidden states to one vector per sequence.

use candle_core::Tensor;

/// Floor for the per-sequence mask sum, so an all-padding row divides by a
/// tiny positive number instead of zero.
pub const MASK_SUM_EPSILON: f32 = 1e-9;

/// Mean of hidden states over real tokens.
///
/// * `hidden` - (batch, seq_len, hidden_dim), F32
/// * `attention_mask` - (batch, seq_len), F32, 1 for real tokens and 0 for padding
///
/// Returns (batch, hidden_dim). An all-padding row pools to zeros.
pub fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(MASK_SUM_EPSILON, f32::MAX)?;
    summed.broadcast_div(&counts)
}

/// L2 normalize each row of a (batch, hidden_dim) tensor.
pub fn l2_normalize(pooled: &Tensor) -> candle_core::Result<Tensor> {
    let norms = pooled
        .sqr()?
        .sum_keepdim(1)?
        .sqrt()?
        .clamp(MASK_SUM_EPSILON, f32::MAX)?;
    pooled.broadcast_div(&norms)
}
