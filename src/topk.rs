//! Top-k / bottom-k extraction along the trailing tensor axis
//!
//! The sort primitive only operates on the last dimension, so callers are
//! expected to arrange their data as `[rows, candidates]` first (see
//! `view::layer_slice`). Bottom-k reuses the same top-k call on the negated
//! input and reverses the rank axis so both orderings read descending.

use anyhow::Result;
use candle_core::{Tensor, D};

/// Per-row k largest values and their source indices, sorted descending.
///
/// Input shape `[rows, n]`, output shapes `[rows, k]` (values f32, indices
/// u32). A `k` larger than `n` is not validated here; the underlying
/// `narrow` reports its own out-of-range error.
pub fn topk_last_dim(t: &Tensor, k: usize) -> Result<(Tensor, Tensor)> {
    let (sorted, indices) = t.contiguous()?.sort_last_dim(false)?;
    let values = sorted.narrow(D::Minus1, 0, k)?;
    let indices = indices.narrow(D::Minus1, 0, k)?;
    Ok((values, indices))
}

/// Per-row k smallest values and their source indices.
///
/// Computed by negating the input through [`topk_last_dim`], then negating
/// the values back and reversing the rank axis, so the result reads
/// descending with the most-negative value last.
pub fn bottomk_last_dim(t: &Tensor, k: usize) -> Result<(Tensor, Tensor)> {
    let (neg_values, indices) = topk_last_dim(&t.neg()?, k)?;
    let values = reverse_last_dim(&neg_values.neg()?)?;
    let indices = reverse_last_dim(&indices)?;
    Ok((values, indices))
}

/// Reverse a tensor along its last dimension.
pub fn reverse_last_dim(t: &Tensor) -> Result<Tensor> {
    let n = t.dim(D::Minus1)?;
    let rev: Vec<u32> = (0..n as u32).rev().collect();
    let rev = Tensor::from_vec(rev, n, t.device())?;
    Ok(t.contiguous()?.index_select(&rev, t.rank() - 1)?)
}
