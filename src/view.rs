//! Selection-to-slice mapping and the derived token table
//!
//! `layer_slice` reduces a sample's rank-3 activations to the 2D
//! `[neurons, tokens]` matrix the top-k primitives need; `TokenTable` is the
//! display-ready result: token/value matrices in `[rank, neuron]`
//! orientation for both the top-k and bottom-k tables.

use anyhow::Result;
use candle_core::{IndexOp, Tensor};

use crate::selection::Selection;
use crate::topk::{bottomk_last_dim, topk_last_dim};

/// Slice one layer and a contiguous inclusive neuron range out of a
/// `(tokens, layers, neurons)` tensor.
///
/// Indexing the layer drops that axis; the transpose puts neurons first
/// because the top-k primitive only works along the trailing axis. Returns
/// shape `(range_len, tokens)`.
pub fn layer_slice(
    activations: &Tensor,
    layer: usize,
    neuron_lo: usize,
    neuron_hi: usize,
) -> Result<Tensor> {
    let slice = activations.i((.., layer, neuron_lo..neuron_hi + 1))?;
    Ok(slice.t()?.contiguous()?)
}

/// Display-ready top-k / bottom-k table for one selection.
///
/// All four matrices are `[token-rank][neuron]`: row r holds the rank-r
/// token (or value) for every displayed neuron. Top rows read descending;
/// bottom rows read descending too, with the most-negative value last.
#[derive(Debug, Clone)]
pub struct TokenTable {
    /// Absolute neuron indices of the displayed columns
    pub neuron_indices: Vec<usize>,
    /// Top-k token strings, [rank][neuron]
    pub top_tokens: Vec<Vec<String>>,
    /// Top-k activation values, [rank][neuron]
    pub top_values: Vec<Vec<f32>>,
    /// Bottom-k token strings, [rank][neuron]
    pub bottom_tokens: Vec<Vec<String>>,
    /// Bottom-k activation values, [rank][neuron]
    pub bottom_values: Vec<Vec<f32>>,
    /// Largest |value| across both tables, for color scaling
    pub max_abs: f32,
}

impl TokenTable {
    /// Compute the table for one sample's activations and token list.
    ///
    /// `activations` has shape `(tokens, layers, neurons)`; token indices
    /// coming back from top-k are positions in `tokens` by construction, so
    /// resolution does not re-check bounds.
    pub fn build(activations: &Tensor, tokens: &[String], selection: &Selection) -> Result<Self> {
        let slice = layer_slice(
            activations,
            selection.layer,
            selection.neuron_lo,
            selection.neuron_hi,
        )?;

        let (top_values, top_indices) = topk_last_dim(&slice, selection.k)?;
        let (bottom_values, bottom_indices) = bottomk_last_dim(&slice, selection.k)?;

        // Back to [rank, neuron] for display
        let top_values = transpose_to_rows(&top_values)?;
        let bottom_values = transpose_to_rows(&bottom_values)?;
        let top_tokens = resolve_tokens(&top_indices, tokens)?;
        let bottom_tokens = resolve_tokens(&bottom_indices, tokens)?;

        let max_abs = top_values
            .iter()
            .chain(bottom_values.iter())
            .flatten()
            .fold(0.0f32, |acc, v| acc.max(v.abs()));

        Ok(Self {
            neuron_indices: (selection.neuron_lo..=selection.neuron_hi).collect(),
            top_tokens,
            top_values,
            bottom_tokens,
            bottom_values,
            max_abs,
        })
    }

    /// Number of token-rank rows
    pub fn k(&self) -> usize {
        self.top_values.len()
    }

    /// Number of neuron columns
    pub fn n_columns(&self) -> usize {
        self.neuron_indices.len()
    }

    /// Print both tables to stdout
    pub fn print(&self) {
        println!("Top tokens:");
        print_matrix(&self.neuron_indices, &self.top_tokens, &self.top_values);
        println!("\nBottom tokens:");
        print_matrix(
            &self.neuron_indices,
            &self.bottom_tokens,
            &self.bottom_values,
        );
    }
}

/// `[neurons, k]` tensor to `[rank][neuron]` row vectors
fn transpose_to_rows(t: &Tensor) -> Result<Vec<Vec<f32>>> {
    Ok(t.t()?.contiguous()?.to_vec2()?)
}

/// Map a `[neurons, k]` index tensor to `[rank][neuron]` token strings
fn resolve_tokens(indices: &Tensor, tokens: &[String]) -> Result<Vec<Vec<String>>> {
    let per_neuron: Vec<Vec<u32>> = indices.to_vec2()?;
    let k = per_neuron.first().map_or(0, Vec::len);
    let mut rows = vec![Vec::with_capacity(per_neuron.len()); k];
    for neuron_indices in &per_neuron {
        for (rank, &idx) in neuron_indices.iter().enumerate() {
            rows[rank].push(tokens[idx as usize].clone());
        }
    }
    Ok(rows)
}

/// Escape a token for single-line display
pub fn format_token(token: &str) -> String {
    token
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

fn print_matrix(neurons: &[usize], tokens: &[Vec<String>], values: &[Vec<f32>]) {
    print!("{:>6}", "rank");
    for n in neurons {
        print!(" {:>16}", format!("neuron {n}"));
    }
    println!();
    for (rank, (token_row, value_row)) in tokens.iter().zip(values.iter()).enumerate() {
        print!("{:>6}", rank + 1);
        for (token, value) in token_row.iter().zip(value_row.iter()) {
            let cell = format!("\"{}\" {value:+.2}", format_token(token));
            print!(" {cell:>16}");
        }
        println!();
    }
}
