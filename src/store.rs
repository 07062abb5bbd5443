//! Activation storage: per-sample token lists and activation tensors
//!
//! Each sample carries an ordered token list and a rank-3 activation tensor
//! of shape `(tokens, layers, neurons)`. The store validates at construction
//! that token lists match the token dimension and that layer/neuron
//! dimensions agree across samples; the slicing pipeline downstream performs
//! no bounds checks of its own.

use anyhow::{ensure, Context, Result};
use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Raw JSON structure for loading and saving
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Token strings per sample
    tokens: Vec<Vec<String>>,
    /// Activations per sample: [tokens][layers][neurons]
    activations: Vec<Vec<Vec<Vec<f32>>>>,
}

/// Token lists plus activation tensors for a set of samples
#[derive(Debug)]
pub struct ActivationStore {
    tokens: Vec<Vec<String>>,
    /// One tensor per sample, shape (tokens, layers, neurons)
    activations: Vec<Tensor>,
    n_layers: usize,
    n_neurons: usize,
}

impl ActivationStore {
    /// Build a store from pre-built per-sample tensors.
    ///
    /// Each tensor must have shape `(tokens, layers, neurons)` with the
    /// token dimension equal to the matching token-list length, and all
    /// samples must agree on layer and neuron counts.
    pub fn from_tensors(tokens: Vec<Vec<String>>, activations: Vec<Tensor>) -> Result<Self> {
        ensure!(!activations.is_empty(), "Store needs at least one sample");
        ensure!(
            tokens.len() == activations.len(),
            "Got {} token lists for {} activation tensors",
            tokens.len(),
            activations.len()
        );

        let (_, n_layers, n_neurons) = activations[0].dims3()?;
        for (sample, (toks, acts)) in tokens.iter().zip(activations.iter()).enumerate() {
            let (n_tokens, layers, neurons) = acts
                .dims3()
                .with_context(|| format!("Sample {sample} activations are not rank-3"))?;
            ensure!(
                !toks.is_empty(),
                "Sample {sample} has an empty token list"
            );
            ensure!(
                toks.len() == n_tokens,
                "Sample {sample}: {} tokens but activation token dim is {n_tokens}",
                toks.len()
            );
            ensure!(
                layers == n_layers && neurons == n_neurons,
                "Sample {sample}: dims ({layers}, {neurons}) disagree with ({n_layers}, {n_neurons})"
            );
        }

        Ok(Self {
            tokens,
            activations,
            n_layers,
            n_neurons,
        })
    }

    /// Build a store from nested vectors, the shape of the public contract:
    /// `tokens[sample][token]`, `activations[sample][token][layer][neuron]`.
    pub fn from_nested(
        tokens: Vec<Vec<String>>,
        activations: Vec<Vec<Vec<Vec<f32>>>>,
    ) -> Result<Self> {
        let mut tensors = Vec::with_capacity(activations.len());
        for (sample, acts) in activations.into_iter().enumerate() {
            tensors.push(
                nested_to_tensor(acts)
                    .with_context(|| format!("Sample {sample} activations are ragged"))?,
            );
        }
        Self::from_tensors(tokens, tensors)
    }

    /// Load a store from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Reading {}", path.as_ref().display()))?;
        let file: StoreFile = serde_json::from_str(&content)?;
        let store = Self::from_nested(file.tokens, file.activations)?;
        info!(
            "Loaded {} samples ({} layers, {} neurons)",
            store.n_samples(),
            store.n_layers,
            store.n_neurons
        );
        Ok(store)
    }

    /// Save the store as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut activations = Vec::with_capacity(self.activations.len());
        for acts in &self.activations {
            activations.push(tensor_to_nested(acts)?);
        }
        let file = StoreFile {
            tokens: self.tokens.clone(),
            activations,
        };
        std::fs::write(path.as_ref(), serde_json::to_string(&file)?)
            .with_context(|| format!("Writing {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Generate a store with seeded random activations and placeholder
    /// tokens, for demos and smoke tests.
    pub fn demo(
        n_samples: usize,
        n_tokens: usize,
        n_layers: usize,
        n_neurons: usize,
        seed: u64,
    ) -> Result<Self> {
        const WORDS: &[&str] = &[
            "the", " quick", " brown", " fox", " jumps", " over", " lazy", " dog", ",", ".",
            " a", " neural", " net", " token", " layer",
        ];
        let mut rng = StdRng::seed_from_u64(seed);

        let mut tokens = Vec::with_capacity(n_samples);
        let mut activations = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            let toks: Vec<String> = (0..n_tokens)
                .map(|_| WORDS[rng.gen_range(0..WORDS.len())].to_string())
                .collect();
            let values: Vec<f32> = (0..n_tokens * n_layers * n_neurons)
                .map(|_| rng.gen_range(-1.0f32..1.0))
                .collect();
            tokens.push(toks);
            activations.push(Tensor::from_vec(
                values,
                (n_tokens, n_layers, n_neurons),
                &Device::Cpu,
            )?);
        }
        Self::from_tensors(tokens, activations)
    }

    /// Number of samples
    pub fn n_samples(&self) -> usize {
        self.activations.len()
    }

    /// Number of layers (shared across samples)
    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    /// Number of neurons per layer (shared across samples)
    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }

    /// Token count for a sample
    pub fn token_count(&self, sample: usize) -> Option<usize> {
        self.tokens.get(sample).map(Vec::len)
    }

    /// Token strings for a sample
    pub fn tokens(&self, sample: usize) -> Option<&[String]> {
        self.tokens.get(sample).map(Vec::as_slice)
    }

    /// Activation tensor for a sample, shape (tokens, layers, neurons)
    pub fn activations(&self, sample: usize) -> Option<&Tensor> {
        self.activations.get(sample)
    }
}

/// Flatten [token][layer][neuron] nesting into a rank-3 tensor
fn nested_to_tensor(acts: Vec<Vec<Vec<f32>>>) -> Result<Tensor> {
    let n_tokens = acts.len();
    ensure!(n_tokens > 0, "Empty activation array");
    let n_layers = acts[0].len();
    ensure!(n_layers > 0, "Zero layers");
    let n_neurons = acts[0].first().map_or(0, Vec::len);
    ensure!(n_neurons > 0, "Zero neurons");

    let mut flat = Vec::with_capacity(n_tokens * n_layers * n_neurons);
    for per_token in &acts {
        ensure!(per_token.len() == n_layers, "Ragged layer dimension");
        for per_layer in per_token {
            ensure!(per_layer.len() == n_neurons, "Ragged neuron dimension");
            flat.extend_from_slice(per_layer);
        }
    }
    Ok(Tensor::from_vec(
        flat,
        (n_tokens, n_layers, n_neurons),
        &Device::Cpu,
    )?)
}

/// Expand a rank-3 tensor back into [token][layer][neuron] nesting
fn tensor_to_nested(acts: &Tensor) -> Result<Vec<Vec<Vec<f32>>>> {
    let (n_tokens, n_layers, n_neurons) = acts.dims3()?;
    let flat: Vec<f32> = acts.flatten_all()?.to_vec1()?;
    let mut out = Vec::with_capacity(n_tokens);
    for t in 0..n_tokens {
        let mut per_token = Vec::with_capacity(n_layers);
        for l in 0..n_layers {
            let start = (t * n_layers + l) * n_neurons;
            per_token.push(flat[start..start + n_neurons].to_vec());
        }
        out.push(per_token);
    }
    Ok(out)
}
