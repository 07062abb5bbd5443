//! Top-level viewer component
//!
//! `TopkTokens` owns the activation store, display labels, and the current
//! selection. Setters mirror the UI selectors; `table()` recomputes the
//! derived token table synchronously from the current selection, matching a
//! reactive re-render on every state change.

use anyhow::{ensure, Result};
use tracing::debug;

use crate::selection::Selection;
use crate::store::ActivationStore;
use crate::view::TokenTable;

/// Optional display labels for the three selectable dimensions
#[derive(Debug, Clone, Default)]
pub struct AxisLabels {
    pub sample: Option<String>,
    pub layer: Option<String>,
    pub neuron: Option<String>,
}

impl AxisLabels {
    pub fn sample(&self) -> &str {
        self.sample.as_deref().unwrap_or("Sample")
    }

    pub fn layer(&self) -> &str {
        self.layer.as_deref().unwrap_or("Layer")
    }

    pub fn neuron(&self) -> &str {
        self.neuron.as_deref().unwrap_or("Neuron")
    }
}

/// The top-k activating-tokens viewer
pub struct TopkTokens {
    store: ActivationStore,
    labels: AxisLabels,
    selection: Selection,
}

impl TopkTokens {
    /// Create a viewer over a store, with the default selection narrowed to
    /// the store's actual dimensions.
    pub fn new(store: ActivationStore) -> Self {
        let mut selection = Selection::default();
        selection.set_column_count(selection.column_count.min(store.n_neurons()));
        Self {
            store,
            labels: AxisLabels::default(),
            selection,
        }
    }

    /// Attach display labels for the selectable dimensions
    pub fn with_labels(mut self, labels: AxisLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn store(&self) -> &ActivationStore {
        &self.store
    }

    /// Select a sample. The rest of the selection is kept as-is.
    pub fn set_sample(&mut self, sample: usize) -> Result<()> {
        ensure!(
            sample < self.store.n_samples(),
            "Sample {sample} out of range ({} samples)",
            self.store.n_samples()
        );
        self.selection.sample = sample;
        Ok(())
    }

    /// Select a layer
    pub fn set_layer(&mut self, layer: usize) -> Result<()> {
        ensure!(
            layer < self.store.n_layers(),
            "Layer {layer} out of range ({} layers)",
            self.store.n_layers()
        );
        self.selection.layer = layer;
        Ok(())
    }

    /// Select a contiguous inclusive neuron range. The column count follows
    /// the range length so the page width stays consistent.
    pub fn set_neuron_range(&mut self, lo: usize, hi: usize) -> Result<()> {
        ensure!(lo <= hi, "Empty neuron range {lo}..={hi}");
        ensure!(
            hi < self.store.n_neurons(),
            "Neuron {hi} out of range ({} neurons)",
            self.store.n_neurons()
        );
        self.selection.neuron_lo = lo;
        self.selection.neuron_hi = hi;
        self.selection.column_count = hi - lo + 1;
        Ok(())
    }

    /// Change the column count; the neuron range resets to the first
    /// `column_count` neurons.
    pub fn set_column_count(&mut self, column_count: usize) -> Result<()> {
        ensure!(column_count >= 1, "Column count must be at least 1");
        ensure!(
            column_count <= self.store.n_neurons(),
            "Column count {column_count} exceeds {} neurons",
            self.store.n_neurons()
        );
        self.selection.set_column_count(column_count);
        Ok(())
    }

    /// Set k, clamped to the selector range (1..=20)
    pub fn set_k(&mut self, k: usize) {
        self.selection.k = Selection::clamp_k(k);
    }

    /// Compute the token table for the current selection.
    ///
    /// A k larger than the selected sample's token count surfaces the
    /// tensor engine's own error.
    pub fn table(&self) -> Result<TokenTable> {
        debug!(selection = ?self.selection, "Recomputing token table");
        let sample = self.selection.sample;
        // In range by the setter invariants
        let activations = self
            .store
            .activations(sample)
            .ok_or_else(|| anyhow::anyhow!("Sample {sample} not in store"))?;
        let tokens = self
            .store
            .tokens(sample)
            .ok_or_else(|| anyhow::anyhow!("Sample {sample} not in store"))?;
        TokenTable::build(activations, tokens, &self.selection)
    }
}
