//! Selection state for the viewer: which slice of the activations to show

/// Upper bound on k exposed by the widget selectors. The extraction
/// pipeline itself accepts any k up to the token count.
pub const MAX_K: usize = 20;

/// Current viewer selection: one sample, one layer, a contiguous inclusive
/// neuron range, and how many top/bottom tokens to show per neuron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Sample index
    pub sample: usize,
    /// Layer index
    pub layer: usize,
    /// First neuron of the displayed range (inclusive)
    pub neuron_lo: usize,
    /// Last neuron of the displayed range (inclusive)
    pub neuron_hi: usize,
    /// Number of neuron columns per page
    pub column_count: usize,
    /// Tokens shown per neuron in each of the top and bottom tables
    pub k: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            sample: 0,
            layer: 0,
            neuron_lo: 0,
            neuron_hi: 9,
            column_count: 10,
            k: 5,
        }
    }
}

impl Selection {
    /// Number of neurons in the selected range
    pub fn range_len(&self) -> usize {
        self.neuron_hi - self.neuron_lo + 1
    }

    /// Change the column count. The neuron range is re-derived as the first
    /// `column_count` neurons, since the old range no longer lines up with
    /// the new page width.
    pub fn set_column_count(&mut self, column_count: usize) {
        self.column_count = column_count;
        self.neuron_lo = 0;
        self.neuron_hi = column_count.saturating_sub(1);
    }

    /// Clamp k to the range the selectors expose
    pub fn clamp_k(k: usize) -> usize {
        k.clamp(1, MAX_K)
    }
}
