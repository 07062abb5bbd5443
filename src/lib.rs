// Pedantic clippy configuration for numerical display code:
#![allow(clippy::cast_precision_loss)] // usize→f32 intentional in color scaling
#![allow(clippy::cast_possible_truncation)] // u32→usize in token indexing
#![allow(clippy::module_name_repetitions)] // ActivationStore in store.rs is fine
#![allow(clippy::missing_errors_doc)] // # Errors section for every Result fn
#![allow(clippy::must_use_candidate)] // #[must_use] on every pure fn is excessive

//! neurolens: top-k activating-token inspection
//!
//! Inspects neural-network neuron activations across tokens, samples,
//! layers, and neuron ranges. For a selection the viewer computes the k
//! highest- and k lowest-activating tokens per neuron and exposes
//! display-ready token/value matrices, colored by activation magnitude.
//!
//! ## Architecture
//!
//! - `store`: token lists and rank-3 activation tensors per sample
//! - `selection`: viewer selection state and its derivation rules
//! - `topk`: top-k / bottom-k extraction along the trailing tensor axis
//! - `view`: layer slicing and the derived `TokenTable`
//! - `color`: activation-magnitude cell coloring
//! - `widget`: the `TopkTokens` component tying store and selection together
//! - `html`: static-HTML rendering layer

pub mod color;
pub mod html;
pub mod selection;
pub mod store;
pub mod topk;
pub mod view;
pub mod widget;

pub use color::cell_color;
pub use html::render_page;
pub use selection::{Selection, MAX_K};
pub use store::ActivationStore;
pub use topk::{bottomk_last_dim, reverse_last_dim, topk_last_dim};
pub use view::{format_token, layer_slice, TokenTable};
pub use widget::{AxisLabels, TopkTokens};
