//! Integration tests for neurolens

use neurolens::{ActivationStore, AxisLabels, Selection, TopkTokens};
use std::io::Write;
use tempfile::NamedTempFile;

/// Test store loading from JSON
#[test]
fn test_store_loading() {
    // 1 sample, 2 tokens, 1 layer, 2 neurons
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{
        "tokens": [["hello", " world"]],
        "activations": [[
            [[1.0, -2.0]],
            [[0.5, 3.0]]
        ]]
    }}"#
    )
    .unwrap();

    let store = ActivationStore::load(file.path()).unwrap();
    assert_eq!(store.n_samples(), 1);
    assert_eq!(store.n_layers(), 1);
    assert_eq!(store.n_neurons(), 2);
    assert_eq!(store.token_count(0), Some(2));
}

/// Mismatched token list and activation tensor must fail to load
#[test]
fn test_store_loading_rejects_mismatch() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{
        "tokens": [["only-one"]],
        "activations": [[
            [[1.0, -2.0]],
            [[0.5, 3.0]]
        ]]
    }}"#
    )
    .unwrap();

    assert!(ActivationStore::load(file.path()).is_err());
}

/// Save then load reproduces tokens and dimensions
#[test]
fn test_store_round_trip() {
    let store = ActivationStore::demo(3, 16, 4, 8, 99).unwrap();
    let file = NamedTempFile::new().unwrap();
    store.save(file.path()).unwrap();

    let loaded = ActivationStore::load(file.path()).unwrap();
    assert_eq!(loaded.n_samples(), 3);
    assert_eq!(loaded.n_layers(), 4);
    assert_eq!(loaded.n_neurons(), 8);
    assert_eq!(loaded.tokens(2), store.tokens(2));
}

/// Slice shape property: [range_len, token_count] for every valid selection
#[test]
fn test_slice_shapes_for_all_selections() {
    let store = ActivationStore::demo(2, 12, 3, 6, 7).unwrap();
    for sample in 0..store.n_samples() {
        let acts = store.activations(sample).unwrap();
        for layer in 0..store.n_layers() {
            for lo in 0..store.n_neurons() {
                for hi in lo..store.n_neurons() {
                    let slice = neurolens::layer_slice(acts, layer, lo, hi).unwrap();
                    assert_eq!(slice.dims(), &[hi - lo + 1, 12]);
                }
            }
        }
    }
}

/// Ordering properties on random data: top rows non-increasing, bottom rows
/// non-increasing as displayed, tokens resolve to the sample's token list
#[test]
fn test_table_ordering_properties() {
    let store = ActivationStore::demo(2, 24, 3, 10, 2024).unwrap();
    let mut viewer = TopkTokens::new(store);
    viewer.set_sample(1).unwrap();
    viewer.set_layer(2).unwrap();
    viewer.set_neuron_range(3, 8).unwrap();
    viewer.set_k(6);

    let table = viewer.table().unwrap();
    assert_eq!(table.k(), 6);
    assert_eq!(table.n_columns(), 6);

    let tokens = viewer.store().tokens(1).unwrap().to_vec();
    for col in 0..table.n_columns() {
        for rank in 1..table.k() {
            assert!(table.top_values[rank - 1][col] >= table.top_values[rank][col]);
            assert!(table.bottom_values[rank - 1][col] >= table.bottom_values[rank][col]);
        }
        // Every displayed token is a real token of the sample
        for rank in 0..table.k() {
            assert!(tokens.contains(&table.top_tokens[rank][col]));
            assert!(tokens.contains(&table.bottom_tokens[rank][col]));
        }
    }

    // The worst bottom value can never exceed the best top value
    for col in 0..table.n_columns() {
        assert!(table.top_values[0][col] >= table.bottom_values[table.k() - 1][col]);
    }
}

/// Token resolution property on hand-built data: token at rank r for neuron
/// n is tokens[sample][top_index[r][n]]
#[test]
fn test_token_resolution_matches_indices() {
    // 4 tokens, 1 layer, 2 neurons. Neuron 0 peaks at token 2, neuron 1 at
    // token 0.
    let activations = vec![vec![
        vec![vec![0.1, 9.0]],
        vec![vec![4.0, 1.0]],
        vec![vec![7.0, -5.0]],
        vec![vec![-2.0, 3.0]],
    ]];
    let tokens = vec![vec![
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "d".to_string(),
    ]];
    let store = ActivationStore::from_nested(tokens, activations).unwrap();

    let mut viewer = TopkTokens::new(store);
    viewer.set_k(2);
    let table = viewer.table().unwrap();

    // Neuron 0 over tokens: [0.1, 4.0, 7.0, -2.0]
    assert_eq!(table.top_tokens[0][0], "c");
    assert_eq!(table.top_tokens[1][0], "b");
    assert_eq!(table.bottom_tokens[0][0], "a");
    assert_eq!(table.bottom_tokens[1][0], "d");

    // Neuron 1 over tokens: [9.0, 1.0, -5.0, 3.0]
    assert_eq!(table.top_tokens[0][1], "a");
    assert_eq!(table.top_tokens[1][1], "d");
    assert_eq!(table.bottom_tokens[0][1], "b");
    assert_eq!(table.bottom_tokens[1][1], "c");
}

/// Column-count derivation: changing it resets the range to the first
/// column_count neurons
#[test]
fn test_column_count_derivation() {
    let store = ActivationStore::demo(1, 10, 2, 12, 5).unwrap();
    let mut viewer = TopkTokens::new(store);
    viewer.set_neuron_range(6, 11).unwrap();
    viewer.set_column_count(5).unwrap();

    let selection = viewer.selection();
    assert_eq!(selection.neuron_lo, 0);
    assert_eq!(selection.neuron_hi, 4);
    assert_eq!(selection.column_count, 5);
}

/// The widget clamps k to the selector range; the clamped value stays valid
/// for a long enough sample
#[test]
fn test_widget_k_clamp() {
    let store = ActivationStore::demo(1, 30, 2, 4, 5).unwrap();
    let mut viewer = TopkTokens::new(store);
    viewer.set_k(200);
    assert_eq!(viewer.selection().k, neurolens::MAX_K);
    assert!(viewer.table().is_ok());
}

/// End-to-end HTML rendering from a loaded file
#[test]
fn test_html_from_file() {
    let store = ActivationStore::demo(1, 12, 2, 6, 11).unwrap();
    let file = NamedTempFile::new().unwrap();
    store.save(file.path()).unwrap();

    let loaded = ActivationStore::load(file.path()).unwrap();
    let mut viewer = TopkTokens::new(loaded).with_labels(AxisLabels {
        neuron: Some("Unit".to_string()),
        ..AxisLabels::default()
    });
    viewer.set_k(4);

    let table = viewer.table().unwrap();
    let page = neurolens::render_page(&viewer, &table);
    assert!(page.contains("Unit 0"));
    assert!(page.contains("<h3>Bottom tokens</h3>"));
}

/// Selection defaults
#[test]
fn test_selection_defaults() {
    let selection = Selection::default();
    assert_eq!(selection.sample, 0);
    assert_eq!(selection.layer, 0);
    assert_eq!(selection.k, 5);
    assert_eq!(selection.range_len(), selection.column_count);
}
