//! neurolens CLI: inspect top-k activating tokens from the terminal

use anyhow::Result;
use clap::Parser;
use neurolens::{html, ActivationStore, AxisLabels, TopkTokens};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "neurolens")]
#[command(about = "Top-k activating-token inspection for neuron activations")]
#[command(version)]
struct Cli {
    /// Activation store JSON file; omit to generate random demo data
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sample index
    #[arg(short, long, default_value_t = 0)]
    sample: usize,

    /// Layer index
    #[arg(short, long, default_value_t = 0)]
    layer: usize,

    /// First neuron of the displayed range (inclusive)
    #[arg(long, default_value_t = 0)]
    neuron_start: usize,

    /// Number of neuron columns
    #[arg(short, long, default_value_t = 10)]
    columns: usize,

    /// Tokens per neuron in each of the top and bottom tables (1-20)
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Write the rendered HTML page here
    #[arg(long)]
    html: Option<PathBuf>,

    /// Demo data shape: samples,tokens,layers,neurons
    #[arg(long, default_value = "4,64,6,32", value_delimiter = ',')]
    demo_shape: Vec<usize>,

    /// Seed for demo data
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = match &cli.input {
        Some(path) => {
            info!("Loading activations from {}", path.display());
            ActivationStore::load(path)?
        }
        None => {
            anyhow::ensure!(
                cli.demo_shape.len() == 4,
                "--demo-shape needs samples,tokens,layers,neurons"
            );
            info!("No input file, generating demo data (seed {})", cli.seed);
            ActivationStore::demo(
                cli.demo_shape[0],
                cli.demo_shape[1],
                cli.demo_shape[2],
                cli.demo_shape[3],
                cli.seed,
            )?
        }
    };

    println!("=== neurolens ===");
    println!(
        "Store:  {} samples, {} layers, {} neurons",
        store.n_samples(),
        store.n_layers(),
        store.n_neurons()
    );

    let mut viewer = TopkTokens::new(store).with_labels(AxisLabels::default());
    viewer.set_sample(cli.sample)?;
    viewer.set_layer(cli.layer)?;
    viewer.set_column_count(cli.columns.min(viewer.store().n_neurons()))?;
    if cli.neuron_start > 0 {
        let hi = cli.neuron_start + viewer.selection().column_count - 1;
        viewer.set_neuron_range(cli.neuron_start, hi)?;
    }
    viewer.set_k(cli.k);

    let selection = viewer.selection();
    println!(
        "View:   sample {}, layer {}, neurons {}-{}, k={}",
        selection.sample,
        selection.layer,
        selection.neuron_lo,
        selection.neuron_hi,
        selection.k
    );
    println!();

    let table = viewer.table()?;
    table.print();

    if let Some(path) = &cli.html {
        std::fs::write(path, html::render_page(&viewer, &table))?;
        info!("HTML written to {}", path.display());
    }

    Ok(())
}
