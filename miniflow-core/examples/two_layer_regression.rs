//! # Training a two-layer regression network
//!
//! Builds `Linear -> Sigmoid -> Linear -> MSE`, then trains it with mini-batch SGD on a
//! synthetic housing-style dataset (506 rows, 13 features):
//!
//! 1. standardise the features;
//! 2. bind data and randomly initialised parameters, sort the graph once;
//! 3. per step: resample a batch, rebind `X`/`y`, `forward_and_backward`, `sgd_update`;
//! 4. every 10 epochs, report mean loss and the "within 0.5" accuracy.
//!
//! ## Execution
//! `RUST_LOG=info cargo run --example two_layer_regression`

use log::info;
use miniflow_core::init::{randn, zeros};
use miniflow_core::{sgd_update, Bindings, Graph, Matrix, MiniflowError};
use miniflow_data::{
    accuracy_within, standardize, steps_per_epoch, Dataset, RegressionDataset, Resampler,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const N_SAMPLES: usize = 506;
const N_FEATURES: usize = 13;
const N_HIDDEN: usize = 10;
const EPOCHS: usize = 100;
const LEARNING_RATE: f64 = 0.01;
const BATCH_SIZE: usize = 10;

/// Features on wildly different scales and a noisy non-linear target.
fn synthetic_dataset(rng: &mut StdRng) -> Result<(Matrix<f64>, Matrix<f64>), MiniflowError> {
    let mut features = Vec::with_capacity(N_SAMPLES * N_FEATURES);
    let mut targets = Vec::with_capacity(N_SAMPLES);
    for _ in 0..N_SAMPLES {
        let row: Vec<f64> = (0..N_FEATURES)
            .map(|j| rng.gen_range(0.0..1.0) * (j as f64 + 1.0) * 10.0)
            .collect();
        let signal = 22.0 + 4.0 * (row[0] / 10.0).sin() - 0.3 * row[5] + 0.05 * row[12];
        targets.push(signal + rng.gen_range(-1.0..1.0));
        features.extend(row);
    }
    Ok((Matrix::new(features, N_SAMPLES, N_FEATURES)?, Matrix::column(targets)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(2017);

    let (x_raw, y_all) = synthetic_dataset(&mut rng)?;
    info!("The number of (Datasets, Features) = {:?}", x_raw.shape());
    let dataset = RegressionDataset::new(standardize(&x_raw), y_all)?;

    // Neural network
    let mut graph = Graph::<f64>::new();
    let (x, y) = (graph.input(), graph.input());
    let (w1, b1) = (graph.input(), graph.input());
    let (w2, b2) = (graph.input(), graph.input());
    let l1 = graph.linear(x, w1, b1)?;
    let s1 = graph.sigmoid(l1)?;
    let l2 = graph.linear(s1, w2, b2)?;
    let cost = graph.mse(y, l2)?;

    let mut bindings = Bindings::new();
    bindings.insert(x, dataset.features().clone());
    bindings.insert(y, dataset.targets().clone());
    bindings.insert(w1, randn(N_FEATURES, N_HIDDEN, &mut rng));
    bindings.insert(b1, zeros(1, N_HIDDEN));
    bindings.insert(w2, randn(N_HIDDEN, 1, &mut rng));
    bindings.insert(b2, zeros(1, 1));

    let order = graph.topological_sort(bindings)?;
    let trainables = [w1, b1, w2, b2];
    let steps = steps_per_epoch(dataset.len(), BATCH_SIZE);
    let mut resampler = Resampler::new(rng.gen());

    info!("Total number of examples = {}", dataset.len());
    for epoch in 0..EPOCHS {
        let mut loss = 0.0;
        let mut accuracy = 0.0;
        for _ in 0..steps {
            let (x_batch, y_batch) = resampler.sample(&dataset, BATCH_SIZE)?;
            graph.set_value(x, x_batch)?;
            graph.set_value(y, y_batch)?;

            graph.forward_and_backward(&order)?;
            sgd_update(&mut graph, &trainables, LEARNING_RATE)?;

            loss += graph.value(cost)?.item()?;
            accuracy += accuracy_within(graph.value(y)?, graph.value(l2)?, 0.5)?;
        }
        if (epoch + 1) % 10 == 0 {
            info!(
                "Epoch: {}, Loss: {:.3}, Accuracy: {:.3}",
                epoch + 1,
                loss / steps as f64,
                accuracy / steps as f64
            );
        }
    }
    Ok(())
}
