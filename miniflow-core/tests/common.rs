use miniflow_core::init::{randn, zeros};
use miniflow_core::{Bindings, Graph, Matrix, NodeId};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Shared helpers for the integration tests. Each test crate uses a subset.

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The two-layer network of the training script: Linear -> Sigmoid -> Linear -> MSE.
#[allow(dead_code)]
pub struct TwoLayer {
    pub graph: Graph<f64>,
    pub order: Vec<NodeId>,
    pub x: NodeId,
    pub y: NodeId,
    pub trainables: Vec<NodeId>,
    pub prediction: NodeId,
    pub cost: NodeId,
}

/// Synthetic regression data: `y = sin(x0) + 0.5·x1 - 0.25·x2` plus nothing random.
#[allow(dead_code)]
pub fn synthetic_data(rows: usize, seed: u64) -> (Matrix<f64>, Matrix<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let x: Matrix<f64> = randn(rows, 3, &mut rng);
    let y: Vec<f64> = x
        .data()
        .chunks(3)
        .map(|r| r[0].sin() + 0.5 * r[1] - 0.25 * r[2])
        .collect();
    (x, Matrix::row(y))
}

#[allow(dead_code)]
pub fn two_layer(x_value: Matrix<f64>, y_value: Matrix<f64>, hidden: usize, seed: u64) -> TwoLayer {
    let n_features = x_value.cols();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut graph = Graph::new();
    let (x, y) = (graph.input(), graph.input());
    let (w1, b1) = (graph.input(), graph.input());
    let (w2, b2) = (graph.input(), graph.input());
    let l1 = graph.linear(x, w1, b1).expect("linear 1");
    let s1 = graph.sigmoid(l1).expect("sigmoid");
    let l2 = graph.linear(s1, w2, b2).expect("linear 2");
    let cost = graph.mse(y, l2).expect("mse");

    let mut bindings = Bindings::new();
    bindings.insert(x, x_value);
    bindings.insert(y, y_value);
    bindings.insert(w1, randn(n_features, hidden, &mut rng));
    bindings.insert(b1, zeros(1, hidden));
    bindings.insert(w2, randn(hidden, 1, &mut rng));
    bindings.insert(b2, zeros(1, 1));
    let order = graph.topological_sort(bindings).expect("sort");

    TwoLayer {
        graph,
        order,
        x,
        y,
        trainables: vec![w1, b1, w2, b2],
        prediction: l2,
        cost,
    }
}
