//! A fully-connected classifier trained with hand-derived forward and
//! backward propagation.
//!
//! Activations are `[features × examples]` matrices: one example per column.
//! Hidden layers use ReLU (with optional inverted dropout and fixed batch
//! normalization), the output layer uses softmax paired with cross-entropy.

pub mod math;
pub mod activation;
pub mod error;
pub mod layers;
pub mod network;
pub mod loss;
pub mod metrics;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use error::{Error, Result};
pub use layers::cache::LayerCache;
pub use layers::dense::{Layer, LayerGradients};
pub use network::{backward_network, forward_network, predict, Gradients, LayerDims, Parameters};
pub use loss::cross_entropy::cross_entropy_cost;
pub use metrics::accuracy::accuracy;
pub use optim::sgd::Sgd;
pub use train::{train_loop, TrainConfig, TrainOutcome, TrainingHistory};
