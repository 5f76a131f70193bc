pub mod activation;

pub use activation::{relu, relu_backward, softmax, softmax_backward, ActivationFunction};
