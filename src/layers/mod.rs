pub mod batchnorm;
pub mod cache;
pub mod dense;
pub mod dropout;

pub use batchnorm::apply_batchnorm;
pub use cache::LayerCache;
pub use dense::{linear_backward, linear_forward, Layer, LayerGradients};
