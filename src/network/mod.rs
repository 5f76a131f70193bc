pub mod backward;
pub mod forward;
pub mod parameters;
pub mod dims;

pub use backward::{backward_layer, backward_network};
pub use forward::{forward_eval, forward_layer, forward_network, predict};
pub use parameters::{Gradients, Parameters};
pub use dims::LayerDims;
