use crate::error::{Error, Result};
use crate::network::parameters::{Gradients, Parameters};

/// Plain gradient descent: no momentum, no adaptive scaling.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// `W -= lr·dW` and `b -= lr·db` for every layer, in place.
    pub fn step(&self, params: &mut Parameters, grads: &Gradients) -> Result<()> {
        if grads.len() != params.num_layers() {
            return Err(Error::ShapeMismatch(format!(
                "{} gradient records for {} layers",
                grads.len(),
                params.num_layers()
            )));
        }
        for (layer, layer_grads) in params.layers.iter().zip(grads.iter()) {
            if layer.weights.shape() != layer_grads.d_weights.shape()
                || layer.biases.shape() != layer_grads.d_biases.shape()
            {
                return Err(Error::ShapeMismatch(
                    "gradient shapes do not match parameter shapes".to_owned(),
                ));
            }
        }

        for (layer, layer_grads) in params.layers.iter_mut().zip(grads.iter()) {
            layer.apply_gradients(layer_grads, self.learning_rate);
        }
        Ok(())
    }
}
