use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::dense::{Layer, LayerGradients};
use crate::network::dims::LayerDims;

/// Per-layer weights and biases of the whole network.
///
/// Layers are numbered `1..=L` as in the usual notation; `layer(l)` maps that
/// onto the underlying vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub layers: Vec<Layer>,
}

/// Gradients for every layer, in layer order (`grads[l - 1]` is layer `l`).
pub type Gradients = Vec<LayerGradients>;

impl Parameters {
    /// He-style weights and zero biases for every layer of `dims`.
    pub fn initialize<R: Rng>(dims: &LayerDims, rng: &mut R) -> Parameters {
        let layers = dims.as_slice()
            .windows(2)
            .map(|w| Layer::new(w[1], w[0], rng))
            .collect();
        Parameters { layers }
    }

    /// Number of weight layers (`L`).
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Layer `l`, 1-based.
    pub fn layer(&self, l: usize) -> &Layer {
        &self.layers[l - 1]
    }

    pub fn layer_mut(&mut self, l: usize) -> &mut Layer {
        &mut self.layers[l - 1]
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.size)
    }

    /// Reconstructs the layer widths the parameters were built for.
    pub fn layer_dims(&self) -> Result<LayerDims> {
        let mut dims = vec![self.input_size()];
        dims.extend(self.layers.iter().map(|layer| layer.size));
        LayerDims::new(dims)
    }

    /// Checks `Weight[l]` is `[dims[l] × dims[l-1]]` and `Bias[l]` is
    /// `[dims[l] × 1]` for every layer.
    pub fn check_shapes(&self, dims: &LayerDims) -> Result<()> {
        if self.num_layers() != dims.num_layers() {
            return Err(Error::ShapeMismatch(format!(
                "{} parameter layers for {} layer dims",
                self.num_layers(),
                dims.num_layers()
            )));
        }
        let d = dims.as_slice();
        for l in 1..=self.num_layers() {
            let layer = self.layer(l);
            if layer.weights.shape() != (d[l], d[l - 1]) {
                return Err(Error::ShapeMismatch(format!(
                    "weights of layer {l} are {:?}, expected {:?}",
                    layer.weights.shape(),
                    (d[l], d[l - 1])
                )));
            }
            if layer.biases.shape() != (d[l], 1) {
                return Err(Error::ShapeMismatch(format!(
                    "biases of layer {l} are {:?}, expected {:?}",
                    layer.biases.shape(),
                    (d[l], 1)
                )));
            }
        }
        Ok(())
    }
}
