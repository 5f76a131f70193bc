use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Widths of every layer, input first: `[input, hidden..., classes]`.
///
/// A network with `L` weight layers has `L + 1` entries. Every entry must be
/// positive and there must be at least an input and an output width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerDims(Vec<usize>);

impl LayerDims {
    pub fn new(dims: Vec<usize>) -> Result<LayerDims> {
        if dims.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "layer_dims needs at least an input and an output width, got {dims:?}"
            )));
        }
        if let Some(pos) = dims.iter().position(|&d| d == 0) {
            return Err(Error::InvalidConfig(format!(
                "layer_dims[{pos}] is 0; every layer width must be positive"
            )));
        }
        Ok(LayerDims(dims))
    }

    /// Number of weight layers (`L`).
    pub fn num_layers(&self) -> usize {
        self.0.len() - 1
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }

    pub fn output_size(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl TryFrom<Vec<usize>> for LayerDims {
    type Error = Error;

    fn try_from(dims: Vec<usize>) -> Result<LayerDims> {
        LayerDims::new(dims)
    }
}

impl From<LayerDims> for Vec<usize> {
    fn from(dims: LayerDims) -> Vec<usize> {
        dims.0
    }
}
