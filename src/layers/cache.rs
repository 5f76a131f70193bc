use crate::math::matrix::Matrix;

/// Values one layer's forward step keeps for the matching backward step.
///
/// A fresh list of caches is produced by every forward pass and consumed by
/// exactly one backward pass.
#[derive(Debug, Clone)]
pub enum LayerCache {
    /// Hidden layer. `mask` is the dropout keep-mask drawn for this layer's
    /// output, if dropout was active.
    Relu {
        prev_activation: Matrix,
        weights: Matrix,
        biases: Matrix,
        pre_activation: Matrix,
        mask: Option<Matrix>,
    },
    /// Output layer. The true labels join this cache at backward time.
    Softmax {
        prev_activation: Matrix,
        weights: Matrix,
        biases: Matrix,
        pre_activation: Matrix,
    },
}

impl LayerCache {
    pub fn prev_activation(&self) -> &Matrix {
        match self {
            LayerCache::Relu { prev_activation, .. }
            | LayerCache::Softmax { prev_activation, .. } => prev_activation,
        }
    }

    pub fn weights(&self) -> &Matrix {
        match self {
            LayerCache::Relu { weights, .. } | LayerCache::Softmax { weights, .. } => weights,
        }
    }

    pub fn pre_activation(&self) -> &Matrix {
        match self {
            LayerCache::Relu { pre_activation, .. }
            | LayerCache::Softmax { pre_activation, .. } => pre_activation,
        }
    }

    pub fn mask(&self) -> Option<&Matrix> {
        match self {
            LayerCache::Relu { mask, .. } => mask.as_ref(),
            LayerCache::Softmax { .. } => None,
        }
    }
}
