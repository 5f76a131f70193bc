use rand::Rng;

use crate::error::Result;
use crate::loss::cross_entropy::cross_entropy_cost;
use crate::math::matrix::Matrix;
use crate::network::backward::backward_network;
use crate::network::forward::forward_network;
use crate::network::parameters::Parameters;
use crate::optim::sgd::Sgd;

/// One mini-batch step: training-mode forward, backward, update.
///
/// Returns the cost of the batch as seen by the forward pass, i.e. before the
/// update is applied.
pub fn train_step<R: Rng>(
    params: &mut Parameters,
    x: &Matrix,
    y: &Matrix,
    use_batchnorm: bool,
    keep_prob: f64,
    optimizer: &Sgd,
    rng: &mut R,
) -> Result<f64> {
    let (probs, caches) = forward_network(x, params, use_batchnorm, keep_prob, rng)?;
    let cost = cross_entropy_cost(&probs, y)?;
    let grads = backward_network(&probs, y, caches, keep_prob)?;
    optimizer.step(params, &grads)?;
    Ok(cost)
}
