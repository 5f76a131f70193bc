use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::batchnorm::apply_batchnorm;
use crate::layers::cache::LayerCache;
use crate::layers::dense::linear_forward;
use crate::layers::dropout::{dropout_forward, is_active, keep_mask};
use crate::math::matrix::Matrix;
use crate::metrics::accuracy::accuracy;
use crate::network::parameters::Parameters;

/// One `LINEAR -> ACTIVATION` step.
///
/// Dropout only applies to ReLU layers; when `keep_prob < 1` a fresh mask is
/// drawn and stored in the returned cache.
pub fn forward_layer<R: Rng>(
    a_prev: &Matrix,
    weights: &Matrix,
    biases: &Matrix,
    kind: ActivationFunction,
    keep_prob: f64,
    rng: &mut R,
) -> (Matrix, LayerCache) {
    let z = linear_forward(a_prev, weights, biases);
    let a = kind.activate(&z);

    match kind {
        ActivationFunction::ReLU => {
            let (a, mask) = if is_active(keep_prob) {
                let mask = keep_mask(a.rows, a.cols, keep_prob, rng);
                (dropout_forward(&a, &mask, keep_prob), Some(mask))
            } else {
                (a, None)
            };
            let cache = LayerCache::Relu {
                prev_activation: a_prev.clone(),
                weights: weights.clone(),
                biases: biases.clone(),
                pre_activation: z,
                mask,
            };
            (a, cache)
        }
        ActivationFunction::Softmax => {
            let cache = LayerCache::Softmax {
                prev_activation: a_prev.clone(),
                weights: weights.clone(),
                biases: biases.clone(),
                pre_activation: z,
            };
            (a, cache)
        }
    }
}

/// Forward pass `[LINEAR -> RELU] x (L-1) -> LINEAR -> SOFTMAX`.
///
/// `x` is `[input_size × m]`. With `use_batchnorm` every hidden output is
/// normalized before it feeds the next layer; the output layer never gets
/// dropout or batchnorm. Returns the `[classes × m]` probabilities and one
/// cache per layer, in layer order.
pub fn forward_network<R: Rng>(
    x: &Matrix,
    params: &Parameters,
    use_batchnorm: bool,
    keep_prob: f64,
    rng: &mut R,
) -> Result<(Matrix, Vec<LayerCache>)> {
    if params.num_layers() == 0 {
        return Err(Error::ShapeMismatch("network has no layers".to_owned()));
    }
    params.check_shapes(&params.layer_dims()?)?;
    if x.rows != params.input_size() {
        return Err(Error::ShapeMismatch(format!(
            "input has {} features, first layer expects {}",
            x.rows,
            params.input_size()
        )));
    }
    if x.cols == 0 {
        return Err(Error::InvalidData("input batch has no examples".to_owned()));
    }

    let num_layers = params.num_layers();
    let mut caches = Vec::with_capacity(num_layers);
    let mut a = x.clone();

    for l in 1..num_layers {
        let layer = params.layer(l);
        let (next, cache) = forward_layer(
            &a,
            &layer.weights,
            &layer.biases,
            ActivationFunction::ReLU,
            keep_prob,
            rng,
        );
        a = if use_batchnorm { apply_batchnorm(&next) } else { next };
        caches.push(cache);
    }

    let output = params.layer(num_layers);
    let (probs, cache) = forward_layer(
        &a,
        &output.weights,
        &output.biases,
        ActivationFunction::Softmax,
        1.0,
        rng,
    );
    caches.push(cache);

    if !probs.is_finite() {
        warn!("forward pass produced non-finite probabilities");
    }

    Ok((probs, caches))
}

/// Evaluation-mode forward pass (dropout off).
pub fn forward_eval(x: &Matrix, params: &Parameters, use_batchnorm: bool) -> Result<Matrix> {
    // keep_prob 1 never draws, the seed only satisfies the signature
    let mut rng = StdRng::seed_from_u64(0);
    let (probs, _) = forward_network(x, params, use_batchnorm, 1.0, &mut rng)?;
    Ok(probs)
}

/// Percentage of examples in `x` whose predicted class matches the one-hot
/// label in `y`.
pub fn predict(x: &Matrix, y: &Matrix, params: &Parameters, use_batchnorm: bool) -> Result<f64> {
    let probs = forward_eval(x, params, use_batchnorm)?;
    accuracy(&probs, y)
}
