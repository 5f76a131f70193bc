use crate::activation::activation::{relu_backward, softmax_backward};
use crate::error::{Error, Result};
use crate::layers::cache::LayerCache;
use crate::layers::dense::{linear_backward, LayerGradients};
use crate::layers::dropout::dropout_backward;
use crate::math::matrix::Matrix;
use crate::network::parameters::Gradients;

/// Backward step for one layer. Returns `(dA_prev, gradients)`.
///
/// For the softmax output layer `upstream` is the predicted probabilities and
/// `labels` the one-hot targets. For a ReLU layer `upstream` is the gradient
/// w.r.t. the layer's (post-dropout) output; the layer's own dropout mask is
/// applied to it first, then the ReLU derivative.
///
/// Batch normalization is not part of this chain: a normalized hidden output
/// receives the gradient of its normalized value unchanged.
pub fn backward_layer(
    upstream: &Matrix,
    cache: &LayerCache,
    labels: &Matrix,
    keep_prob: f64,
) -> (Matrix, LayerGradients) {
    let dz = match cache {
        LayerCache::Softmax { .. } => softmax_backward(upstream, labels),
        LayerCache::Relu { pre_activation, mask, .. } => {
            let da = match mask {
                Some(mask) => dropout_backward(upstream, mask, keep_prob),
                None => upstream.clone(),
            };
            relu_backward(&da, pre_activation)
        }
    };
    linear_backward(&dz, cache.prev_activation(), cache.weights())
}

/// Full backward pass, from the softmax output down to layer 1.
///
/// Consumes the caches of the forward pass that produced `probs`. The
/// returned gradients are in layer order.
pub fn backward_network(
    probs: &Matrix,
    labels: &Matrix,
    caches: Vec<LayerCache>,
    keep_prob: f64,
) -> Result<Gradients> {
    if probs.shape() != labels.shape() {
        return Err(Error::ShapeMismatch(format!(
            "predictions are {:?} but labels are {:?}",
            probs.shape(),
            labels.shape()
        )));
    }
    match caches.last() {
        Some(LayerCache::Softmax { .. }) => {}
        _ => {
            return Err(Error::ShapeMismatch(
                "cache list must end with the softmax output layer".to_owned(),
            ))
        }
    }

    let mut grads = Vec::with_capacity(caches.len());
    let mut upstream = probs.clone();

    for cache in caches.iter().rev() {
        let (da_prev, layer_grads) = backward_layer(&upstream, cache, labels, keep_prob);
        grads.push(layer_grads);
        upstream = da_prev;
    }

    grads.reverse();
    Ok(grads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::cross_entropy::cross_entropy_cost;
    use crate::network::forward::forward_network;
    use crate::network::parameters::Parameters;
    use crate::network::dims::LayerDims;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn one_hot(classes: usize, m: usize, rng: &mut StdRng) -> Matrix {
        let mut y = Matrix::zeros(classes, m);
        for j in 0..m {
            y.data[rng.gen_range(0..classes)][j] = 1.0;
        }
        y
    }

    fn cost_with_seed(
        x: &Matrix,
        y: &Matrix,
        params: &Parameters,
        use_batchnorm: bool,
        keep_prob: f64,
        seed: u64,
    ) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (probs, _) = forward_network(x, params, use_batchnorm, keep_prob, &mut rng).unwrap();
        cross_entropy_cost(&probs, y).unwrap()
    }

    /// Central-difference check of every weight and bias of layer `l`.
    fn gradient_check(keep_prob: f64, use_batchnorm: bool, layers: &[usize]) {
        let mut rng = StdRng::seed_from_u64(77);
        let dims = LayerDims::new(vec![5, 4, 4, 3]).unwrap();
        let params = Parameters::initialize(&dims, &mut rng);
        let x = Matrix::standard_normal(5, 6, 1.0, &mut rng);
        let y = one_hot(3, 6, &mut rng);

        // same seed on every pass => same dropout masks
        let seed = 1234;
        let mut fwd_rng = StdRng::seed_from_u64(seed);
        let (probs, caches) =
            forward_network(&x, &params, use_batchnorm, keep_prob, &mut fwd_rng).unwrap();
        let grads = backward_network(&probs, &y, caches, keep_prob).unwrap();

        let eps = 1e-6;
        for &l in layers {
            let shape = params.layer(l).weights.shape();
            for i in 0..shape.0 {
                for j in 0..shape.1 {
                    let mut plus = params.clone();
                    plus.layer_mut(l).weights.data[i][j] += eps;
                    let mut minus = params.clone();
                    minus.layer_mut(l).weights.data[i][j] -= eps;
                    let numeric = (cost_with_seed(&x, &y, &plus, use_batchnorm, keep_prob, seed)
                        - cost_with_seed(&x, &y, &minus, use_batchnorm, keep_prob, seed))
                        / (2.0 * eps);
                    let analytic = grads[l - 1].d_weights.data[i][j];
                    assert_relative_eq!(analytic, numeric, epsilon = 1e-6, max_relative = 1e-4);
                }
                let mut plus = params.clone();
                plus.layer_mut(l).biases.data[i][0] += eps;
                let mut minus = params.clone();
                minus.layer_mut(l).biases.data[i][0] -= eps;
                let numeric = (cost_with_seed(&x, &y, &plus, use_batchnorm, keep_prob, seed)
                    - cost_with_seed(&x, &y, &minus, use_batchnorm, keep_prob, seed))
                    / (2.0 * eps);
                let analytic = grads[l - 1].d_biases.data[i][0];
                assert_relative_eq!(analytic, numeric, epsilon = 1e-6, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn gradients_match_finite_differences() {
        gradient_check(1.0, false, &[1, 2, 3]);
    }

    #[test]
    fn gradients_match_finite_differences_with_dropout() {
        gradient_check(0.7, false, &[1, 2, 3]);
    }

    #[test]
    fn batchnorm_output_layer_gradient_still_matches() {
        // the output layer sees the normalized activations as its input, so
        // its own gradient is exact even with batchnorm on
        gradient_check(1.0, true, &[3]);
    }

    #[test]
    fn batchnorm_is_not_differentiated_through() {
        // Known deviation: hidden-layer gradients ignore the normalization
        // Jacobian, so they are the plain chain rule through relu + linear.
        let mut rng = StdRng::seed_from_u64(5);
        let dims = LayerDims::new(vec![4, 5, 3]).unwrap();
        let params = Parameters::initialize(&dims, &mut rng);
        let x = Matrix::standard_normal(4, 8, 1.0, &mut rng);
        let y = one_hot(3, 8, &mut rng);

        let (probs, caches) = forward_network(&x, &params, true, 1.0, &mut rng).unwrap();
        let z1 = caches[0].pre_activation().clone();
        let a1_normalized = caches[1].prev_activation().clone();
        let grads = backward_network(&probs, &y, caches, 1.0).unwrap();

        let m = 8.0;
        let dz2 = softmax_backward(&probs, &y);
        let da1 = params.layer(2).weights.transpose().dot(&dz2);
        let dz1 = relu_backward(&da1, &z1);
        let expected_dw1 = dz1.dot(&x.transpose()).scale(1.0 / m);
        let expected_dw2 = dz2.dot(&a1_normalized.transpose()).scale(1.0 / m);

        for (g, e) in grads[0].d_weights.data.iter().flatten().zip(expected_dw1.data.iter().flatten()) {
            assert_relative_eq!(*g, *e, epsilon = 1e-12);
        }
        for (g, e) in grads[1].d_weights.data.iter().flatten().zip(expected_dw2.data.iter().flatten()) {
            assert_relative_eq!(*g, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn keep_prob_one_backward_matches_no_dropout() {
        let mut rng = StdRng::seed_from_u64(8);
        let dims = LayerDims::new(vec![4, 6, 5, 3]).unwrap();
        let params = Parameters::initialize(&dims, &mut rng);
        let x = Matrix::standard_normal(4, 5, 1.0, &mut rng);
        let y = one_hot(3, 5, &mut rng);

        let (pa, ca) =
            forward_network(&x, &params, false, 1.0, &mut StdRng::seed_from_u64(1)).unwrap();
        let (pb, cb) =
            forward_network(&x, &params, false, 1.0, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(pa, pb);
        assert_eq!(
            backward_network(&pa, &y, ca, 1.0).unwrap(),
            backward_network(&pb, &y, cb, 1.0).unwrap()
        );
    }

    #[test]
    fn gradients_have_parameter_shapes() {
        let mut rng = StdRng::seed_from_u64(2);
        let dims = LayerDims::new(vec![7, 5, 4, 2]).unwrap();
        let params = Parameters::initialize(&dims, &mut rng);
        let x = Matrix::standard_normal(7, 3, 1.0, &mut rng);
        let y = one_hot(2, 3, &mut rng);
        let (probs, caches) = forward_network(&x, &params, false, 0.8, &mut rng).unwrap();
        let grads = backward_network(&probs, &y, caches, 0.8).unwrap();
        assert_eq!(grads.len(), 3);
        for (l, g) in grads.iter().enumerate() {
            assert_eq!(g.d_weights.shape(), params.layer(l + 1).weights.shape());
            assert_eq!(g.d_biases.shape(), params.layer(l + 1).biases.shape());
        }
    }

    #[test]
    fn rejects_mismatched_labels() {
        let mut rng = StdRng::seed_from_u64(2);
        let dims = LayerDims::new(vec![3, 2]).unwrap();
        let params = Parameters::initialize(&dims, &mut rng);
        let x = Matrix::standard_normal(3, 4, 1.0, &mut rng);
        let (probs, caches) = forward_network(&x, &params, false, 1.0, &mut rng).unwrap();
        let y = Matrix::zeros(3, 4);
        assert!(matches!(
            backward_network(&probs, &y, caches, 1.0),
            Err(Error::ShapeMismatch(_))
        ));
    }
}
