use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::loss::cross_entropy::cross_entropy_cost;
use crate::math::matrix::Matrix;
use crate::metrics::accuracy::accuracy;
use crate::network::forward::{forward_eval, predict};
use crate::network::parameters::Parameters;
use crate::optim::sgd::Sgd;
use crate::train::early_stopping::EarlyStopping;
use crate::train::history::{Sample, TrainingHistory};
use crate::train::split::{train_val_split, Split};
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_step;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every configured epoch ran.
    Completed,
    /// The validation cost plateaued at this iteration.
    EarlyStopped { iteration: usize },
}

/// Result of `train_loop`.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub parameters: Parameters,
    /// Training-batch cost sampled at every validation point.
    pub costs: Vec<Sample>,
    pub history: TrainingHistory,
    pub stop: StopReason,
    /// Mini-batch steps taken.
    pub iterations: usize,
    /// Accuracy (%) over the whole training partition at the end.
    pub train_accuracy: f64,
    /// Accuracy (%) over the whole validation partition at the end.
    pub validation_accuracy: f64,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains a fresh network on `x` (`[input × m]`) and one-hot `y`
/// (`[classes × m]`).
///
/// The config is checked before anything else happens. The examples are then
/// split into training and validation partitions, parameters initialized,
/// and mini-batch gradient descent runs for `config.epochs` epochs. Every
/// `config.validation_interval` iterations the training-batch and validation
/// metrics are recorded and the early-stopping rule is consulted.
///
/// Initialization, the split and dropout masks all draw from one `StdRng`
/// seeded with `config.seed`, so a run is reproducible.
pub fn train_loop(x: &Matrix, y: &Matrix, config: &TrainConfig) -> Result<TrainOutcome> {
    config.validate()?;
    check_data(x, y, config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let split = train_val_split(x, y, config.validation_fraction, &mut rng)?;
    config.validate_for_training_set(split.train_x.cols)?;

    let mut params = Parameters::initialize(&config.layer_dims, &mut rng);
    let optimizer = Sgd::new(config.learning_rate);
    let mut stopper = EarlyStopping::new(config.early_stopping);
    let mut history = TrainingHistory::default();

    let n_train = split.train_x.cols;
    let batches = n_train / config.batch_size;
    let mut iteration = 0;
    let t_start = Instant::now();

    info!(
        "training {:?} on {} examples ({} held out), {} batches of {} per epoch, lr {}, batchnorm {}, keep_prob {}",
        config.layer_dims.as_slice(),
        n_train,
        split.val_x.cols,
        batches,
        config.batch_size,
        config.learning_rate,
        config.use_batchnorm,
        config.keep_prob
    );

    for epoch in 0..config.epochs {
        debug!("epoch {epoch}");

        for batch in 0..batches {
            let start = batch * config.batch_size;
            let end = start + config.batch_size;
            let batch_x = split.train_x.slice_cols(start, end);
            let batch_y = split.train_y.slice_cols(start, end);

            let cost = train_step(
                &mut params,
                &batch_x,
                &batch_y,
                config.use_batchnorm,
                config.keep_prob,
                &optimizer,
                &mut rng,
            )?;
            debug!("iteration {iteration}: batch cost {cost:.6}");

            if iteration % config.validation_interval == 0 {
                let val_probs = forward_eval(&split.val_x, &params, config.use_batchnorm)?;
                let val_cost = cross_entropy_cost(&val_probs, &split.val_y)?;
                let val_accuracy = accuracy(&val_probs, &split.val_y)?;
                let train_accuracy = predict(&batch_x, &batch_y, &params, config.use_batchnorm)?;
                history.record(iteration, cost, val_cost, train_accuracy, val_accuracy);

                info!(
                    "iteration {iteration}: cost {cost:.6}, validation cost {val_cost:.6}, validation accuracy {val_accuracy:.2}%"
                );

                if stopper.should_stop(iteration, val_cost) {
                    info!("early stopping after {iteration} iterations");
                    return finish(
                        params,
                        history,
                        &split,
                        config,
                        StopReason::EarlyStopped { iteration },
                        iteration + 1,
                        t_start,
                    );
                }
            }
            iteration += 1;
        }
    }

    finish(params, history, &split, config, StopReason::Completed, iteration, t_start)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Shape and sanity checks on the raw data, before anything is initialized.
fn check_data(x: &Matrix, y: &Matrix, config: &TrainConfig) -> Result<()> {
    let dims = &config.layer_dims;
    if x.rows != dims.input_size() {
        return Err(Error::ShapeMismatch(format!(
            "inputs have {} features, layer_dims expects {}",
            x.rows,
            dims.input_size()
        )));
    }
    if y.rows != dims.output_size() {
        return Err(Error::ShapeMismatch(format!(
            "labels have {} classes, layer_dims expects {}",
            y.rows,
            dims.output_size()
        )));
    }
    if x.cols != y.cols {
        return Err(Error::ShapeMismatch(format!(
            "{} input examples but {} labels",
            x.cols, y.cols
        )));
    }
    if !x.is_finite() {
        return Err(Error::InvalidData("inputs contain non-finite values".to_owned()));
    }
    Ok(())
}

/// Final accuracies over both whole partitions.
fn finish(
    parameters: Parameters,
    history: TrainingHistory,
    split: &Split,
    config: &TrainConfig,
    stop: StopReason,
    iterations: usize,
    t_start: Instant,
) -> Result<TrainOutcome> {
    let train_accuracy = predict(&split.train_x, &split.train_y, &parameters, config.use_batchnorm)?;
    let validation_accuracy = predict(&split.val_x, &split.val_y, &parameters, config.use_batchnorm)?;

    info!(
        "finished after {iterations} iterations in {:.2}s: training accuracy {train_accuracy:.2}%, validation accuracy {validation_accuracy:.2}%",
        t_start.elapsed().as_secs_f64()
    );

    Ok(TrainOutcome {
        parameters,
        costs: history.train_costs.clone(),
        history,
        stop,
        iterations,
        train_accuracy,
        validation_accuracy,
    })
}
