//! Runs one training experiment on a synthetic in-memory dataset.
//!
//! Usage:
//!   handprop [config.json] [history.json]
//!
//! Without a config the built-in default run is used. Set `RUST_LOG=debug`
//! for per-batch costs.

use std::env;
use std::process::ExitCode;

use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use handprop::{train_loop, LayerDims, Matrix, Result, TrainConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => {
            info!("loading config from {path}");
            TrainConfig::load_json(path)?
        }
        None => default_config()?,
    };
    config.validate()?;

    let (x, y) = gaussian_blobs(&config, 2_000);
    let outcome = train_loop(&x, &y, &config)?;

    info!(
        "{:?} after {} iterations, {} cost samples recorded",
        outcome.stop,
        outcome.iterations,
        outcome.costs.len()
    );

    if let Some(path) = args.get(1) {
        outcome.history.save_json(path)?;
        info!("history written to {path}");
    }
    Ok(())
}

fn default_config() -> Result<TrainConfig> {
    let dims = LayerDims::new(vec![16, 20, 7, 5, 4])?;
    let mut config = TrainConfig::new(dims, 0.009, 30, 32, false, 1.0);
    config.early_stopping.min_iterations = 1_000;
    Ok(config)
}

/// One noisy cluster per class in `[0, 1]`-ish feature space, standing in
/// for pre-normalized pixel intensities.
fn gaussian_blobs(config: &TrainConfig, m: usize) -> (Matrix, Matrix) {
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let features = config.layer_dims.input_size();
    let classes = config.layer_dims.output_size();

    let centers: Vec<Vec<f64>> = (0..classes)
        .map(|_| (0..features).map(|_| rng.gen::<f64>()).collect())
        .collect();

    let mut x = Matrix::zeros(features, m);
    let mut y = Matrix::zeros(classes, m);
    for j in 0..m {
        let class = rng.gen_range(0..classes);
        y.data[class][j] = 1.0;
        for i in 0..features {
            let noise = (rng.gen::<f64>() - 0.5) * 0.3;
            x.data[i][j] = (centers[class][i] + noise).clamp(0.0, 1.0);
        }
    }
    (x, y)
}
