pub mod early_stopping;
pub mod history;
pub mod loop_fn;
pub mod split;
pub mod train_config;
pub mod trainer;

pub use early_stopping::EarlyStopping;
pub use history::{Sample, TrainingHistory};
pub use loop_fn::{train_loop, StopReason, TrainOutcome};
pub use split::{train_val_split, Split};
pub use train_config::{EarlyStoppingConfig, TrainConfig};
pub use trainer::train_step;
