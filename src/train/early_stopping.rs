use crate::train::train_config::EarlyStoppingConfig;

/// Validation cost the first comparison is made against.
const INITIAL_COST: f64 = 100.0;

/// Watches the validation cost at each validation point.
///
/// Training stops when the cost dropped by less than `min_delta` since the
/// previous validation point and the iteration is past `min_iterations`.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    config: EarlyStoppingConfig,
    last_cost: f64,
}

impl EarlyStopping {
    pub fn new(config: EarlyStoppingConfig) -> Self {
        EarlyStopping { config, last_cost: INITIAL_COST }
    }

    /// Feeds one validation point. Returns true when training should stop.
    pub fn should_stop(&mut self, iteration: usize, validation_cost: f64) -> bool {
        let improvement = self.last_cost - validation_cost;
        if improvement < self.config.min_delta && iteration > self.config.min_iterations {
            return true;
        }
        self.last_cost = validation_cost;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopper(min_iterations: usize) -> EarlyStopping {
        EarlyStopping::new(EarlyStoppingConfig { min_delta: 1e-10, min_iterations })
    }

    #[test]
    fn plateau_after_the_floor_stops() {
        let mut es = stopper(300);
        let costs = [2.0, 1.5, 1.2, 1.0, 1.0, 1.0];
        let stopped_at = costs.iter().enumerate()
            .position(|(i, &c)| es.should_stop(i * 100, c));
        // iteration 400 is past the floor and did not improve on 300
        assert_eq!(stopped_at, Some(4));
    }

    #[test]
    fn plateau_before_the_floor_keeps_going() {
        let mut es = stopper(18_000);
        for i in 0..50 {
            assert!(!es.should_stop(i * 100, 1.0));
        }
    }

    #[test]
    fn rising_cost_counts_as_no_improvement() {
        let mut es = stopper(0);
        assert!(!es.should_stop(0, 1.0));
        assert!(es.should_stop(100, 1.3));
    }

    #[test]
    fn steady_improvement_never_stops() {
        let mut es = stopper(0);
        for i in 1..100 {
            assert!(!es.should_stop(i * 100, 10.0 / i as f64));
        }
    }
}
