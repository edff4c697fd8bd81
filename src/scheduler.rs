//! Periodic training scheduler (spec section 4.9). Wakes up on a fixed
//! interval, checks whether enough new edge cases have accumulated since
//! the last run and whether the cooldown has elapsed, and if so asks the
//! training worker to run.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use crate::config::TrainingConfig;

pub struct Scheduler {
    config: TrainingConfig,
    last_run_millis: AtomicI64,
    edge_cases_at_last_run: AtomicUsize,
}

impl Scheduler {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            last_run_millis: AtomicI64::new(0),
            edge_cases_at_last_run: AtomicUsize::new(0),
        }
    }

    pub fn period(&self) -> std::time::Duration {
        self.config.scheduler_period
    }

    /// Evaluates whether a training run should start right now, given the
    /// current edge-case count and the wall-clock time. Does not itself
    /// mutate state beyond what `record_run` does after a run completes, so
    /// it's safe to call speculatively.
    pub fn should_run(&self, current_edge_case_count: usize, now_millis: i64) -> bool {
        let last_run = self.last_run_millis.load(Ordering::Acquire);
        let cooldown_elapsed = now_millis - last_run >= self.config.scheduler_cooldown.as_millis() as i64;
        if !cooldown_elapsed {
            return false;
        }
        let delta = current_edge_case_count.saturating_sub(self.edge_cases_at_last_run.load(Ordering::Acquire));
        delta >= self.config.edge_case_threshold
    }

    pub fn record_run(&self, edge_case_count: usize, now_millis: i64) {
        self.last_run_millis.store(now_millis, Ordering::Release);
        self.edge_cases_at_last_run.store(edge_case_count, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> TrainingConfig {
        TrainingConfig {
            scheduler_cooldown: Duration::from_secs(3600),
            edge_case_threshold: 10,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn does_not_run_before_enough_edge_cases_accumulate() {
        let scheduler = Scheduler::new(config());
        assert!(!scheduler.should_run(5, 10_000_000));
    }

    #[test]
    fn runs_once_threshold_and_cooldown_both_clear() {
        let scheduler = Scheduler::new(config());
        assert!(scheduler.should_run(10, 10_000_000));
    }

    #[test]
    fn respects_cooldown_after_a_run() {
        let scheduler = Scheduler::new(config());
        scheduler.record_run(10, 0);
        assert!(!scheduler.should_run(25, 1000));
    }

    #[test]
    fn runs_again_once_cooldown_and_new_threshold_both_clear() {
        let scheduler = Scheduler::new(config());
        scheduler.record_run(10, 0);
        let cooldown_ms = config().scheduler_cooldown.as_millis() as i64;
        assert!(scheduler.should_run(20, cooldown_ms + 1));
    }
}
