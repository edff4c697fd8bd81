//! Training subsystem (spec section 4.8): synthetic data generation, the
//! train/eval/activation loop, the debounce state machine, and SHAP-style
//! attribution for the training log.

mod pipeline;
mod shap;
mod synthetic;
mod worker;

pub use pipeline::{should_activate, train, TrainingOutcome};
pub use shap::attribute;
pub use synthetic::{generate, generate_vectors};
pub use worker::TrainingState;

use crate::config::TrainingConfig;
use crate::model::{FeatureVector, TrainingSample};

/// Combines real samples with synthetic ones when there aren't enough real
/// samples yet to train meaningfully. A real sample's persisted `label` is
/// `None` for an accepted submission and `Some(true)` for a rule-confirmed
/// cheat (spec section 4.12); for training purposes an unlabeled sample is
/// treated as legit (`false`), since the whole point is to teach the model
/// what ordinary accepted play looks like. Leaving `None` samples out here
/// would starve the model of the overwhelming majority of its real traffic.
pub fn assemble_training_set(
    real: &[TrainingSample],
    training: &TrainingConfig,
    synthetic_seed: u64,
) -> Vec<(FeatureVector, bool)> {
    let mut set: Vec<(FeatureVector, bool)> = real
        .iter()
        .map(|s| (FeatureVector(s.features), s.label.unwrap_or(false)))
        .collect();

    if set.len() < training.min_samples_before_synthetic {
        let needed = training.min_samples_before_synthetic - set.len();
        set.extend(synthetic::generate_vectors(synthetic_seed, needed));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tops_up_with_synthetic_when_real_samples_are_scarce() {
        let training = TrainingConfig {
            min_samples_before_synthetic: 50,
            ..TrainingConfig::default()
        };
        let set = assemble_training_set(&[], &training, 1);
        assert_eq!(set.len(), 50);
    }

    #[test]
    fn does_not_add_synthetic_once_real_samples_suffice() {
        let training = TrainingConfig {
            min_samples_before_synthetic: 2,
            ..TrainingConfig::default()
        };
        let real = vec![
            TrainingSample {
                features: [0.0; crate::model::FEATURE_COUNT],
                label: Some(true),
                timestamp_millis: 0,
            },
            TrainingSample {
                features: [1.0; crate::model::FEATURE_COUNT],
                label: Some(false),
                timestamp_millis: 0,
            },
        ];
        let set = assemble_training_set(&real, &training, 1);
        assert_eq!(set.len(), 2);
    }
}
