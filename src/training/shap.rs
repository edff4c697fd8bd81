//! Approximate per-feature attribution for a single prediction, used when
//! surfacing *why* the model flagged a submission in the training log. Not
//! exact Shapley values — a coalition sample of the kernel SHAP estimator,
//! cheap enough to run inline after every flagged edge case.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ml::ModelBundle;
use crate::model::{FeatureVector, FEATURE_COUNT};

/// Samples `iterations` random feature coalitions, comparing the model's
/// output with and without each feature masked to its background value, and
/// averages the marginal contribution. `background` is typically the
/// training-set mean (zeros once normalized).
pub fn attribute(
    bundle: &ModelBundle,
    features: &FeatureVector,
    background: &FeatureVector,
    iterations: usize,
    seed: u64,
) -> [f32; FEATURE_COUNT] {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut totals = [0f32; FEATURE_COUNT];
    let mut counts = [0usize; FEATURE_COUNT];

    for _ in 0..iterations.max(1) {
        let mask: [bool; FEATURE_COUNT] = std::array::from_fn(|_| rng.random_bool(0.5));
        for i in 0..FEATURE_COUNT {
            let with_feature = coalition_vector(features, background, &mask, i, true);
            let without_feature = coalition_vector(features, background, &mask, i, false);
            let marginal = bundle.predict(&with_feature) - bundle.predict(&without_feature);
            totals[i] += marginal;
            counts[i] += 1;
        }
    }

    std::array::from_fn(|i| {
        if counts[i] == 0 {
            0.0
        } else {
            totals[i] / counts[i] as f32
        }
    })
}

fn coalition_vector(
    features: &FeatureVector,
    background: &FeatureVector,
    mask: &[bool; FEATURE_COUNT],
    target: usize,
    include_target: bool,
) -> FeatureVector {
    let mut out = [0f32; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        let included = if i == target {
            include_target
        } else {
            mask[i]
        };
        out[i] = if included {
            features.as_slice()[i]
        } else {
            background.as_slice()[i]
        };
    }
    FeatureVector(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{CheatNetConfig, InferenceBackend};
    use crate::model::{ModelMetrics, ModelVersion};

    #[test]
    fn attribution_is_finite_for_every_feature() {
        let device = Default::default();
        let net = CheatNetConfig::new().init::<InferenceBackend>(&device);
        let version = ModelVersion {
            id: "test".into(),
            created_at_millis: 0,
            metrics: ModelMetrics::default(),
            means: [0.0; FEATURE_COUNT],
            stds: [1.0; FEATURE_COUNT],
        };
        let bundle = ModelBundle::new(version, net);
        let features = FeatureVector([1.0; FEATURE_COUNT]);
        let background = FeatureVector::zero();
        let attribution = attribute(&bundle, &features, &background, 8, 1);
        for value in attribution {
            assert!(value.is_finite());
        }
    }
}
