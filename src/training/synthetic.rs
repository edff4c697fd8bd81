//! Seeded synthetic data generator. Bootstraps the training set before
//! enough real submissions have accumulated (spec's
//! `min_samples_before_synthetic` gate), by sampling from a handful of
//! archetype distributions rather than hand-writing fixtures.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::{FeatureVector, TrainingSample, FEATURE_COUNT};

/// A labeled behavioral archetype: a center and per-feature spread that a
/// real submission of that kind would plausibly land near.
struct Archetype {
    label: bool,
    means: [f32; FEATURE_COUNT],
    spread: [f32; FEATURE_COUNT],
}

fn archetypes() -> Vec<Archetype> {
    vec![
        // ordinary human play: moderate variance, mid entropy, no pauses
        Archetype {
            label: false,
            means: [180.0, 4000.0, 6.0, 0.8, 0.9, 2.0, 10.0, 0.0, 20.0, 0.1, 5.0, 30.0],
            spread: [40.0, 1500.0, 2.0, 0.15, 0.08, 0.6, 4.0, 0.5, 6.0, 0.05, 3.0, 8.0],
        },
        // bot: near-zero variance, minimal moves per food, no entropy spread
        Archetype {
            label: true,
            means: [50.0, 20.0, 1.2, 0.1, 0.99, 8.0, 1.0, 0.0, 5.0, 0.8, 0.5, 60.0],
            spread: [10.0, 10.0, 0.2, 0.05, 0.01, 1.0, 0.5, 0.1, 2.0, 0.1, 0.5, 5.0],
        },
        // speed hack: high score_rate, tight frame timing far outside floor
        Archetype {
            label: true,
            means: [60.0, 100.0, 3.0, 0.6, 0.95, 15.0, 25.0, 0.0, 40.0, 0.4, 30.0, 80.0],
            spread: [15.0, 50.0, 1.0, 0.1, 0.05, 3.0, 8.0, 0.3, 10.0, 0.1, 10.0, 15.0],
        },
        // pause abuse: high pause_gap_count, large performance_time_drift
        Archetype {
            label: true,
            means: [300.0, 8000.0, 6.0, 0.7, 0.6, 1.5, 20.0, 4.0, 15.0, 0.1, 50.0, 25.0],
            spread: [60.0, 2000.0, 2.0, 0.15, 0.2, 0.5, 6.0, 1.5, 5.0, 0.05, 20.0, 6.0],
        },
    ]
}

/// Draws `count` samples proportionally split across the archetypes, seeded
/// so a given `(seed, count)` pair always produces the same synthetic set.
pub fn generate(seed: u64, count: usize) -> Vec<TrainingSample> {
    let archetypes = archetypes();
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let archetype = &archetypes[i % archetypes.len()];
            let mut features = [0f32; FEATURE_COUNT];
            for j in 0..FEATURE_COUNT {
                let noise: f32 = rng.random_range(-1.0..1.0);
                features[j] = (archetype.means[j] + noise * archetype.spread[j]).max(0.0);
            }
            TrainingSample {
                features,
                label: Some(archetype.label),
                timestamp_millis: 0,
            }
        })
        .collect()
}

pub fn generate_vectors(seed: u64, count: usize) -> Vec<(FeatureVector, bool)> {
    generate(seed, count)
        .into_iter()
        .map(|s| (FeatureVector(s.features), s.label.unwrap_or(false)))
        .collect()
}
