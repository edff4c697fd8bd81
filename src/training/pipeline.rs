//! Train / evaluate / activation-rule loop (spec section 4.8). Trains a
//! fresh `CheatNet` on whatever labeled samples are available, evaluates it
//! on a held-out split, and decides whether the new model clears the
//! activation bar against the currently-active one.

use burn::module::{AutodiffModule, Module};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::Tensor;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::TrainingConfig;
use crate::ml::{CheatNet, CheatNetConfig, ModelBundle, TrainBackend};
use crate::model::{FeatureVector, ModelMetrics, ModelVersion, FEATURE_COUNT};

pub struct TrainingOutcome {
    pub bundle: ModelBundle,
}

/// Normalization stats computed from a training split.
struct Stats {
    means: [f32; FEATURE_COUNT],
    stds: [f32; FEATURE_COUNT],
}

fn compute_stats(features: &[FeatureVector]) -> Stats {
    let n = features.len().max(1) as f32;
    let mut means = [0f32; FEATURE_COUNT];
    for f in features {
        for i in 0..FEATURE_COUNT {
            means[i] += f.as_slice()[i];
        }
    }
    for m in means.iter_mut() {
        *m /= n;
    }
    let mut stds = [0f32; FEATURE_COUNT];
    for f in features {
        for i in 0..FEATURE_COUNT {
            let d = f.as_slice()[i] - means[i];
            stds[i] += d * d;
        }
    }
    for (i, s) in stds.iter_mut().enumerate() {
        *s = (*s / n).sqrt();
        if *s < 1e-6 {
            *s = 1.0;
        }
        let _ = i;
    }
    Stats { means, stds }
}

fn normalize(features: &FeatureVector, stats: &Stats) -> [f32; FEATURE_COUNT] {
    let mut out = [0f32; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        out[i] = (features.as_slice()[i] - stats.means[i]) / stats.stds[i];
    }
    out
}

/// Splits `samples` 80/20 into train/validation, keeping at least one
/// sample on each side regardless of how small the input is.
fn split(samples: &[(FeatureVector, bool)]) -> (&[(FeatureVector, bool)], &[(FeatureVector, bool)]) {
    if samples.len() < 2 {
        return (samples, samples);
    }
    let cut = ((samples.len() * 4) / 5).clamp(1, samples.len() - 1);
    samples.split_at(cut)
}

pub fn train(
    training: &TrainingConfig,
    samples: &[(FeatureVector, bool)],
    version_id: String,
    shuffle_seed: u64,
) -> anyhow::Result<TrainingOutcome> {
    if samples.is_empty() {
        anyhow::bail!("cannot train on an empty sample set");
    }

    let mut shuffled = samples.to_vec();
    let mut rng = SmallRng::seed_from_u64(shuffle_seed);
    shuffled.shuffle(&mut rng);

    let (train_set, valid_set) = split(&shuffled);
    let stats = compute_stats(&train_set.iter().map(|(f, _)| *f).collect::<Vec<_>>());

    let device: <TrainBackend as burn::tensor::backend::Backend>::Device = Default::default();
    let mut model: CheatNet<TrainBackend> = CheatNetConfig::new().init(&device);
    let mut optimizer = AdamConfig::new().init();

    for _epoch in 0..training.epochs {
        for batch in train_set.chunks(training.batch_size.max(1)) {
            let inputs: Vec<f32> = batch
                .iter()
                .flat_map(|(f, _)| normalize(f, &stats))
                .collect();
            let targets: Vec<f32> = batch.iter().map(|(_, label)| if *label { 1.0 } else { 0.0 }).collect();

            let x = Tensor::<TrainBackend, 1>::from_floats(inputs.as_slice(), &device)
                .reshape([batch.len(), FEATURE_COUNT]);
            let y = Tensor::<TrainBackend, 1>::from_floats(targets.as_slice(), &device)
                .reshape([batch.len(), 1]);

            let logits = model.forward(x);
            let probabilities = burn::tensor::activation::sigmoid(logits.clone());
            let eps = 1e-7;
            let loss = -(y.clone() * (probabilities.clone() + eps).log()
                + (-y.clone() + 1.0) * (-probabilities + 1.0 + eps).log())
            .mean();

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(training.learning_rate, model, grads);
        }
    }

    let inference_model = model.valid();
    let mut metrics = evaluate(&inference_model, &device, valid_set, train_set.len(), &stats);
    metrics.epochs = training.epochs;

    let version = ModelVersion {
        id: version_id,
        created_at_millis: crate::now_millis(),
        metrics,
        means: stats.means,
        stds: stats.stds,
    };
    let bundle = ModelBundle::new(version, inference_model);

    Ok(TrainingOutcome { bundle })
}

fn evaluate(
    model: &CheatNet<<TrainBackend as AutodiffBackend>::InnerBackend>,
    device: &<<TrainBackend as AutodiffBackend>::InnerBackend as burn::tensor::backend::Backend>::Device,
    valid_set: &[(FeatureVector, bool)],
    train_samples: usize,
    stats: &Stats,
) -> ModelMetrics {
    let mut tp = 0usize;
    let mut tn = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;

    for (features, label) in valid_set {
        let normalized = normalize(features, stats);
        let input = Tensor::<<TrainBackend as AutodiffBackend>::InnerBackend, 1>::from_floats(
            normalized.as_slice(),
            device,
        )
        .reshape([1, FEATURE_COUNT]);
        let probability = model.predict_probability(input);
        let data = probability.into_data();
        let value = data.as_slice::<f32>().expect("scalar output")[0];
        let predicted = value >= 0.5;
        match (predicted, *label) {
            (true, true) => tp += 1,
            (false, false) => tn += 1,
            (true, false) => fp += 1,
            (false, true) => fn_ += 1,
        }
    }

    let total = (tp + tn + fp + fn_).max(1) as f32;
    let accuracy = (tp + tn) as f32 / total;
    let precision = if tp + fp == 0 { 0.0 } else { tp as f32 / (tp + fp) as f32 };
    let recall = if tp + fn_ == 0 { 0.0 } else { tp as f32 / (tp + fn_) as f32 };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ModelMetrics {
        accuracy,
        precision,
        recall,
        f1,
        training_samples: train_samples,
        validation_samples: valid_set.len(),
        epochs: 0,
    }
}

/// The activation rule: a new model only replaces the active one if it's
/// not worse by more than the configured tolerance on either accuracy or
/// f1 (spec section 4.8). A strictly missing baseline always activates.
pub fn should_activate(new: &ModelMetrics, previous: Option<&ModelMetrics>, training: &TrainingConfig) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            new.accuracy + training.activation_accuracy_tolerance >= prev.accuracy
                && new.f1 + training.activation_f1_tolerance >= prev.f1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_model_always_activates() {
        let metrics = ModelMetrics::default();
        assert!(should_activate(&metrics, None, &TrainingConfig::default()));
    }

    #[test]
    fn worse_model_does_not_activate() {
        let previous = ModelMetrics { accuracy: 0.9, f1: 0.9, ..Default::default() };
        let new = ModelMetrics { accuracy: 0.5, f1: 0.4, ..Default::default() };
        assert!(!should_activate(&new, Some(&previous), &TrainingConfig::default()));
    }

    #[test]
    fn within_tolerance_still_activates() {
        let previous = ModelMetrics { accuracy: 0.90, f1: 0.90, ..Default::default() };
        let new = ModelMetrics { accuracy: 0.885, f1: 0.885, ..Default::default() };
        assert!(should_activate(&new, Some(&previous), &TrainingConfig::default()));
    }
}
