//! A loaded model: weights plus the feature normalization stats and metrics
//! recorded alongside them at training time. `ModelBundle` is what the
//! Predictor swaps in atomically when a new version activates.

use anyhow::Context;
use burn::record::{BinFileRecorder, FullPrecisionSettings, Recorder};
use std::path::Path;

use super::model::{CheatNet, CheatNetConfig, InferenceBackend};
use crate::model::{FeatureVector, ModelVersion, FEATURE_COUNT};

pub struct ModelBundle {
    pub version: ModelVersion,
    net: CheatNet<InferenceBackend>,
}

impl ModelBundle {
    pub fn new(version: ModelVersion, net: CheatNet<InferenceBackend>) -> Self {
        Self { version, net }
    }

    /// Loads `weights.bin` + `stats.json`/`metrics.json` from a model version
    /// directory laid out by the training pipeline (see persistence::model_registry).
    pub fn load(dir: &Path, version: ModelVersion) -> anyhow::Result<Self> {
        let device = Default::default();
        let net = CheatNetConfig::new().init::<InferenceBackend>(&device);
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        let net = net
            .load_file(dir.join("weights"), &recorder, &device)
            .with_context(|| format!("loading model weights from {}", dir.display()))?;
        Ok(Self::new(version, net))
    }

    pub fn save(&self, dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(dir)?;
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        self.net
            .clone()
            .save_file(dir.join("weights"), &recorder)
            .with_context(|| format!("saving model weights to {}", dir.display()))?;
        let stats_path = dir.join("stats.json");
        std::fs::write(
            stats_path,
            serde_json::to_vec_pretty(&(self.version.means, self.version.stds))?,
        )?;
        let metrics_path = dir.join("metrics.json");
        std::fs::write(metrics_path, serde_json::to_vec_pretty(&self.version.metrics)?)?;
        Ok(())
    }

    /// Normalizes `features` against the version's training-time mean/std and
    /// returns the raw cheat probability in [0, 1]. Features with a near-zero
    /// recorded std (constant across training data) are passed through
    /// un-normalized rather than dividing by zero.
    pub fn predict(&self, features: &FeatureVector) -> f32 {
        let normalized: Vec<f32> = (0..FEATURE_COUNT)
            .map(|i| {
                let x = features.as_slice()[i];
                let mean = self.version.means[i];
                let std = self.version.stds[i];
                if std.abs() < 1e-6 {
                    x - mean
                } else {
                    (x - mean) / std
                }
            })
            .collect();

        let device = Default::default();
        let input = burn::tensor::Tensor::<InferenceBackend, 1>::from_floats(
            normalized.as_slice(),
            &device,
        )
        .reshape([1, FEATURE_COUNT]);
        let output = self.net.predict_probability(input);
        let data = output.into_data();
        let value: f32 = data.as_slice::<f32>().expect("single scalar output")[0];
        value.clamp(0.0, 1.0)
    }
}
