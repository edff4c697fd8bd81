//! Shadow-mode cheat-probability predictor (spec section 4.6). Never blocks
//! a submission on its own; the Orchestrator runs it purely to log agreement
//! with the rule detectors and to feed the edge-case arbiter.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::bundle::ModelBundle;
use crate::config::MlConfig;
use crate::model::FeatureVector;

/// Where a probability lands relative to the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlSignal {
    LikelyCheat,
    LikelyLegit,
    Uncertain,
}

/// Default probability used whenever no model is loaded yet (cold start) or
/// the submission doesn't meet the minimum score for inference. Deliberately
/// neutral so it never tips an edge case toward either classification.
pub const NO_MODEL_PROBABILITY: f32 = 0.5;

pub struct Predictor {
    active: Arc<RwLock<Option<ModelBundle>>>,
    config: MlConfig,
}

impl Predictor {
    pub fn new(config: MlConfig) -> Self {
        Self {
            active: Arc::new(RwLock::new(None)),
            config,
        }
    }

    pub async fn activate(&self, bundle: ModelBundle) {
        let mut slot = self.active.write().await;
        *slot = Some(bundle);
    }

    pub async fn active_version_id(&self) -> Option<String> {
        self.active.read().await.as_ref().map(|b| b.version.id.clone())
    }

    /// Runs inference if `score` clears the configured floor and a model is
    /// loaded; otherwise returns the neutral default. Intended to be called
    /// from inside `spawn_blocking` since the tensor ops are CPU-bound.
    pub async fn predict(&self, score: i32, features: &FeatureVector) -> f32 {
        if score < self.config.min_score_for_inference {
            return NO_MODEL_PROBABILITY;
        }
        match self.active.read().await.as_ref() {
            Some(bundle) => bundle.predict(features),
            None => NO_MODEL_PROBABILITY,
        }
    }

    pub fn classify(&self, probability: f32) -> MlSignal {
        if probability >= self.config.high_threshold {
            MlSignal::LikelyCheat
        } else if probability <= self.config.low_threshold {
            MlSignal::LikelyLegit
        } else {
            MlSignal::Uncertain
        }
    }
}
