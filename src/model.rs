//! Core data model (spec section 3): the atomic types that flow through the
//! pipeline. Submissions are consumed by value — no aliasing once they enter
//! the Orchestrator.

use crate::codec::{Heartbeat, Move};
use crate::Seed;
use serde::{Deserialize, Serialize};

/// A transient, in-flight game. The Session Registry is the sole owner.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub player_id: String,
    pub seed: Seed,
    pub start_time: std::time::Instant,
}

/// The atomic input unit handed to the Orchestrator.
#[derive(Debug, Clone)]
pub struct Submission {
    pub player_id: String,
    pub score: i32,
    pub speed_level: i32,
    pub food_eaten: u32,
    pub game_duration_secs: i64,
    pub seed: Seed,
    pub moves: Vec<Move>,
    pub heartbeats: Vec<Heartbeat>,
    pub total_frames: u32,
    pub fingerprint: String,
}

/// Ordered tuple of the 12 named behavioral features (spec section 4.5).
pub const FEATURE_NAMES: [&str; 12] = [
    "avg_time_between_moves",
    "move_time_variance",
    "moves_per_food",
    "direction_entropy",
    "heartbeat_consistency",
    "score_rate",
    "frame_timing_deviation",
    "pause_gap_count",
    "speed_progression",
    "movement_burst_rate",
    "performance_time_drift",
    "avg_speed_per_food",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f32; FEATURE_COUNT]);

impl FeatureVector {
    pub fn zero() -> Self {
        FeatureVector([0.0; FEATURE_COUNT])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// The four edge-case classifications from the arbiter's table (spec 4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    RulesPositiveMlNegative,
    RulesNegativeMlPositive,
    MlUncertainRulesPositive,
    MlUncertainRulesNegative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeCase {
    pub player_id: String,
    pub score: i32,
    pub rule_verdict_is_cheat: bool,
    pub ml_probability: f32,
    pub edge_type: EdgeType,
    pub features: [f32; FEATURE_COUNT],
    pub should_flag: bool,
    pub timestamp_millis: i64,
}

/// Aggregate evaluation metrics for one trained model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ModelMetrics {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub training_samples: usize,
    pub validation_samples: usize,
    pub epochs: usize,
}

/// A directory of model weights + normalization stats + metrics. Ordered by
/// creation time; exactly one is marked active in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersion {
    pub id: String,
    pub created_at_millis: i64,
    pub metrics: ModelMetrics,
    pub means: [f32; FEATURE_COUNT],
    pub stds: [f32; FEATURE_COUNT],
}

/// A single labeled (or unlabeled-legit) training sample persisted by the
/// Orchestrator on every accept/reject decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: [f32; FEATURE_COUNT],
    /// `Some(true)` = rule-confirmed cheat. `None` = accepted submission,
    /// recorded unlabeled rather than asserted legit, since an accepted
    /// submission could still be a cheat the rules missed. This is the
    /// common case — most traffic is accepted.
    pub label: Option<bool>,
    pub timestamp_millis: i64,
}
