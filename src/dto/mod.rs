//! Wire DTOs for the HTTP surface (spec section 6). Kept separate from the
//! internal `model` types so the JSON shape can evolve independently of the
//! pipeline's own representation.

use serde::{Deserialize, Serialize};

use crate::codec::{decode_heartbeats, decode_moves};
use crate::model::{EdgeCase, ModelMetrics, Submission};

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct StartGameResponse {
    pub seed: u32,
    pub grid: u32,
    pub initial_speed_ms: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub player_id: String,
    pub score: i32,
    pub speed_level: i32,
    pub food_eaten: u32,
    pub game_duration_secs: i64,
    pub seed: u32,
    pub moves: String,
    pub heartbeats: String,
    pub total_frames: u32,
    pub fingerprint: String,
}

impl SubmitScoreRequest {
    pub fn into_submission(self) -> Submission {
        Submission {
            player_id: self.player_id,
            score: self.score,
            speed_level: self.speed_level,
            food_eaten: self.food_eaten,
            game_duration_secs: self.game_duration_secs,
            seed: self.seed,
            moves: decode_moves(&self.moves),
            heartbeats: decode_heartbeats(&self.heartbeats),
            total_frames: self.total_frames,
            fingerprint: self.fingerprint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    pub accepted: bool,
    pub score: i32,
    pub rank: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub score: i32,
    pub timestamp_millis: i64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub struct MlStatusResponse {
    pub active_version: Option<String>,
    pub metrics: Option<ModelMetrics>,
}

#[derive(Debug, Serialize)]
pub struct ModelVersionSummary {
    pub id: String,
    pub created_at_millis: i64,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Serialize)]
pub struct ModelVersionsResponse {
    pub versions: Vec<ModelVersionSummary>,
}

#[derive(Debug, Serialize)]
pub struct EdgeCasesResponse {
    pub cases: Vec<EdgeCase>,
}

#[derive(Debug, Serialize)]
pub struct TrainingTriggerResponse {
    pub triggered: bool,
    pub reason: String,
}
