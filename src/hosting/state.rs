use std::sync::Arc;

use crate::config::Config;
use crate::ml::Predictor;
use crate::orchestrator::Orchestrator;
use crate::persistence::{EdgeCaseLog, Leaderboard, ModelRegistry, ShameList, TrainingStore};
use crate::ratelimit::RateLimiter;
use crate::scheduler::Scheduler;
use crate::session::SessionRegistry;
use crate::training::TrainingState;

/// Everything a handler might need, constructed once at startup and shared
/// behind `web::Data` across every worker thread.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionRegistry>,
    pub start_rate_limiter: Arc<RateLimiter>,
    pub leaderboard: Arc<Leaderboard>,
    pub shame_list: Arc<ShameList>,
    pub edge_cases: Arc<EdgeCaseLog>,
    pub training_store: Arc<TrainingStore>,
    pub model_registry: Arc<ModelRegistry>,
    pub predictor: Arc<Predictor>,
    pub scheduler: Arc<Scheduler>,
    pub training_state: Arc<TrainingState>,
    pub orchestrator: Arc<Orchestrator>,
}
