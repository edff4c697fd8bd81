use std::sync::Arc;

use serpentwatch::config::Config;
use serpentwatch::hosting::{AppState, Server};
use serpentwatch::ml::Predictor;
use serpentwatch::orchestrator::Orchestrator;
use serpentwatch::persistence::{EdgeCaseLog, Leaderboard, ModelRegistry, ShameList, TrainingStore};
use serpentwatch::ratelimit::RateLimiter;
use serpentwatch::scheduler::Scheduler;
use serpentwatch::session::SessionRegistry;
use serpentwatch::training::TrainingState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serpentwatch::init_logging();

    let config = Arc::new(Config::from_env());
    let paths = serpentwatch::persistence::Paths::new(config.persistence_root.clone());
    paths.ensure_exists()?;

    let leaderboard = Arc::new(Leaderboard::load(paths.leaderboard_file())?);
    let shame_list = Arc::new(ShameList::load(paths.shame_file())?);
    let edge_cases = Arc::new(EdgeCaseLog::new(paths.edge_case_log()));
    let training_store = Arc::new(TrainingStore::new(paths.training_samples_log()));
    let model_registry = Arc::new(ModelRegistry::new(paths.models_dir())?);

    let predictor = Arc::new(Predictor::new(config.ml.clone()));
    if let Some(bundle) = model_registry.load_active()? {
        log::info!("activating model version {} from disk", bundle.version.id);
        predictor.activate(bundle).await;
    }

    let sessions = Arc::new(SessionRegistry::new(config.session.clone()));
    let start_rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    let scheduler = Arc::new(Scheduler::new(config.training.clone()));
    let training_state = TrainingState::new();

    let orchestrator = Arc::new(Orchestrator::new(
        config.clone(),
        sessions.clone(),
        start_rate_limiter.clone(),
        leaderboard.clone(),
        shame_list.clone(),
        edge_cases.clone(),
        training_store.clone(),
        model_registry.clone(),
        predictor.clone(),
        scheduler.clone(),
        training_state.clone(),
    ));

    spawn_session_sweeper(sessions.clone());
    spawn_rate_limit_gc(start_rate_limiter.clone());
    spawn_scheduler_tick(orchestrator.clone(), scheduler.period());

    let state = AppState {
        config,
        sessions,
        start_rate_limiter,
        leaderboard,
        shame_list,
        edge_cases,
        training_store,
        model_registry,
        predictor,
        scheduler,
        training_state,
        orchestrator,
    };

    Server::run(state).await.map_err(anyhow::Error::from)
}

/// Evicts sessions whose TTL expired without ever seeing a submission.
fn spawn_session_sweeper(sessions: Arc<SessionRegistry>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sessions.sweep_interval());
        loop {
            interval.tick().await;
            let evicted = sessions.sweep().await;
            if evicted > 0 {
                log::debug!("session sweep evicted {evicted} stale session(s)");
            }
        }
    });
}

/// Drops rate-limit windows for keys that have gone quiet, so the map
/// doesn't grow unbounded across the lifetime of the process.
fn spawn_rate_limit_gc(rate_limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(5 * 60));
        loop {
            interval.tick().await;
            let dropped = rate_limiter.gc().await;
            if dropped > 0 {
                log::debug!("rate limiter gc dropped {dropped} idle key(s)");
            }
        }
    });
}

/// Wakes up on the configured scheduler period and lets the orchestrator
/// decide whether enough edge cases have accumulated to retrain, so a quiet
/// server without submissions still eventually reacts to queued samples.
fn spawn_scheduler_tick(orchestrator: Arc<Orchestrator>, period: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            orchestrator.run_scheduled_tick().await;
        }
    });
}
