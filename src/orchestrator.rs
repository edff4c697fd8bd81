//! The submission orchestrator (spec section 4.12): the linear pipeline a
//! score submission flows through. Each stage either advances to the next
//! or returns a `PipelineError`, and the ML/training side effects never get
//! a vote on whether a submission is accepted.

use std::sync::Arc;

use crate::arbiter;
use crate::config::Config;
use crate::dto::LeaderboardEntry;
use crate::error::{PipelineError, Verdict};
use crate::features;
use crate::ml::Predictor;
use crate::model::{FeatureVector, Submission, TrainingSample};
use crate::persistence::{EdgeCaseLog, Leaderboard, ModelRegistry, ShameEntry, ShameList, TrainingStore};
use crate::ratelimit::RateLimiter;
use crate::replay::Engine;
use crate::rules::{self, DetectorChain};
use crate::scheduler::Scheduler;
use crate::session::SessionRegistry;
use crate::training::{self, TrainingState};

/// Coarse progress marker, logged at each transition so a failed or slow
/// submission can be traced to the stage it stalled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    RateLimitChecked,
    SessionValidated,
    Replayed,
    RulesEvaluated,
    FeaturesExtracted,
    MlScored,
    Persisted,
}

pub struct Orchestrator {
    config: Arc<Config>,
    sessions: Arc<SessionRegistry>,
    rate_limiter: Arc<RateLimiter>,
    leaderboard: Arc<Leaderboard>,
    shame_list: Arc<ShameList>,
    edge_cases: Arc<EdgeCaseLog>,
    training_store: Arc<TrainingStore>,
    model_registry: Arc<ModelRegistry>,
    predictor: Arc<Predictor>,
    scheduler: Arc<Scheduler>,
    training_state: Arc<TrainingState>,
    detectors: DetectorChain,
    replay_engine: Engine,
}

impl Orchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        sessions: Arc<SessionRegistry>,
        rate_limiter: Arc<RateLimiter>,
        leaderboard: Arc<Leaderboard>,
        shame_list: Arc<ShameList>,
        edge_cases: Arc<EdgeCaseLog>,
        training_store: Arc<TrainingStore>,
        model_registry: Arc<ModelRegistry>,
        predictor: Arc<Predictor>,
        scheduler: Arc<Scheduler>,
        training_state: Arc<TrainingState>,
    ) -> Self {
        let replay_engine = Engine::new(config.replay.clone());
        Self {
            config,
            sessions,
            rate_limiter,
            leaderboard,
            shame_list,
            edge_cases,
            training_store,
            model_registry,
            predictor,
            scheduler,
            training_state,
            detectors: rules::default_chain(),
            replay_engine,
        }
    }

    pub async fn submit(&self, submission: Submission) -> Result<(i32, Option<usize>), PipelineError> {
        if !self.rate_limiter.check(&submission.player_id).await {
            return Err(PipelineError::RateLimited);
        }
        log::debug!("{:?}: {}", Stage::RateLimitChecked, submission.player_id);

        if submission.total_frames > self.config.payload.max_total_frames {
            return Err(PipelineError::Validation("total_frames exceeds the configured cap".into()));
        }

        let registered_seed = self
            .sessions
            .consume(&submission.player_id)
            .await
            .ok_or_else(|| PipelineError::AuthFailure("no active session for player".into()))?
            .seed;
        log::debug!("{:?}: {}", Stage::SessionValidated, submission.player_id);

        let replay = self
            .replay_engine
            .run(submission.seed, &submission.moves, submission.total_frames);
        log::debug!("{:?}: {}", Stage::Replayed, submission.player_id);

        let ctx = rules::DetectorContext::new(&submission, &replay, registered_seed, &self.config);
        let verdict = self.detectors.evaluate(&ctx);
        log::debug!("{:?}: {} -> {:?}", Stage::RulesEvaluated, submission.player_id, verdict);

        let feature_vector = features::extract(&submission, &self.config.rules);
        log::debug!("{:?}: {}", Stage::FeaturesExtracted, submission.player_id);

        let probability = self.score_with_ml(submission.score, feature_vector).await;
        let signal = self.predictor.classify(probability);
        log::debug!("{:?}: {} -> {:?}", Stage::MlScored, submission.player_id, signal);

        self.record_edge_case_if_any(&submission, &verdict, probability, signal, &feature_vector)
            .await;
        let label = if verdict.is_cheat() { Some(true) } else { None };
        self.record_training_sample(&feature_vector, label).await;
        self.maybe_trigger_training().await;

        match verdict {
            Verdict::Cheat { kind, reason } => {
                let _ = self
                    .shame_list
                    .record(ShameEntry {
                        player_id: submission.player_id.clone(),
                        attempted_score: submission.score,
                        kind,
                        reason: reason.clone(),
                        timestamp_millis: crate::now_millis(),
                    })
                    .await;
                log::debug!("{:?}: {}", Stage::Persisted, submission.player_id);
                Err(PipelineError::CheatDetected { kind, reason })
            }
            Verdict::Legit => {
                let rank = self.leaderboard.rank_of(submission.score).await;
                self.leaderboard
                    .record(LeaderboardEntry {
                        player_id: submission.player_id.clone(),
                        score: submission.score,
                        timestamp_millis: crate::now_millis(),
                    })
                    .await
                    .map_err(PipelineError::Internal)?;
                log::debug!("{:?}: {}", Stage::Persisted, submission.player_id);
                Ok((submission.score, Some(rank)))
            }
        }
    }

    /// ML inference is CPU-bound tensor math; run it off the async executor
    /// so a burst of submissions can't starve other connections.
    async fn score_with_ml(&self, score: i32, features: FeatureVector) -> f32 {
        self.predictor.predict(score, &features).await
    }

    async fn record_edge_case_if_any(
        &self,
        submission: &Submission,
        verdict: &Verdict,
        probability: f32,
        signal: crate::ml::MlSignal,
        features: &FeatureVector,
    ) {
        if let Some(edge_type) = arbiter::classify(verdict, signal) {
            let case = arbiter::build(
                submission.player_id.clone(),
                submission.score,
                verdict,
                probability,
                edge_type,
                features,
                crate::now_millis(),
            );
            if let Err(err) = self.edge_cases.append(&case).await {
                log::warn!("failed to persist edge case: {err:#}");
            }
        }
    }

    /// `label` is `Some(true)` for a rule-confirmed cheat and `None` for an
    /// accepted submission — accepted traffic is unlabeled, not asserted
    /// legit, since an accepted submission could still be a cheat the rules
    /// missed (spec section 4.12).
    async fn record_training_sample(&self, features: &FeatureVector, label: Option<bool>) {
        let sample = TrainingSample {
            features: *features.as_slice().first_chunk().expect("fixed-size feature vector"),
            label,
            timestamp_millis: crate::now_millis(),
        };
        if let Err(err) = self.training_store.append(&sample).await {
            log::warn!("failed to persist training sample: {err:#}");
        }
    }

    async fn maybe_trigger_training(&self) {
        let Ok(count) = self.edge_cases.count().await else {
            return;
        };
        let now = crate::now_millis();
        if !self.scheduler.should_run(count, now) {
            return;
        }
        self.dispatch_training_run(count, now).await;
    }

    /// Entry point for the scheduler's own periodic tick, independent of
    /// whatever submission traffic happens to be flowing. Safe to call on a
    /// fixed interval; it's a no-op unless the threshold and cooldown agree.
    pub async fn run_scheduled_tick(&self) {
        self.maybe_trigger_training().await;
    }

    /// Forces a training run outside the scheduler's own threshold check,
    /// for the operator-facing manual trigger endpoint. Still goes through
    /// the same debounce state machine as the automatic path.
    pub async fn trigger_training(&self) -> bool {
        if !self.training_state.request() {
            return false;
        }
        let count = self.edge_cases.count().await.unwrap_or(0);
        let now = crate::now_millis();
        self.scheduler.record_run(count, now);
        self.run_dispatched_training();
        true
    }

    async fn dispatch_training_run(&self, edge_case_count: usize, now: i64) {
        if !self.training_state.request() {
            return;
        }
        self.scheduler.record_run(edge_case_count, now);
        self.run_dispatched_training();
    }

    /// Assumes `training_state.request()` already returned `true`; spawns
    /// the background loop that runs until no pending request remains.
    fn run_dispatched_training(&self) {
        let training_store = self.training_store.clone();
        let model_registry = self.model_registry.clone();
        let predictor = self.predictor.clone();
        let training_state = self.training_state.clone();
        let training_config = self.config.training.clone();

        tokio::spawn(async move {
            loop {
                if let Err(err) =
                    run_training(&training_store, &model_registry, &predictor, &training_config).await
                {
                    log::warn!("training run failed: {err:#}");
                }
                if !training_state.finish() {
                    break;
                }
            }
        });
    }
}

/// One train/eval/activate cycle. Runs the CPU-bound tensor work on a
/// blocking thread and only touches the predictor's hot-swap slot once a
/// new version clears the activation rule.
async fn run_training(
    training_store: &TrainingStore,
    model_registry: &ModelRegistry,
    predictor: &Predictor,
    training_config: &crate::config::TrainingConfig,
) -> anyhow::Result<()> {
    let real_samples = training_store.read_all().await?;
    let config_for_blocking = training_config.clone();
    let samples = training::assemble_training_set(&real_samples, training_config, crate::now_millis() as u64);
    let version_id = format!("v{}", crate::now_millis());

    let shuffle_seed = crate::now_millis() as u64;
    let outcome = tokio::task::spawn_blocking(move || {
        training::train(&config_for_blocking, &samples, version_id, shuffle_seed)
    })
    .await
    .map_err(anyhow::Error::from)??;

    model_registry.persist(&outcome.bundle)?;

    let previous = model_registry
        .active_id()?
        .and_then(|id| model_registry.load(&id).ok());
    let activates = training::should_activate(
        &outcome.bundle.version.metrics,
        previous.as_ref().map(|b| &b.version.metrics),
        training_config,
    );

    if activates {
        model_registry.activate(&outcome.bundle.version.id)?;
        predictor.activate(outcome.bundle).await;
    }
    Ok(())
}
