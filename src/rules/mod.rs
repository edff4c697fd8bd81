//! Deterministic rule detectors (spec section 4.4). Each detector inspects a
//! `DetectorContext` and either stays silent (legit, as far as it's
//! concerned) or raises a `Verdict::Cheat`. The chain runs them in a fixed
//! order and stops at the first hit.

mod bot;
mod chain;
mod heartbeat;
mod pause;
mod replay;
mod score_food;
mod session_seed;
mod speed_floor;

pub use chain::DetectorChain;

use crate::codec::{Heartbeat, Move};
use crate::config::{Config, RuleConfig, ToleranceConfig};
use crate::error::Verdict;
use crate::model::Submission;
use crate::replay::ReplayVerdict;
use crate::Seed;

/// Everything a detector might need. Built once per submission by the
/// Orchestrator and shared by reference across the chain.
pub struct DetectorContext<'a> {
    pub submission: &'a Submission,
    pub replay: &'a ReplayVerdict,
    pub registered_seed: Seed,
    pub rules: &'a RuleConfig,
    pub tolerance: &'a ToleranceConfig,
}

impl<'a> DetectorContext<'a> {
    pub fn new(
        submission: &'a Submission,
        replay: &'a ReplayVerdict,
        registered_seed: Seed,
        config: &'a Config,
    ) -> Self {
        Self {
            submission,
            replay,
            registered_seed,
            rules: &config.rules,
            tolerance: &config.tolerance,
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.submission.moves
    }

    pub fn heartbeats(&self) -> &[Heartbeat] {
        &self.submission.heartbeats
    }
}

/// A single rule check. `None` means "no objection"; the chain moves on to
/// the next detector.
pub trait Detector {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict>;
}

/// Fixed order from spec section 4.4: score-vs-food, speed floor, session
/// seed, pause, bot, heartbeat, then the replay tolerance check last. The
/// chain short-circuits on the first hit, so this order decides which
/// `CheatKind` a multi-violation submission gets blamed for.
pub fn default_chain() -> DetectorChain {
    DetectorChain::new(vec![
        Box::new(score_food::ScoreFoodDetector),
        Box::new(speed_floor::SpeedFloorDetector),
        Box::new(session_seed::SessionSeedDetector),
        Box::new(pause::PauseDetector),
        Box::new(bot::BotDetector),
        Box::new(heartbeat::HeartbeatDetector),
        Box::new(replay::ReplayDetector),
    ])
}
