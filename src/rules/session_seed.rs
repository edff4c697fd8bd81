use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// A submission must replay against the seed the server handed out at
/// `/game/start`. Any other seed means the client forged or reused one.
pub struct SessionSeedDetector;

impl Detector for SessionSeedDetector {
    fn name(&self) -> &'static str {
        "session_seed"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        if ctx.submission.seed != ctx.registered_seed {
            return Some(Verdict::cheat(
                CheatKind::InvalidSession,
                format!(
                    "submitted seed {} does not match registered seed {}",
                    ctx.submission.seed, ctx.registered_seed
                ),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::Submission;
    use crate::replay::Engine;

    fn submission(seed: u32) -> Submission {
        Submission {
            player_id: "p".into(),
            score: 0,
            speed_level: 0,
            food_eaten: 0,
            game_duration_secs: 0,
            seed,
            moves: vec![],
            heartbeats: vec![],
            total_frames: 0,
            fingerprint: "f".into(),
        }
    }

    #[test]
    fn mismatched_seed_is_flagged() {
        let submission = submission(7);
        let replay = Engine::new(Default::default()).run(7, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 99, &config);
        assert!(SessionSeedDetector.evaluate(&ctx).is_some());
    }

    #[test]
    fn matching_seed_passes() {
        let submission = submission(7);
        let replay = Engine::new(Default::default()).run(7, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 7, &config);
        assert!(SessionSeedDetector.evaluate(&ctx).is_none());
    }
}
