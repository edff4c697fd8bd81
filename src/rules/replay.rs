use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// Rule (g), last in the chain: re-runs the replay engine's verdict against
/// the client's claim. Everything earlier in the chain can be checked from
/// the submission alone; this is the one detector that needs the simulated
/// game to have actually been re-played frame by frame.
pub struct ReplayDetector;

impl Detector for ReplayDetector {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let submission = ctx.submission;

        if ctx.replay.terminated_early && submission.total_frames > 0 {
            let last_simulated = ctx.replay.frame_log.last().map(|f| f.frame).unwrap_or(0);
            if (last_simulated as i64) < submission.total_frames as i64 {
                return Some(Verdict::cheat(
                    CheatKind::ReplayFail,
                    format!(
                        "replay collided at frame {}, client claimed {} total frames",
                        last_simulated, submission.total_frames
                    ),
                ));
            }
        }

        if let Err(reason) = ctx.replay.verify(
            submission.score,
            submission.food_eaten,
            submission.game_duration_secs,
            ctx.tolerance.duration_floor_secs,
            ctx.tolerance.duration_fraction,
            ctx.tolerance.score_tolerance,
            ctx.tolerance.score_tolerance_food_ceiling,
        ) {
            return Some(Verdict::cheat(CheatKind::ReplayFail, reason));
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

    fn submission(score: i32, food_eaten: u32, duration: i64) -> Submission {
        Submission {
            player_id: "p".into(),
            score,
            speed_level: 0,
            food_eaten,
            game_duration_secs: duration,
            seed: 1,
            moves: vec![],
            heartbeats: vec![],
            total_frames: 0,
            fingerprint: "f".into(),
        }
    }

    #[test]
    fn matching_empty_replay_passes() {
        let submission = submission(0, 0, 0);
        let replay = Engine::new(Default::default()).run(1, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(ReplayDetector.evaluate(&ctx).is_none());
    }

    #[test]
    fn inflated_duration_claim_is_flagged() {
        let submission = submission(0, 0, 100_000);
        let replay = Engine::new(Default::default()).run(1, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        match ReplayDetector.evaluate(&ctx) {
            Some(Verdict::Cheat { kind, .. }) => assert_eq!(kind, CheatKind::ReplayFail),
            other => panic!("expected replay_fail cheat, got {other:?}"),
        }
    }
}
