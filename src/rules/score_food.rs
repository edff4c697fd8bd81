use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// Checks the claimed score against the one fact that never needs a replay:
/// ten points per food eaten, no more, no less. A claim of `score > 0` with
/// no moves at all can never be earned honestly either, and is rejected the
/// same way. Anything that needs the simulated replay (score/food/duration
/// tolerances) lives in `ReplayDetector` instead, which runs last.
pub struct ScoreFoodDetector;

impl Detector for ScoreFoodDetector {
    fn name(&self) -> &'static str {
        "score_food"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let submission = ctx.submission;

        if submission.score > 0 && submission.moves.is_empty() {
            return Some(Verdict::cheat(
                CheatKind::MissingMoves,
                "nonzero score submitted with no move log",
            ));
        }

        let expected_score = submission.food_eaten as i64 * 10;
        if submission.score as i64 != expected_score {
            return Some(Verdict::cheat(
                CheatKind::ScoreMismatch,
                format!(
                    "score {} does not equal 10 points per food ({} eaten, expected {})",
                    submission.score, submission.food_eaten, expected_score
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

    #[test]
    fn nonzero_score_without_moves_is_flagged() {
        let submission = Submission {
            player_id: "p".into(),
            score: 50,
            speed_level: 0,
            food_eaten: 5,
            game_duration_secs: 20,
            seed: 1,
            moves: vec![],
            heartbeats: vec![],
            total_frames: 100,
            fingerprint: "f".into(),
        };
        let replay = Engine::new(Default::default()).run(1, &[], 100);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        match ScoreFoodDetector.evaluate(&ctx) {
            Some(Verdict::Cheat { kind, .. }) => assert_eq!(kind, CheatKind::MissingMoves),
            other => panic!("expected missing_moves cheat, got {other:?}"),
        }
    }

    #[test]
    fn score_not_a_multiple_of_ten_per_food_is_flagged() {
        let submission = Submission {
            player_id: "p".into(),
            score: 47,
            speed_level: 0,
            food_eaten: 5,
            game_duration_secs: 20,
            seed: 1,
            moves: vec![crate::codec::Move { direction: crate::codec::Direction::Up, frame: 0, time: 0 }],
            heartbeats: vec![],
            total_frames: 100,
            fingerprint: "f".into(),
        };
        let replay = Engine::new(Default::default()).run(1, &[], 100);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        match ScoreFoodDetector.evaluate(&ctx) {
            Some(Verdict::Cheat { kind, .. }) => assert_eq!(kind, CheatKind::ScoreMismatch),
            other => panic!("expected score_mismatch cheat, got {other:?}"),
        }
    }

    #[test]
    fn matching_zero_score_zero_moves_passes() {
        let submission = Submission {
            player_id: "p".into(),
            score: 0,
            speed_level: 0,
            food_eaten: 0,
            game_duration_secs: 0,
            seed: 1,
            moves: vec![],
            heartbeats: vec![],
            total_frames: 0,
            fingerprint: "f".into(),
        };
        let replay = Engine::new(Default::default()).run(1, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(ScoreFoodDetector.evaluate(&ctx).is_none());
    }
}
