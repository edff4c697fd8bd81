use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// High-scoring runs that use implausibly few moves per food pickup look
/// like a pathing bot rather than a human player navigating by hand.
pub struct BotDetector;

impl Detector for BotDetector {
    fn name(&self) -> &'static str {
        "bot"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let submission = ctx.submission;
        if submission.score < ctx.rules.bot_score_floor || submission.food_eaten == 0 {
            return None;
        }
        let moves_per_food = submission.moves.len() as f64 / submission.food_eaten as f64;
        if moves_per_food <= ctx.rules.bot_moves_per_food {
            return Some(Verdict::cheat(
                CheatKind::BotUsage,
                format!(
                    "{:.2} moves per food at score {} is below the human floor of {:.2}",
                    moves_per_food, submission.score, ctx.rules.bot_moves_per_food
                ),
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Direction, Move};
    use crate::config::Config;
    use crate::model::Submission;
    use crate::replay::Engine;

    fn submission(score: i32, food_eaten: u32, move_count: usize) -> Submission {
        Submission {
            player_id: "p".into(),
            score,
            speed_level: 0,
            food_eaten,
            game_duration_secs: 100,
            seed: 1,
            moves: (0..move_count)
                .map(|i| Move { direction: Direction::Up, frame: i as u32, time: i as i64 })
                .collect(),
            heartbeats: vec![],
            total_frames: 1000,
            fingerprint: "f".into(),
        }
    }

    #[test]
    fn suspiciously_efficient_high_score_is_flagged() {
        let submission = submission(2000, 50, 20);
        let replay = Engine::new(Default::default()).run(1, &[], 1000);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(BotDetector.evaluate(&ctx).is_some());
    }

    #[test]
    fn ordinary_efficiency_passes() {
        let submission = submission(2000, 50, 500);
        let replay = Engine::new(Default::default()).run(1, &[], 1000);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(BotDetector.evaluate(&ctx).is_none());
    }

    #[test]
    fn low_score_never_flagged() {
        let submission = submission(50, 2, 1);
        let replay = Engine::new(Default::default()).run(1, &[], 1000);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(BotDetector.evaluate(&ctx).is_none());
    }
}
