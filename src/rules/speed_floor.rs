use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// The game only ever gets faster as `speed_level` climbs, so reaching a high
/// level implies a minimum amount of elapsed wall-clock time. A submission
/// that claims a high level in far less time than that is a speed hack.
pub struct SpeedFloorDetector;

impl Detector for SpeedFloorDetector {
    fn name(&self) -> &'static str {
        "speed_floor"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let submission = ctx.submission;
        let rules = ctx.rules;

        if submission.speed_level < rules.speed_floor_level {
            return None;
        }

        let minimum_duration =
            submission.speed_level as f64 * rules.speed_floor_seconds_per_level;
        if (submission.game_duration_secs as f64) < minimum_duration {
            return Some(Verdict::cheat(
                CheatKind::SpeedHack,
                format!(
                    "speed level {} requires at least {:.1}s, client claimed {}s",
                    submission.speed_level, minimum_duration, submission.game_duration_secs
                ),
            ));
        }
        None
    }
}
