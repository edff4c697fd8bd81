use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// A paused game should show a large gap in heartbeat wall-clock time with no
/// corresponding frame advance. A gap where frames kept moving means the
/// client kept simulating while claiming to be paused, which lets it dodge
/// the duration/speed checks that apply to active play.
pub struct PauseDetector;

impl Detector for PauseDetector {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let beats = ctx.heartbeats();
        for pair in beats.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let time_gap = next.time - prev.time;
            if time_gap > ctx.rules.pause_gap_ms && next.frame > prev.frame {
                return Some(Verdict::cheat(
                    CheatKind::PauseAbuse,
                    format!(
                        "frames advanced from {} to {} during a {}ms gap reported as paused",
                        prev.frame, next.frame, time_gap
                    ),
                ));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Heartbeat;
    use crate::config::Config;
    use crate::model::Submission;
    use crate::replay::Engine;

    fn submission(heartbeats: Vec<Heartbeat>) -> Submission {
        Submission {
            player_id: "p".into(),
            score: 0,
            speed_level: 0,
            food_eaten: 0,
            game_duration_secs: 0,
            seed: 1,
            moves: vec![],
            heartbeats,
            total_frames: 0,
            fingerprint: "f".into(),
        }
    }

    #[test]
    fn genuine_pause_with_no_frame_advance_passes() {
        let beats = vec![
            Heartbeat { time: 0, perf: 0, frame: 10, speed: 150, score: None },
            Heartbeat { time: 20_000, perf: 20_000, frame: 10, speed: 150, score: None },
        ];
        let submission = submission(beats);
        let replay = Engine::new(Default::default()).run(1, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(PauseDetector.evaluate(&ctx).is_none());
    }

    #[test]
    fn frames_advancing_during_reported_pause_is_flagged() {
        let beats = vec![
            Heartbeat { time: 0, perf: 0, frame: 10, speed: 150, score: None },
            Heartbeat { time: 20_000, perf: 20_000, frame: 200, speed: 150, score: None },
        ];
        let submission = submission(beats);
        let replay = Engine::new(Default::default()).run(1, &[], 0);
        let config = Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(PauseDetector.evaluate(&ctx).is_some());
    }
}
