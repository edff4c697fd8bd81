use super::{Detector, DetectorContext};
use crate::error::{CheatKind, Verdict};

/// Three independent timing sub-checks, any one of which can fire: per-pair
/// wall time against what the reported speed implies, wall clock (`time`)
/// vs. monotonic perf clock (`perf`) divergence, and a single global
/// ms-per-frame over the whole submission. Only runs once a submission is
/// established enough (score/heartbeat count) to make the statistics
/// meaningful.
pub struct HeartbeatDetector;

impl Detector for HeartbeatDetector {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    fn evaluate(&self, ctx: &DetectorContext) -> Option<Verdict> {
        let submission = ctx.submission;
        let rules = ctx.rules;
        let beats = ctx.heartbeats();

        if submission.score < rules.heartbeat_min_score || beats.len() < rules.heartbeat_min_count {
            return None;
        }

        for pair in beats.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let frame_delta = next.frame.saturating_sub(prev.frame) as f64;
            let avg_speed = (prev.speed as f64 + next.speed as f64) / 2.0;
            let expected = frame_delta * avg_speed;
            let actual = (next.time - prev.time) as f64;
            let tolerance = rules
                .heartbeat_tolerance_floor_ms
                .max(expected.abs() * rules.heartbeat_tolerance_fraction);
            if (actual - expected).abs() > tolerance {
                return Some(Verdict::cheat(
                    CheatKind::TimingManipulation,
                    format!(
                        "wall-time delta {:.0}ms between frames {} and {} does not match {:.0}ms expected at reported speed (tolerance {:.0}ms)",
                        actual, prev.frame, next.frame, expected, tolerance
                    ),
                ));
            }
        }

        for beat in beats {
            let divergence = (beat.time - beat.perf).abs() as f64;
            if divergence > rules.heartbeat_clock_divergence_ms {
                return Some(Verdict::cheat(
                    CheatKind::TimingManipulation,
                    format!(
                        "heartbeat at frame {} diverges {:.0}ms between wall clock and perf clock",
                        beat.frame, divergence
                    ),
                ));
            }
        }

        if let (Some(first), Some(last)) = (beats.first(), beats.last()) {
            let frame_delta = last.frame.saturating_sub(first.frame);
            if frame_delta > 0 {
                let ms_per_frame = (last.time - first.time) as f64 / frame_delta as f64;
                if ms_per_frame < rules.heartbeat_min_ms_per_frame || ms_per_frame > rules.heartbeat_max_ms_per_frame {
                    return Some(Verdict::cheat(
                        CheatKind::TimingManipulation,
                        format!(
                            "overall {:.1}ms/frame across the submission is outside [{:.0}, {:.0}]",
                            ms_per_frame, rules.heartbeat_min_ms_per_frame, rules.heartbeat_max_ms_per_frame
                        ),
                    ));
                }
            }
        }

        None
    }
}
