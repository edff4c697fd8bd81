//! Behavioral feature extraction (spec section 4.5). Turns a raw submission
//! into the fixed 12-dimensional `FeatureVector` the ML predictor consumes.
//! Every computation here must be safe against degenerate input — empty move
//! logs, single heartbeats, zero-duration games — and never hand a NaN or
//! infinity downstream.

use crate::codec::{Direction, Heartbeat, Move};
use crate::config::RuleConfig;
use crate::model::{FeatureVector, Submission};

/// Extracts the named feature vector from a submission. `rules` supplies the
/// thresholds (pause gap, burst window) shared with the rule detectors so
/// the two stages agree on what counts as a pause or a burst.
pub fn extract(submission: &Submission, rules: &RuleConfig) -> FeatureVector {
    let moves = &submission.moves;
    let beats = &submission.heartbeats;

    let move_deltas = time_deltas(moves.iter().map(|m| m.time));
    let avg_time_between_moves = mean(&move_deltas);
    let move_time_variance = variance(&move_deltas, avg_time_between_moves);

    let moves_per_food = moves.len() as f64 / submission.food_eaten.max(1) as f64;
    let direction_entropy = direction_entropy(moves);

    let heartbeat_consistency = heartbeat_consistency(beats);
    let score_rate = submission.score as f64 / submission.game_duration_secs.max(1) as f64;

    let ms_per_frame = frame_timings(beats);
    let frame_timing_deviation = std_dev(&ms_per_frame, mean(&ms_per_frame));

    let pause_gap_count = beats
        .windows(2)
        .filter(|pair| pair[1].time - pair[0].time > rules.pause_gap_ms)
        .count() as f64;

    let speed_progression = match (beats.first(), beats.last()) {
        (Some(first), Some(last)) if beats.len() > 1 => {
            (first.speed - last.speed) as f64 / submission.food_eaten.max(1) as f64
        }
        _ => 0.0,
    };

    let burst_window_ms = 50.0;
    let movement_burst_rate = if move_deltas.is_empty() {
        0.0
    } else {
        move_deltas.iter().filter(|d| **d < burst_window_ms).count() as f64 / move_deltas.len() as f64
    };

    let performance_time_drift = clock_drift(beats);

    let avg_speed_per_food = if beats.is_empty() {
        0.0
    } else {
        mean(&beats.iter().map(|b| b.speed as f64).collect::<Vec<_>>())
            / submission.food_eaten.max(1) as f64
    };

    FeatureVector([
        finite(avg_time_between_moves) as f32,
        finite(move_time_variance) as f32,
        finite(moves_per_food) as f32,
        finite(direction_entropy) as f32,
        finite(heartbeat_consistency) as f32,
        finite(score_rate) as f32,
        finite(frame_timing_deviation) as f32,
        finite(pause_gap_count) as f32,
        finite(speed_progression) as f32,
        finite(movement_burst_rate) as f32,
        finite(performance_time_drift) as f32,
        finite(avg_speed_per_food) as f32,
    ])
}

fn time_deltas(times: impl Iterator<Item = i64>) -> Vec<f64> {
    let times: Vec<i64> = times.collect();
    times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64)
        .collect()
}

fn frame_timings(beats: &[Heartbeat]) -> Vec<f64> {
    beats
        .windows(2)
        .filter_map(|pair| {
            let frame_delta = pair[1].frame.saturating_sub(pair[0].frame);
            if frame_delta == 0 {
                None
            } else {
                Some((pair[1].time - pair[0].time) as f64 / frame_delta as f64)
            }
        })
        .collect()
}

fn clock_drift(beats: &[Heartbeat]) -> f64 {
    if beats.len() < 2 {
        return 0.0;
    }
    let divergences: Vec<f64> = beats.iter().map(|b| (b.time - b.perf) as f64).collect();
    let first = divergences.first().copied().unwrap_or(0.0);
    let last = divergences.last().copied().unwrap_or(0.0);
    (last - first) / beats.len() as f64
}

/// `1 - min(1, stdev(|interval - 1000ms|) / 500)` over consecutive
/// heartbeat wall-clock intervals. A steady ~1s heartbeat cadence scores
/// near 1; erratic or drifting intervals pull it toward 0.
fn heartbeat_consistency(beats: &[Heartbeat]) -> f64 {
    if beats.len() < 2 {
        return 1.0;
    }
    let intervals = time_deltas(beats.iter().map(|b| b.time));
    let deviations: Vec<f64> = intervals.iter().map(|interval| (interval - 1000.0).abs()).collect();
    let spread = std_dev(&deviations, mean(&deviations));
    1.0 - (spread / 500.0).min(1.0)
}

fn direction_entropy(moves: &[Move]) -> f64 {
    if moves.is_empty() {
        return 0.0;
    }
    let mut counts = [0usize; 4];
    for m in moves {
        counts[direction_index(m.direction)] += 1;
    }
    let total = moves.len() as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    // normalize by log2(4) so the feature stays in [0, 1] regardless of
    // how many move slots exist.
    entropy / 2.0
}

fn direction_index(d: Direction) -> usize {
    match d {
        Direction::Up => 0,
        Direction::Right => 1,
        Direction::Down => 2,
        Direction::Left => 3,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn variance(values: &[f64], mean_value: f64) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().map(|v| (v - mean_value).powi(2)).sum::<f64>() / values.len() as f64
    }
}

fn std_dev(values: &[f64], mean_value: f64) -> f64 {
    variance(values, mean_value).sqrt()
}

fn finite(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Direction, Heartbeat, Move};
    use proptest::prelude::*;

    fn empty_submission() -> Submission {
        Submission {
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
        }
    }

    #[test]
    fn degenerate_empty_submission_never_produces_nan_or_inf() {
        let rules = RuleConfig::default();
        let features = extract(&empty_submission(), &rules);
        for value in features.as_slice() {
            assert!(value.is_finite(), "non-finite feature: {value}");
        }
    }

    #[test]
    fn single_heartbeat_never_divides_by_zero() {
        let mut submission = empty_submission();
        submission.heartbeats = vec![Heartbeat {
            time: 0,
            perf: 0,
            frame: 0,
            speed: 150,
            score: None,
        }];
        let rules = RuleConfig::default();
        let features = extract(&submission, &rules);
        for value in features.as_slice() {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn direction_entropy_is_zero_for_single_direction() {
        let mut submission = empty_submission();
        submission.moves = vec![
            Move { direction: Direction::Up, frame: 1, time: 10 },
            Move { direction: Direction::Up, frame: 2, time: 20 },
            Move { direction: Direction::Up, frame: 3, time: 30 },
        ];
        let rules = RuleConfig::default();
        let features = extract(&submission, &rules);
        assert_eq!(features.as_slice()[3], 0.0);
    }

    #[test]
    fn direction_entropy_is_positive_for_varied_directions() {
        let mut submission = empty_submission();
        submission.moves = vec![
            Move { direction: Direction::Up, frame: 1, time: 10 },
            Move { direction: Direction::Right, frame: 2, time: 20 },
            Move { direction: Direction::Down, frame: 3, time: 30 },
            Move { direction: Direction::Left, frame: 4, time: 40 },
        ];
        let rules = RuleConfig::default();
        let features = extract(&submission, &rules);
        assert!(features.as_slice()[3] > 0.0);
    }

    proptest::proptest! {
        /// No combination of degenerate timing/score/duration inputs should
        /// ever produce a NaN or infinite feature value.
        #[test]
        fn arbitrary_submissions_never_produce_nan_or_inf(
            score in any::<i32>(),
            food_eaten in any::<u32>(),
            game_duration_secs in -1_000_000_000i64..1_000_000_000,
            move_times in proptest::collection::vec(-1_000_000_000i64..1_000_000_000, 0..20),
            heartbeats in proptest::collection::vec(
                (
                    -1_000_000_000i64..1_000_000_000,
                    -1_000_000_000i64..1_000_000_000,
                    any::<u32>(),
                    -1_000_000_000i64..1_000_000_000,
                ),
                0..20,
            ),
        ) {
            let mut submission = empty_submission();
            submission.score = score;
            submission.food_eaten = food_eaten;
            submission.game_duration_secs = game_duration_secs;
            submission.moves = move_times
                .into_iter()
                .enumerate()
                .map(|(i, time)| Move {
                    direction: [Direction::Up, Direction::Right, Direction::Down, Direction::Left][i % 4],
                    frame: i as u32,
                    time,
                })
                .collect();
            submission.heartbeats = heartbeats
                .into_iter()
                .map(|(time, perf, frame, speed)| Heartbeat { time, perf, frame, speed, score: None })
                .collect();

            let rules = RuleConfig::default();
            let features = extract(&submission, &rules);
            for value in features.as_slice() {
                proptest::prop_assert!(value.is_finite(), "non-finite feature: {value}");
            }
        }
    }
}
