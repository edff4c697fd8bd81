use crate::rng::Point;

/// One food-pickup event, kept in the capped frame log for operator
/// diagnostics. Never shipped to the client.
#[derive(Debug, Clone, Copy)]
pub struct FoodEvent {
    pub frame: u32,
    pub score_after: i32,
}

/// A snapshot of simulation state at a single frame, used to build the
/// capped diagnostic log (first/last few frames + all food events).
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame: u32,
    pub head: Point,
    pub score: i32,
    pub food_eaten: u32,
}

/// The outcome of a replay run. `Ok` still needs the caller to check
/// `matches_claim` — the replay is always computed; verification is a
/// separate, explicit step so the frame log is available either way.
#[derive(Debug, Clone)]
pub struct ReplayVerdict {
    pub final_score: i32,
    pub final_food_eaten: u32,
    pub simulated_duration_secs: i64,
    pub terminated_early: bool,
    pub frame_log: Vec<FrameSnapshot>,
    pub food_events: Vec<FoodEvent>,
}

impl ReplayVerdict {
    /// Checks score/food/duration against the client's claim using the
    /// tolerances from spec section 4.3. Returns `Err(reason)` on the first
    /// mismatch found, in the order the spec lists them.
    pub fn verify(
        &self,
        claim_score: i32,
        claim_food_eaten: u32,
        claim_duration_secs: i64,
        duration_floor_secs: f64,
        duration_fraction: f64,
        score_tolerance: i32,
        score_tolerance_food_ceiling: u32,
    ) -> Result<(), String> {
        let score_tolerance = if self.final_food_eaten <= score_tolerance_food_ceiling {
            score_tolerance
        } else {
            0
        };
        if (self.final_score - claim_score).abs() > score_tolerance {
            return Err(format!(
                "Score mismatch: replay calculated {}, client sent {}",
                self.final_score, claim_score
            ));
        }
        if self.final_food_eaten != claim_food_eaten {
            return Err(format!(
                "Food mismatch: replay calculated {}, client sent {}",
                self.final_food_eaten, claim_food_eaten
            ));
        }
        let duration_tolerance =
            (duration_floor_secs).max(claim_duration_secs as f64 * duration_fraction) as i64;
        if (self.simulated_duration_secs - claim_duration_secs).abs() > duration_tolerance {
            return Err(format!(
                "Duration mismatch: replay calculated {}s, client sent {}s (tolerance {}s)",
                self.simulated_duration_secs, claim_duration_secs, duration_tolerance
            ));
        }
        Ok(())
    }
}
