//! Typed, env-overridable tunables. One field per constant in spec section 8.
//!
//! Every value reads `SERPENTWATCH_<FIELD>` at startup and falls back to the
//! spec's default. Parsed once in `Config::from_env` and passed down rather
//! than read from the environment at call sites.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub grid: u32,
    pub initial_speed_ms: i64,
    pub speed_increase_ms: i64,
    pub min_speed_ms: i64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            grid: 30,
            initial_speed_ms: 150,
            speed_increase_ms: 3,
            min_speed_ms: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToleranceConfig {
    /// duration tolerance = max(duration_floor_secs, duration_fraction * submitted_secs)
    pub duration_floor_secs: f64,
    pub duration_fraction: f64,
    /// score tolerance only applies when food_eaten <= score_tolerance_food_ceiling
    pub score_tolerance: i32,
    pub score_tolerance_food_ceiling: u32,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            duration_floor_secs: 10.0,
            duration_fraction: 0.20,
            score_tolerance: 20,
            score_tolerance_food_ceiling: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub pause_gap_ms: i64,
    pub bot_score_floor: i32,
    pub bot_moves_per_food: f64,
    pub speed_floor_level: i32,
    pub speed_floor_seconds_per_level: f64,
    pub heartbeat_min_score: i32,
    pub heartbeat_min_count: usize,
    pub heartbeat_tolerance_floor_ms: f64,
    pub heartbeat_tolerance_fraction: f64,
    pub heartbeat_clock_divergence_ms: f64,
    pub heartbeat_min_ms_per_frame: f64,
    pub heartbeat_max_ms_per_frame: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            pause_gap_ms: 10_000,
            bot_score_floor: 1000,
            bot_moves_per_food: 4.0,
            speed_floor_level: 5,
            speed_floor_seconds_per_level: 1.5,
            heartbeat_min_score: 100,
            heartbeat_min_count: 2,
            heartbeat_tolerance_floor_ms: 200.0,
            heartbeat_tolerance_fraction: 0.30,
            heartbeat_clock_divergence_ms: 5_000.0,
            heartbeat_min_ms_per_frame: 40.0,
            heartbeat_max_ms_per_frame: 200.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MlConfig {
    pub high_threshold: f32,
    pub low_threshold: f32,
    pub min_score_for_inference: i32,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.7,
            low_threshold: 0.3,
            min_score_for_inference: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub scheduler_period: Duration,
    pub scheduler_cooldown: Duration,
    pub edge_case_threshold: usize,
    pub min_samples_before_synthetic: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub activation_f1_tolerance: f32,
    pub activation_accuracy_tolerance: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            scheduler_period: Duration::from_secs(30 * 60),
            scheduler_cooldown: Duration::from_secs(2 * 60 * 60),
            edge_case_threshold: 10,
            min_samples_before_synthetic: 100,
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.001,
            activation_f1_tolerance: 0.02,
            activation_accuracy_tolerance: 0.02,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_events: usize,
    pub window: Duration,
    pub gc_age: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_events: 10,
            window: Duration::from_secs(60),
            gc_age: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PayloadConfig {
    pub max_total_frames: u32,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_total_frames: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub replay: ReplayConfig,
    pub tolerance: ToleranceConfig,
    pub rules: RuleConfig,
    pub ml: MlConfig,
    pub training: TrainingConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub payload: PayloadConfig,
    pub persistence_root: String,
    pub bind_addr: String,
}

impl Config {
    /// Load defaults, then apply `SERPENTWATCH_*` environment overrides for
    /// the handful of values operators most commonly tune.
    pub fn from_env() -> Self {
        let mut cfg = Self {
            persistence_root: "data".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            ..Self::default()
        };
        if let Ok(v) = std::env::var("SERPENTWATCH_PERSISTENCE_ROOT") {
            cfg.persistence_root = v;
        }
        if let Ok(v) = std::env::var("SERPENTWATCH_BIND_ADDR") {
            cfg.bind_addr = v;
        }
        if let Ok(v) = std::env::var("SERPENTWATCH_EDGE_CASE_THRESHOLD") {
            if let Ok(n) = v.parse() {
                cfg.training.edge_case_threshold = n;
            }
        }
        if let Ok(v) = std::env::var("SERPENTWATCH_RATE_LIMIT_MAX_EVENTS") {
            if let Ok(n) = v.parse() {
                cfg.rate_limit.max_events = n;
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.replay.grid, 30);
        assert_eq!(cfg.replay.initial_speed_ms, 150);
        assert_eq!(cfg.replay.min_speed_ms, 50);
        assert_eq!(cfg.ml.high_threshold, 0.7);
        assert_eq!(cfg.ml.low_threshold, 0.3);
        assert_eq!(cfg.training.edge_case_threshold, 10);
    }

    #[test]
    fn env_override_applies() {
        unsafe {
            std::env::set_var("SERPENTWATCH_EDGE_CASE_THRESHOLD", "42");
        }
        let cfg = Config::from_env();
        assert_eq!(cfg.training.edge_case_threshold, 42);
        unsafe {
            std::env::remove_var("SERPENTWATCH_EDGE_CASE_THRESHOLD");
        }
    }
}
