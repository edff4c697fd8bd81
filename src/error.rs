//! Boundary error types. Internal stages return these; only the Orchestrator
//! (and the HTTP handlers, one layer above it) translate them into a status
//! code and a short machine-readable `error` string. See spec section 7.

use serde::{Deserialize, Serialize};

/// The fixed set of cheat kinds a rule detector or the replay engine can
/// report. Exhaustive on purpose so callers can match without a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheatKind {
    ScoreMismatch,
    SpeedHack,
    InvalidSession,
    PauseAbuse,
    BotUsage,
    TimingManipulation,
    ReplayFail,
    MissingMoves,
}

impl CheatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheatKind::ScoreMismatch => "score_mismatch",
            CheatKind::SpeedHack => "speed_hack",
            CheatKind::InvalidSession => "invalid_session",
            CheatKind::PauseAbuse => "pause_abuse",
            CheatKind::BotUsage => "bot_usage",
            CheatKind::TimingManipulation => "timing_manipulation",
            CheatKind::ReplayFail => "replay_fail",
            CheatKind::MissingMoves => "missing_moves",
        }
    }
}

impl std::fmt::Display for CheatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict returned by a detector stage: either it has nothing to say
/// (`Legit`) or it fires with a kind and an operator-facing reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Legit,
    Cheat { kind: CheatKind, reason: String },
}

impl Verdict {
    pub fn cheat(kind: CheatKind, reason: impl Into<String>) -> Self {
        Verdict::Cheat {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_cheat(&self) -> bool {
        matches!(self, Verdict::Cheat { .. })
    }
}

/// The five error kinds from spec section 7. `Validation` and `AuthFailure`
/// never produce a cheat record; `CheatDetected` always does;
/// `InternalError` never does (don't punish players for server bugs).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("rate limited")]
    RateLimited,

    #[error("cheat detected: {kind} ({reason})")]
    CheatDetected { kind: CheatKind, reason: String },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PipelineError {
    /// The short machine-readable string shipped to the client. Never
    /// includes the detailed replay log.
    pub fn client_message(&self) -> String {
        match self {
            PipelineError::Validation(msg) => msg.clone(),
            PipelineError::AuthFailure(msg) => msg.clone(),
            PipelineError::RateLimited => "rate_limited".to_string(),
            PipelineError::CheatDetected { kind, .. } => kind.to_string(),
            PipelineError::Internal(_) => "internal_error".to_string(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::AuthFailure(_) => 401,
            PipelineError::RateLimited => 429,
            PipelineError::CheatDetected { .. } => 400,
            PipelineError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheat_kind_round_trips_through_display() {
        for kind in [
            CheatKind::ScoreMismatch,
            CheatKind::SpeedHack,
            CheatKind::InvalidSession,
            CheatKind::PauseAbuse,
            CheatKind::BotUsage,
            CheatKind::TimingManipulation,
            CheatKind::ReplayFail,
            CheatKind::MissingMoves,
        ] {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn internal_error_never_reads_as_cheat() {
        let err = PipelineError::Internal(anyhow::anyhow!("disk full"));
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.client_message(), "internal_error");
    }
}
