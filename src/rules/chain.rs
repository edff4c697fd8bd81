use super::{Detector, DetectorContext};
use crate::error::Verdict;

/// Ordered list of detectors. Evaluated front to back; the first cheat
/// verdict wins and short-circuits the rest (P7: scheduler/detector safety
/// doesn't depend on which detector ran, only on the first one that fires).
pub struct DetectorChain {
    detectors: Vec<Box<dyn Detector + Send + Sync>>,
}

impl DetectorChain {
    pub fn new(detectors: Vec<Box<dyn Detector + Send + Sync>>) -> Self {
        Self { detectors }
    }

    pub fn evaluate(&self, ctx: &DetectorContext) -> Verdict {
        for detector in &self.detectors {
            if let Some(verdict) = detector.evaluate(ctx) {
                log::debug!("detector {} fired: {:?}", detector.name(), verdict);
                return verdict;
            }
        }
        Verdict::Legit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheatKind;

    struct AlwaysCheat;
    impl Detector for AlwaysCheat {
        fn name(&self) -> &'static str {
            "always_cheat"
        }
        fn evaluate(&self, _ctx: &DetectorContext) -> Option<Verdict> {
            Some(Verdict::cheat(CheatKind::BotUsage, "test"))
        }
    }

    struct AlwaysSilent;
    impl Detector for AlwaysSilent {
        fn name(&self) -> &'static str {
            "always_silent"
        }
        fn evaluate(&self, _ctx: &DetectorContext) -> Option<Verdict> {
            None
        }
    }

    #[test]
    fn first_hit_wins() {
        let chain = DetectorChain::new(vec![Box::new(AlwaysSilent), Box::new(AlwaysCheat)]);
        let submission = crate::model::Submission {
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
        let replay = crate::replay::Engine::new(Default::default()).run(1, &[], 0);
        let config = crate::config::Config::default();
        let ctx = DetectorContext::new(&submission, &replay, 1, &config);
        assert!(chain.evaluate(&ctx).is_cheat());
    }
}
