//! Edge-case arbiter (spec section 4.7): reconciles the rule chain's verdict
//! with the ML predictor's probability and decides which disagreements are
//! worth persisting for the next training run.

use crate::error::Verdict;
use crate::ml::MlSignal;
use crate::model::{EdgeCase, EdgeType, FeatureVector};

/// Classifies a (rule verdict, ML signal) pair into one of the four edge
/// types, or `None` when the two agree and there's nothing to flag.
pub fn classify(
    rule_verdict: &Verdict,
    ml_signal: MlSignal,
) -> Option<EdgeType> {
    let rule_says_cheat = rule_verdict.is_cheat();
    match (rule_says_cheat, ml_signal) {
        (true, MlSignal::LikelyLegit) => Some(EdgeType::RulesPositiveMlNegative),
        (false, MlSignal::LikelyCheat) => Some(EdgeType::RulesNegativeMlPositive),
        (true, MlSignal::Uncertain) => Some(EdgeType::MlUncertainRulesPositive),
        (false, MlSignal::Uncertain) => Some(EdgeType::MlUncertainRulesNegative),
        _ => None,
    }
}

/// Builds the persisted `EdgeCase` record for a disagreement. Whether it
/// should actually flag the submission for operator review (as opposed to
/// just logging it for training) is the rules-positive cases: an ML model
/// that disagrees with a confirmed rule violation is never grounds to
/// override the rule chain.
pub fn build(
    player_id: String,
    score: i32,
    rule_verdict: &Verdict,
    ml_probability: f32,
    edge_type: EdgeType,
    features: &FeatureVector,
    timestamp_millis: i64,
) -> EdgeCase {
    let should_flag = matches!(
        edge_type,
        EdgeType::RulesNegativeMlPositive | EdgeType::MlUncertainRulesNegative
    );
    EdgeCase {
        player_id,
        score,
        rule_verdict_is_cheat: rule_verdict.is_cheat(),
        ml_probability,
        edge_type,
        features: *features.as_slice().first_chunk().expect("fixed-size feature vector"),
        should_flag,
        timestamp_millis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CheatKind, Verdict};
    use proptest::prelude::*;

    #[test]
    fn agreement_on_legit_produces_no_edge_case() {
        assert_eq!(classify(&Verdict::Legit, MlSignal::LikelyLegit), None);
    }

    #[test]
    fn agreement_on_cheat_produces_no_edge_case() {
        let verdict = Verdict::cheat(CheatKind::BotUsage, "test");
        assert_eq!(classify(&verdict, MlSignal::LikelyCheat), None);
    }

    #[test]
    fn rules_negative_ml_positive_is_flagged() {
        let edge = classify(&Verdict::Legit, MlSignal::LikelyCheat);
        assert_eq!(edge, Some(EdgeType::RulesNegativeMlPositive));
    }

    #[test]
    fn rules_positive_ml_negative_never_overrides_the_rule() {
        let verdict = Verdict::cheat(CheatKind::BotUsage, "test");
        let edge_type = classify(&verdict, MlSignal::LikelyLegit).unwrap();
        let case = build(
            "p".into(),
            100,
            &verdict,
            0.1,
            edge_type,
            &FeatureVector::zero(),
            0,
        );
        assert!(!case.should_flag);
        assert!(case.rule_verdict_is_cheat);
    }

    proptest::proptest! {
        /// Whatever the submitted score or ML probability, a rule-confirmed
        /// cheat verdict is never turned into `should_flag = false`-as-override;
        /// the arbiter only ever adds a training signal on top of it (P3).
        #[test]
        fn rule_cheat_verdict_is_never_overridden_by_ml_disagreement(
            score in any::<i32>(),
            ml_probability in 0f32..=1f32,
        ) {
            let verdict = Verdict::cheat(CheatKind::BotUsage, "test");
            for ml_signal in [MlSignal::LikelyLegit, MlSignal::LikelyCheat, MlSignal::Uncertain] {
                if let Some(edge_type) = classify(&verdict, ml_signal) {
                    let case = build("p".into(), score, &verdict, ml_probability, edge_type, &FeatureVector::zero(), 0);
                    proptest::prop_assert!(case.rule_verdict_is_cheat);
                    proptest::prop_assert!(!matches!(edge_type, EdgeType::RulesNegativeMlPositive));
                }
            }
        }
    }
}
