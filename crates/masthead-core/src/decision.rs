//! Decision bands, probability gradation, and explanation assembly.
//!
//! Policy violations always reject; otherwise the fused best similarity is
//! banded against the configured thresholds. Probability is a smooth
//! gradation rather than a hard zero, so the output spectrum stays
//! continuous and reviewers can still rank rejected submissions.

use crate::compliance::ComplianceReport;
use crate::config::VerifierConfig;
use crate::{Decision, RiskTier, SignalScores};

/// A categorized decision with its severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub risk_tier: RiskTier,
    pub reason: &'static str,
}

/// Band the fused similarity into Accept / Review / Reject.
pub fn categorize(best_similarity: f64, is_compliant: bool, config: &VerifierConfig) -> DecisionOutcome {
    if !is_compliant {
        return DecisionOutcome {
            decision: Decision::Reject,
            risk_tier: RiskTier::Critical,
            reason: "Policy Violation",
        };
    }
    if best_similarity >= config.reject_threshold {
        return DecisionOutcome {
            decision: Decision::Reject,
            risk_tier: RiskTier::High,
            reason: "High Similarity Conflict",
        };
    }
    if best_similarity >= config.review_threshold {
        let risk_tier = if best_similarity > 0.75 {
            RiskTier::High
        } else {
            RiskTier::MediumHigh
        };
        return DecisionOutcome {
            decision: Decision::Review,
            risk_tier,
            reason: "Potential Overlap - Manual Review Required",
        };
    }
    DecisionOutcome {
        decision: Decision::Accept,
        risk_tier: RiskTier::Low,
        reason: "Safe",
    }
}

/// Verification probability in `[0, 100]` with scaled penalties per band.
///
/// Never rounds; rounding belongs to the presentation layer.
pub fn probability(best_similarity: f64, is_compliant: bool, decision: Decision) -> f64 {
    let base = 100.0 * (1.0 - best_similarity);
    let prob = if !is_compliant {
        base.min(5.0)
    } else {
        match decision {
            Decision::Reject => base * 0.5,
            Decision::Review => base * 0.75,
            Decision::Accept => base,
        }
    };
    prob.clamp(0.0, 100.0)
}

/// Assemble the human-readable explanation line.
pub fn build_explanation(
    report: &ComplianceReport,
    scores: &SignalScores,
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if !report.is_compliant {
        reasons.extend(report.reasons().iter().map(|r| r.to_string()));
    }
    if scores.lexical > 0.8 {
        reasons.push("High lexical overlap detected with existing titles.".into());
    }
    if scores.phonetic > 0.9 {
        reasons.push("Phonetically identical or very similar to an existing title.".into());
    }
    if reasons.is_empty() {
        reasons.push("Title passed all initial automated checks.".into());
    }

    reasons.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceEngine;
    use crate::rules::RuleCatalog;

    fn config() -> VerifierConfig {
        VerifierConfig::default()
    }

    #[test]
    fn non_compliant_always_rejects_critical() {
        let out = categorize(0.1, false, &config());
        assert_eq!(out.decision, Decision::Reject);
        assert_eq!(out.risk_tier, RiskTier::Critical);
    }

    #[test]
    fn bands_at_default_thresholds() {
        assert_eq!(categorize(0.9, true, &config()).decision, Decision::Reject);
        assert_eq!(categorize(0.85, true, &config()).decision, Decision::Reject);
        assert_eq!(categorize(0.7, true, &config()).decision, Decision::Review);
        assert_eq!(categorize(0.65, true, &config()).decision, Decision::Review);
        assert_eq!(categorize(0.6, true, &config()).decision, Decision::Accept);
    }

    #[test]
    fn review_band_splits_risk_at_075() {
        assert_eq!(categorize(0.8, true, &config()).risk_tier, RiskTier::High);
        assert_eq!(
            categorize(0.7, true, &config()).risk_tier,
            RiskTier::MediumHigh
        );
    }

    #[test]
    fn probability_gradation() {
        // Accept keeps full probability
        assert!((probability(0.3, true, Decision::Accept) - 70.0).abs() < 1e-9);
        // Review scales by 0.75
        assert!((probability(0.7, true, Decision::Review) - 22.5).abs() < 1e-9);
        // Reject scales by 0.5
        assert!((probability(0.9, true, Decision::Reject) - 5.0).abs() < 1e-9);
        // Non-compliant caps at 5
        assert!((probability(0.2, false, Decision::Reject) - 5.0).abs() < 1e-9);
        assert!((probability(0.97, false, Decision::Reject) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn probability_stays_in_range() {
        for best in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for compliant in [true, false] {
                for decision in [Decision::Accept, Decision::Review, Decision::Reject] {
                    let p = probability(best, compliant, decision);
                    assert!((0.0..=100.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn explanation_mentions_violations_and_thresholds() {
        let engine = ComplianceEngine::new(RuleCatalog::default()).unwrap();
        let report = engine.check("Daily Police Bulletin", &[]);
        let text = build_explanation(
            &report,
            &SignalScores {
                lexical: 0.95,
                phonetic: 0.97,
                semantic: 0.0,
            },
        );
        assert!(text.contains("restricted term"));
        assert!(text.contains("lexical overlap"));
        assert!(text.contains("Phonetically identical"));
    }

    #[test]
    fn explanation_fallback_when_clean() {
        let engine = ComplianceEngine::new(RuleCatalog::default()).unwrap();
        let report = engine.check("Pratidhwani", &[]);
        let text = build_explanation(&report, &SignalScores::default());
        assert_eq!(text, "Title passed all initial automated checks.");
    }
}
