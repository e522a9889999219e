//! Multi-signal similarity fusion and decision confidence.
//!
//! The fused score is max-dominant: whichever of the lexical and phonetic
//! signals is stronger carries the candidate, and the semantic signal only
//! assists — a near-duplicate must never be diluted by a low conceptual
//! score. Containment and short titles push the score upward because both
//! represent a higher absolute risk of confusion.

use crate::SignalScores;
use crate::config::VerifierConfig;

/// Fuse one candidate's signals into its final similarity.
pub fn fuse(
    scores: &SignalScores,
    contained: bool,
    short_title: bool,
    config: &VerifierConfig,
) -> f64 {
    let dominant = scores.lexical.max(scores.phonetic);

    let mut fused = if dominant < config.dominant_cutoff {
        config.dominant_weight * dominant + config.semantic_weight * scores.semantic
    } else {
        dominant
    };

    if contained {
        fused = (fused + config.containment_boost).min(1.0);
    }
    if short_title {
        fused = (fused * config.short_title_factor).min(1.0);
    }
    fused
}

/// Confidence in the overall decision from cross-signal agreement.
///
/// When every signal is high the verdict is safe regardless of spread;
/// otherwise confidence is the agreement `1 - (max - min)`.
pub fn confidence(scores: &SignalScores) -> f64 {
    let vals = [scores.lexical, scores.phonetic, scores.semantic];
    let avg = vals.iter().sum::<f64>() / vals.len() as f64;
    if avg > 0.8 {
        return 0.95;
    }
    let max = vals.iter().fold(f64::MIN, |a, &b| a.max(b));
    let min = vals.iter().fold(f64::MAX, |a, &b| a.min(b));
    (1.0 - (max - min)).clamp(0.0, 1.0)
}

/// Human-readable name of the strongest signal.
pub fn dominant_signal(scores: &SignalScores) -> &'static str {
    let max = scores.lexical.max(scores.phonetic).max(scores.semantic);
    if max <= 0.0 {
        "None"
    } else if scores.lexical >= max {
        "Lexical Overlap"
    } else if scores.phonetic >= max {
        "Phonetic Similarity"
    } else {
        "Conceptual Similarity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(lexical: f64, phonetic: f64, semantic: f64) -> SignalScores {
        SignalScores {
            lexical,
            phonetic,
            semantic,
        }
    }

    fn config() -> VerifierConfig {
        VerifierConfig::default()
    }

    #[test]
    fn semantic_assists_below_cutoff() {
        let fused = fuse(&scores(0.5, 0.4, 1.0), false, false, &config());
        assert!((fused - (0.7 * 0.5 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn semantic_cannot_dilute_near_duplicate() {
        let fused = fuse(&scores(0.97, 0.2, 0.0), false, false, &config());
        assert!((fused - 0.97).abs() < 1e-9);
    }

    #[test]
    fn containment_boost_applies_and_caps() {
        let boosted = fuse(&scores(0.5, 0.0, 0.0), true, false, &config());
        assert!((boosted - 0.45).abs() < 1e-9);

        let capped = fuse(&scores(0.99, 0.0, 0.0), true, false, &config());
        assert!((capped - 1.0).abs() < 1e-9);
    }

    #[test]
    fn short_title_amplification() {
        let plain = fuse(&scores(0.7, 0.0, 0.0), false, false, &config());
        let short = fuse(&scores(0.7, 0.0, 0.0), false, true, &config());
        assert!((short - plain * 1.03).abs() < 1e-9);
    }

    #[test]
    fn confidence_high_when_all_signals_high() {
        assert_eq!(confidence(&scores(0.9, 0.85, 0.95)), 0.95);
    }

    #[test]
    fn confidence_tracks_agreement() {
        let c = confidence(&scores(0.6, 0.55, 0.5));
        assert!((c - 0.9).abs() < 1e-9);
        assert!(confidence(&scores(1.0, 0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn dominant_signal_names() {
        assert_eq!(dominant_signal(&scores(0.9, 0.5, 0.1)), "Lexical Overlap");
        assert_eq!(dominant_signal(&scores(0.2, 0.8, 0.1)), "Phonetic Similarity");
        assert_eq!(
            dominant_signal(&scores(0.2, 0.3, 1.0)),
            "Conceptual Similarity"
        );
        assert_eq!(dominant_signal(&scores(0.0, 0.0, 0.0)), "None");
    }
}
