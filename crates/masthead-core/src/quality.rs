//! Linguistic quality gate: the first tier of the pipeline.
//!
//! Blocks gibberish, keyboard mashing, numeric noise, and symbol floods
//! before any similarity work runs. Multi-script aware: Devanagari and Oriya
//! titles that survive the hard sanity checks are admitted outright, while
//! Latin titles go through a soft linguistic-confidence score built from
//! root-word detection, vowel phonotactics, and entropy.

use std::collections::HashMap;
use std::collections::HashSet;

use masthead_translit::{Script, detect_script};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::RiskTier;

/// English publication-vocabulary roots.
static ENGLISH_ROOTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "news", "times", "herald", "chronicle", "express", "daily", "morning", "evening",
        "today", "journal", "the", "india", "observer", "standard", "tribune", "national",
        "global", "citizen", "mirror", "post", "mail", "bulletin", "gazette", "weekly",
        "monthly", "reporter", "press", "media", "insight", "review", "world", "state", "city",
        "local", "region",
    ]
    .into_iter()
    .collect()
});

/// Transliterated Hindi roots.
static HINDI_ROOTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "samachar", "bharat", "dainik", "nav", "pratidin", "sandhya", "aaj", "lok", "rajya",
        "jan", "dhwani", "pratidhwani", "hindustan", "nagar", "khabar", "prabhat", "patrika",
    ]
    .into_iter()
    .collect()
});

/// Transliterated Odia roots.
static ODIA_ROOTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["sambad", "samaja", "odisha", "khabar", "barta", "pratidin", "sakal"]
        .into_iter()
        .collect()
});

/// Anything that is not a letter, mark, number, or whitespace.
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]").unwrap());

/// Outcome of the quality gate.
#[derive(Debug, Clone)]
pub struct QualityVerdict {
    pub is_low_quality: bool,
    pub violations: Vec<String>,
    pub risk: RiskTier,
}

impl QualityVerdict {
    fn pass() -> Self {
        Self {
            is_low_quality: false,
            violations: vec![],
            risk: RiskTier::Low,
        }
    }

    fn fail(violations: Vec<String>, risk: RiskTier) -> Self {
        Self {
            is_low_quality: true,
            violations,
            risk,
        }
    }
}

/// Shannon entropy over the character distribution of the lowercased text.
pub fn shannon_entropy(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let lowered = text.to_lowercase();
    let total = lowered.chars().count() as f64;
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in lowered.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    -counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            p * p.log2()
        })
        .sum::<f64>()
}

/// Validate the linguistic quality of a submitted title.
pub fn validate(title: &str) -> QualityVerdict {
    let clean = title.trim();
    let char_count = clean.chars().count();

    // Hard garbage checks, language-agnostic.

    let letters = clean.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 3 && char_count <= 3 {
        return QualityVerdict::fail(
            vec!["Too few alphabetic characters (min 3 required).".into()],
            RiskTier::Critical,
        );
    }

    let digits = clean.chars().filter(|c| c.is_ascii_digit()).count();
    if char_count > 0 && digits as f64 / char_count as f64 > 0.5 {
        return QualityVerdict::fail(
            vec![format!(
                "Excessive numeric content (Ratio: {:.2}).",
                digits as f64 / char_count as f64
            )],
            RiskTier::Critical,
        );
    }

    let entropy = shannon_entropy(clean);
    if entropy > 4.5 && char_count > 8 {
        return QualityVerdict::fail(
            vec![format!(
                "High entropy detected (Extreme Randomness: {entropy:.2})."
            )],
            RiskTier::High,
        );
    }

    let symbols = SYMBOL_RE.find_iter(clean).count();
    if char_count > 0 && symbols as f64 / char_count as f64 > 0.3 {
        return QualityVerdict::fail(
            vec!["Excessive non-alphanumeric characters.".into()],
            RiskTier::High,
        );
    }

    // Devanagari or Oriya text that survived the sanity checks strongly
    // indicates genuine linguistic intent.
    let script = detect_script(clean);
    if matches!(script, Script::Devanagari | Script::Oriya) {
        return QualityVerdict::pass();
    }

    // Latin / transliterated soft scoring model.
    let mut violations = Vec::new();
    let mut score = 0.0;
    let lowered = clean.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    // Repetitive-spam catch: "asdasd" must not reach the soft score.
    let stripped: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();
    let stripped_len = stripped.chars().count();
    let distinct = stripped.chars().collect::<HashSet<_>>().len();
    if stripped_len >= 5 && distinct as f64 / stripped_len as f64 <= 0.5 {
        return QualityVerdict::fail(
            vec!["Low character variety detected (repetitive pattern).".into()],
            RiskTier::Medium,
        );
    }

    let has_root = tokens.iter().any(|t| {
        ENGLISH_ROOTS.contains(t) || HINDI_ROOTS.contains(t) || ODIA_ROOTS.contains(t)
    });
    if has_root {
        score += 0.4;
    }

    if script == Script::Latin {
        let alpha: Vec<char> = clean
            .chars()
            .filter(|c| c.is_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if alpha.is_empty() {
            violations
                .push("No Latin alphabetic characters found despite Latin script detection.".into());
        } else {
            let vowels = alpha.iter().filter(|c| "aeiou".contains(**c)).count();
            let v_ratio = vowels as f64 / alpha.len() as f64;
            if v_ratio >= 0.20 {
                score += 0.3;
            } else {
                violations.push(format!("Unnatural vowel distribution (Ratio: {v_ratio:.2})."));
            }
        }
    }

    if entropy <= 4.2 {
        score += 0.2;
    }

    if score >= 0.5 {
        return QualityVerdict::pass();
    }

    violations.push(format!(
        "Failed Linguistic Confidence Threshold (Score: {score:.2})."
    ));
    let risk = if score <= 0.2 {
        RiskTier::High
    } else {
        RiskTier::Medium
    };
    QualityVerdict::fail(violations, risk)
}
