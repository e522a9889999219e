//! Compliant-alternative generation for rejected or flagged titles.
//!
//! Works token by token: classify each input token's risk, then apply a set
//! of substitution strategies (concept-cluster swaps, curated safe
//! prefixes/suffixes, wholesale reframing, phonetic divergence, periodicity
//! removal). Candidates are only offered after the orchestrator re-runs
//! them through the full verification pipeline and they come back Accept.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::clusters::ConceptClusters;
use crate::compliance::{ComplianceReport, ViolationKind};
use crate::rules::RuleCatalog;
use crate::similarity::PhoneticEncoder;
use crate::{ConflictDetail, Decision, SignalScores, SuggestionDetail, VerificationResult};

/// Conservative acceptance gate for re-scored suggestions. Applies when the
/// caller passes no gate of its own; the orchestrator runs the engine in
/// reduced mode with a lower configured value.
pub const DEFAULT_MIN_PROBABILITY: f64 = 50.0;

/// Curated prefix bank, vetted against the default rule catalogue.
pub const SAFE_PREFIXES: [&str; 15] = [
    "Horizon", "Insight", "Metro", "Prime", "National", "Civic", "Pioneer", "Pinnacle",
    "Frontier", "Apex", "Sentinel", "Beacon", "Spectrum", "Vantage", "Meridian",
];

/// Curated suffix bank, vetted against the default rule catalogue.
pub const SAFE_SUFFIXES: [&str; 15] = [
    "Chronicle", "Dispatch", "Bulletin", "Gazette", "Tribune", "Observer", "Reporter",
    "Sentinel", "Review", "Ledger", "Journal", "Monitor", "Outlook", "Digest", "Register",
];

/// Risk classification of one input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRisk {
    Safe,
    Risky,
    /// Restricted or periodicity term; must not survive into a suggestion.
    Blocked,
}

/// Which signal family caused the conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictClass {
    Lexical,
    Phonetic,
    Conceptual,
}

/// Structured cause analysis of a rejection.
#[derive(Debug, Clone)]
pub struct ConflictAnalysis {
    pub conflict_class: ConflictClass,
    pub conflicting_tokens: HashSet<String>,
    pub has_periodicity: bool,
    pub has_restricted: bool,
    pub has_combination: bool,
}

/// A generated alternative before re-scoring.
#[derive(Debug, Clone)]
pub struct CandidateSuggestion {
    pub title: String,
    pub reason: String,
}

pub struct SuggestionEngine {
    blacklist: BTreeSet<String>,
    periodicity: BTreeSet<String>,
    clusters: Arc<ConceptClusters>,
    encoder: PhoneticEncoder,
}

impl SuggestionEngine {
    pub fn new(catalog: &RuleCatalog, clusters: Arc<ConceptClusters>) -> Self {
        Self {
            blacklist: catalog.suggestion_blacklist(),
            periodicity: catalog.periodicity_terms().map(String::from).collect(),
            clusters,
            encoder: PhoneticEncoder::default(),
        }
    }

    /// What caused the rejection: shared tokens, rule flags, and the
    /// dominant conflicting signal.
    pub fn analyze_conflicts(
        &self,
        title: &str,
        conflicts: &[ConflictDetail],
        best_scores: &SignalScores,
        report: &ComplianceReport,
    ) -> ConflictAnalysis {
        let own_tokens: HashSet<String> =
            title.to_lowercase().split_whitespace().map(String::from).collect();
        let mut conflicting_tokens = HashSet::new();
        for conflict in conflicts {
            for token in conflict.title.to_lowercase().split_whitespace() {
                if own_tokens.contains(token) {
                    conflicting_tokens.insert(token.to_string());
                }
            }
        }

        let (lex, pho, sem) = (
            best_scores.lexical,
            best_scores.phonetic,
            best_scores.semantic,
        );
        let conflict_class = if lex >= pho && lex >= sem {
            ConflictClass::Lexical
        } else if pho >= lex && pho >= sem {
            ConflictClass::Phonetic
        } else {
            ConflictClass::Conceptual
        };

        ConflictAnalysis {
            conflict_class,
            conflicting_tokens,
            has_periodicity: report.has(ViolationKind::Periodicity),
            has_restricted: report.has(ViolationKind::Restricted),
            has_combination: report.has(ViolationKind::Combination),
        }
    }

    /// Label every token SAFE, RISKY, or BLOCKED.
    pub fn classify_token_risk(
        &self,
        tokens: &[&str],
        analysis: &ConflictAnalysis,
    ) -> Vec<(String, TokenRisk)> {
        tokens
            .iter()
            .map(|token| {
                let lower = token.to_lowercase();
                let risk = if self.blacklist.contains(&lower) {
                    TokenRisk::Blocked
                } else if analysis.conflicting_tokens.contains(&lower)
                    || self.clusters.has_foreign_root(&lower)
                {
                    TokenRisk::Risky
                } else {
                    TokenRisk::Safe
                };
                (token.to_string(), risk)
            })
            .collect()
    }

    /// Produce candidate titles via the substitution strategies, deduped by
    /// lowercase key and pre-filtered for hygiene.
    pub fn generate_candidates(
        &self,
        analysis: &ConflictAnalysis,
        token_risks: &[(String, TokenRisk)],
        max_candidates: usize,
    ) -> Vec<CandidateSuggestion> {
        let tokens: Vec<&str> = token_risks.iter().map(|(t, _)| t.as_str()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<CandidateSuggestion> = Vec::new();

        let add = |candidates: &mut Vec<CandidateSuggestion>,
                       seen: &mut HashSet<String>,
                       title: String,
                       reason: String| {
            let key = title.trim().to_lowercase();
            if candidates.len() >= max_candidates || seen.contains(&key) {
                return;
            }
            if !self.title_is_clean(&title) {
                return;
            }
            seen.insert(key);
            candidates.push(CandidateSuggestion {
                title: titlecase(&title),
                reason,
            });
        };

        // Concept-cluster swap of each risky or blocked token.
        for (i, (token, risk)) in token_risks.iter().enumerate() {
            if !matches!(risk, TokenRisk::Risky | TokenRisk::Blocked) {
                continue;
            }
            for alt in self.clusters.alternatives(&token.to_lowercase()).iter().take(4) {
                if !self.is_safe_word(alt) {
                    continue;
                }
                let replacement = capitalize(alt);
                let mut new_tokens = tokens.clone();
                new_tokens[i] = &replacement;
                add(
                    &mut candidates,
                    &mut seen,
                    new_tokens.join(" "),
                    format!("Replaced '{token}' with cluster alternative '{replacement}'"),
                );
            }
        }

        // Safe suffix substitution when the last token is the problem.
        if let Some((last, risk)) = token_risks.last()
            && matches!(risk, TokenRisk::Risky | TokenRisk::Blocked)
        {
            let safe_head: Vec<&str> = token_risks[..token_risks.len() - 1]
                .iter()
                .filter(|(_, r)| *r == TokenRisk::Safe)
                .map(|(t, _)| t.as_str())
                .collect();
            let base = if safe_head.is_empty() {
                tokens[0].to_string()
            } else {
                safe_head.join(" ")
            };
            for suffix in SAFE_SUFFIXES.iter().take(6) {
                add(
                    &mut candidates,
                    &mut seen,
                    format!("{base} {suffix}"),
                    format!("Replaced '{last}' with safe suffix '{suffix}'"),
                );
            }
        }

        // Safe prefix injection when the head token is risky but a safe
        // tail exists.
        if token_risks.len() > 1
            && matches!(token_risks[0].1, TokenRisk::Risky | TokenRisk::Blocked)
        {
            let safe_tail: Vec<&str> = token_risks[1..]
                .iter()
                .filter(|(_, r)| *r == TokenRisk::Safe)
                .map(|(t, _)| t.as_str())
                .collect();
            if !safe_tail.is_empty() {
                let tail = safe_tail.join(" ");
                let first = &token_risks[0].0;
                for prefix in SAFE_PREFIXES.iter().take(5) {
                    add(
                        &mut candidates,
                        &mut seen,
                        format!("{prefix} {tail}"),
                        format!("Replaced '{first}' with safe prefix '{prefix}'"),
                    );
                }
            }
        }

        // Wholesale reframe when most of the title is conflicted.
        let risky_count = token_risks
            .iter()
            .filter(|(_, r)| *r != TokenRisk::Safe)
            .count();
        if risky_count as f64 >= token_risks.len() as f64 * 0.6 {
            let safe_remaining: Vec<&str> = token_risks
                .iter()
                .filter(|(_, r)| *r == TokenRisk::Safe)
                .map(|(t, _)| t.as_str())
                .collect();
            let base = if safe_remaining.is_empty() {
                if self.is_safe_word(&tokens[0].to_lowercase()) {
                    tokens[0].to_string()
                } else {
                    String::new()
                }
            } else {
                safe_remaining.join(" ")
            };
            if !base.is_empty() {
                'reframe: for prefix in SAFE_PREFIXES.iter().take(5) {
                    for suffix in SAFE_SUFFIXES.iter().take(3) {
                        add(
                            &mut candidates,
                            &mut seen,
                            format!("{prefix} {base} {suffix}"),
                            format!("Reframed as '{prefix} {base} {suffix}' to avoid conflicts"),
                        );
                        if candidates.len() >= max_candidates {
                            break 'reframe;
                        }
                    }
                }
            }
        }

        // Phonetic divergence: keep only alternatives that sound different.
        if analysis.conflict_class == ConflictClass::Phonetic {
            for (i, (token, risk)) in token_risks.iter().enumerate() {
                if *risk != TokenRisk::Risky {
                    continue;
                }
                let token_code = self.encoder.primary(&token.to_lowercase());
                for alt in self.clusters.alternatives(&token.to_lowercase()) {
                    if self.encoder.primary(&alt) == token_code || !self.is_safe_word(&alt) {
                        continue;
                    }
                    let replacement = capitalize(&alt);
                    let mut new_tokens = tokens.clone();
                    new_tokens[i] = &replacement;
                    add(
                        &mut candidates,
                        &mut seen,
                        new_tokens.join(" "),
                        format!("Phonetically diverged: '{token}' \u{2192} '{replacement}'"),
                    );
                }
            }
        }

        // Periodicity removal, optionally with a safe suffix.
        if analysis.has_periodicity {
            let kept: Vec<&str> = tokens
                .iter()
                .filter(|t| !self.periodicity.contains(&t.to_lowercase()))
                .copied()
                .collect();
            if !kept.is_empty() {
                let base = kept.join(" ");
                add(
                    &mut candidates,
                    &mut seen,
                    base.clone(),
                    "Removed periodicity term".to_string(),
                );
                for suffix in SAFE_SUFFIXES.iter().take(4) {
                    add(
                        &mut candidates,
                        &mut seen,
                        format!("{base} {suffix}"),
                        format!("Removed periodicity term, added '{suffix}'"),
                    );
                }
            }
        }

        candidates
    }

    /// Run each candidate back through the pipeline via `verify` and keep
    /// only Accept outcomes at or above the probability gate (`None`
    /// applies [`DEFAULT_MIN_PROBABILITY`]). Survivors sort by probability
    /// descending, truncated to `max_results`.
    pub fn rescore_and_filter(
        &self,
        candidates: Vec<CandidateSuggestion>,
        verify: impl Fn(&str) -> VerificationResult,
        min_probability: Option<f64>,
        max_results: usize,
    ) -> Vec<SuggestionDetail> {
        let gate = min_probability.unwrap_or(DEFAULT_MIN_PROBABILITY);
        let mut scored: Vec<SuggestionDetail> = Vec::new();
        for candidate in candidates {
            let result = verify(&candidate.title);
            if result.decision == Decision::Accept && result.verification_probability >= gate {
                scored.push(SuggestionDetail {
                    suggested_title: candidate.title,
                    verification_probability: result.verification_probability,
                    reason: candidate.reason,
                });
                if scored.len() >= max_results {
                    break;
                }
            }
        }
        scored.sort_by(|a, b| {
            b.verification_probability
                .total_cmp(&a.verification_probability)
        });
        scored.truncate(max_results);
        scored
    }

    fn is_safe_word(&self, word: &str) -> bool {
        let w = word.trim().to_lowercase();
        w.chars().count() >= 2 && !self.blacklist.contains(&w)
    }

    /// A generated title may not contain any blacklisted word and must be a
    /// plausible title on its own.
    fn title_is_clean(&self, title: &str) -> bool {
        if title.trim().chars().count() < 3 {
            return false;
        }
        !title
            .to_lowercase()
            .split_whitespace()
            .any(|w| self.blacklist.contains(w))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Title-case words that are fully lowercase; leave stylized casing alone.
fn titlecase(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            if w.chars().any(char::is_uppercase) {
                w.to_string()
            } else {
                capitalize(w)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SuggestionEngine {
        SuggestionEngine::new(
            &RuleCatalog::default(),
            Arc::new(ConceptClusters::default()),
        )
    }

    fn analysis_with(tokens: &[&str], class: ConflictClass) -> ConflictAnalysis {
        ConflictAnalysis {
            conflict_class: class,
            conflicting_tokens: tokens.iter().map(|t| t.to_string()).collect(),
            has_periodicity: false,
            has_restricted: false,
            has_combination: false,
        }
    }

    #[test]
    fn classify_blocked_risky_safe() {
        let e = engine();
        let analysis = analysis_with(&["sunrise"], ConflictClass::Lexical);
        let risks =
            e.classify_token_risk(&["Daily", "Sunrise", "Prabhat", "Ledger"], &analysis);
        assert_eq!(risks[0].1, TokenRisk::Blocked); // periodicity term
        assert_eq!(risks[1].1, TokenRisk::Risky); // conflicting token
        assert_eq!(risks[2].1, TokenRisk::Risky); // concept-cluster member
        assert_eq!(risks[3].1, TokenRisk::Safe);
    }

    #[test]
    fn cluster_swap_generates_alternatives() {
        let e = engine();
        let analysis = analysis_with(&["dainik"], ConflictClass::Lexical);
        let risks = e.classify_token_risk(&["Dainik", "Patra"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 20);
        assert!(
            candidates
                .iter()
                .any(|c| c.title.contains("Pratidin") || c.title.contains("Rozana")),
            "{candidates:?}"
        );
        // "daily" is a cluster alternative of dainik but also a blocked term
        assert!(candidates.iter().all(|c| !c.title.to_lowercase().contains("daily")));
    }

    #[test]
    fn suffix_substitution_for_risky_tail() {
        let e = engine();
        let analysis = analysis_with(&["samachar"], ConflictClass::Lexical);
        let risks = e.classify_token_risk(&["Nagpur", "Samachar"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 20);
        assert!(
            candidates
                .iter()
                .any(|c| c.title.starts_with("Nagpur ") && !c.title.contains("Samachar"))
        );
    }

    #[test]
    fn prefix_injection_for_risky_head() {
        let e = engine();
        let analysis = analysis_with(&["sunrise"], ConflictClass::Lexical);
        let risks = e.classify_token_risk(&["Sunrise", "Ledger"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 20);
        assert!(
            candidates
                .iter()
                .any(|c| c.title.ends_with("Ledger") && !c.title.contains("Sunrise"))
        );
    }

    #[test]
    fn phonetic_divergence_filters_same_sounding() {
        let e = engine();
        let analysis = analysis_with(&["khabar"], ConflictClass::Phonetic);
        let risks = e.classify_token_risk(&["Khabar", "Patra"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 20);
        let token_code = e.encoder.primary("khabar");
        for c in &candidates {
            let head = c.title.split_whitespace().next().unwrap().to_lowercase();
            assert_ne!(e.encoder.primary(&head), token_code, "{c:?}");
        }
    }

    #[test]
    fn periodicity_removal_strategy() {
        let e = engine();
        let mut analysis = analysis_with(&[], ConflictClass::Lexical);
        analysis.has_periodicity = true;
        let risks = e.classify_token_risk(&["Weekly", "Observer"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 20);
        assert!(candidates.iter().any(|c| c.title == "Observer"));
        assert!(candidates.iter().all(|c| !c.title.to_lowercase().contains("weekly")));
    }

    #[test]
    fn no_candidate_contains_blacklisted_word() {
        let e = engine();
        let analysis = analysis_with(&["police"], ConflictClass::Lexical);
        let risks = e.classify_token_risk(&["City", "Police", "Times"], &analysis);
        for c in e.generate_candidates(&analysis, &risks, 20) {
            assert!(!c.title.to_lowercase().contains("police"), "{c:?}");
        }
    }

    #[test]
    fn candidates_deduplicated_and_capped() {
        let e = engine();
        let analysis = analysis_with(&["sunrise", "chronicle"], ConflictClass::Lexical);
        let risks = e.classify_token_risk(&["Sunrise", "Chronicle"], &analysis);
        let candidates = e.generate_candidates(&analysis, &risks, 8);
        assert!(candidates.len() <= 8);
        let mut keys: Vec<String> =
            candidates.iter().map(|c| c.title.to_lowercase()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), candidates.len());
    }

    #[test]
    fn titlecase_preserves_stylized_words() {
        assert_eq!(titlecase("nagpur iNews"), "Nagpur iNews");
        assert_eq!(titlecase("sunrise ledger"), "Sunrise Ledger");
    }

    fn stub_result(decision: Decision, probability: f64) -> VerificationResult {
        use crate::{AnalysisDetail, RiskTier, VerificationMetadata};
        VerificationResult {
            is_compliant: true,
            verification_probability: probability,
            decision,
            explanation: String::new(),
            conflicts: vec![],
            scores: SignalScores::default(),
            analysis: AnalysisDetail::default(),
            suggestions: None,
            metadata: VerificationMetadata {
                risk_tier: RiskTier::Low,
                dominant_signal: "None".to_string(),
                confidence_score: 1.0,
                structural_patterns: vec![],
                processing_time_ms: 0,
                candidates_checked: 0,
                best_match: None,
            },
        }
    }

    fn graded_verify(title: &str) -> VerificationResult {
        match title {
            "High Chance" => stub_result(Decision::Accept, 80.0),
            "Low Chance" => stub_result(Decision::Accept, 40.0),
            _ => stub_result(Decision::Reject, 95.0),
        }
    }

    fn rescore_candidates() -> Vec<CandidateSuggestion> {
        ["Low Chance", "High Chance", "Flagged Anyway"]
            .into_iter()
            .map(|t| CandidateSuggestion {
                title: t.to_string(),
                reason: "swap".to_string(),
            })
            .collect()
    }

    #[test]
    fn rescore_default_gate_is_conservative() {
        let e = engine();
        let kept = e.rescore_and_filter(rescore_candidates(), graded_verify, None, 5);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].suggested_title, "High Chance");
    }

    #[test]
    fn rescore_caller_gate_overrides_default() {
        let e = engine();
        let kept = e.rescore_and_filter(rescore_candidates(), graded_verify, Some(10.0), 5);
        assert_eq!(kept.len(), 2);
        // Sorted by probability descending
        assert_eq!(kept[0].suggested_title, "High Chance");
        assert_eq!(kept[1].suggested_title, "Low Chance");
    }

    #[test]
    fn rescore_drops_non_accept_outcomes() {
        let e = engine();
        let kept = e.rescore_and_filter(rescore_candidates(), graded_verify, Some(0.0), 5);
        assert!(kept.iter().all(|s| s.suggested_title != "Flagged Anyway"));
    }

    #[test]
    fn rescore_truncates_to_max_results() {
        let e = engine();
        let kept = e.rescore_and_filter(rescore_candidates(), graded_verify, Some(10.0), 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].suggested_title, "Low Chance");
    }
}
