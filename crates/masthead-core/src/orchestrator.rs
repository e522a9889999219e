//! Verification orchestrator.
//!
//! Sequences the full pipeline per request: quality gate, canonicalization,
//! concatenation fast path, rule compliance, token-index retrieval,
//! per-candidate multi-signal scoring, fusion, decision, highlighting, and
//! conditional suggestion generation. Every path produces a fully-formed
//! [`VerificationResult`]; policy outcomes are never errors.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use unicode_normalization::UnicodeNormalization;

use crate::clusters::ConceptClusters;
use crate::compliance::{ComplianceEngine, ComplianceReport, ViolationKind};
use crate::config::VerifierConfig;
use crate::decision;
use crate::fusion;
use crate::highlight::{ConflictMarkers, Highlighter};
use crate::index::{IndexState, SharedIndex};
use crate::normalize::{canonical_form, normalize};
use crate::patterns::{self, StructuralPattern};
use crate::quality;
use crate::rules::RuleCatalog;
use crate::similarity::{self, PhoneticEncoder};
use crate::store::TitleStore;
use crate::suggest::SuggestionEngine;
use crate::{
    AnalysisDetail, ConflictDetail, ConflictType, CoreError, Decision, RiskTier, SignalScores,
    SuggestionDetail, TitleRecord, VerificationMetadata, VerificationResult,
};

/// Per-call options for [`Verifier::verify_with_options`].
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Suppress suggestion generation. The suggestion engine re-enters the
    /// pipeline with this set, which is what breaks the recursion.
    pub skip_suggestions: bool,
    /// Cooperative cancellation: the candidate loop stops promptly and the
    /// partial result is returned.
    pub cancel: Option<CancellationToken>,
}

/// Minimum canonical length for a record to participate in the
/// concatenation fast path; shorter strings are substring noise.
const CONCAT_MIN_CANONICAL: usize = 2;

/// Canonical length above which one-sided containment counts as a
/// concatenation duplicate.
const CONCAT_CONTAINMENT_LEN: usize = 12;

/// One query projection used in the dual-pass candidate scoring.
struct QueryForms {
    raw: String,
    lower: String,
    translit: String,
    canonical: String,
}

impl QueryForms {
    fn of(text: &str) -> Self {
        Self {
            raw: text.to_string(),
            lower: nfkc_lower(text),
            translit: masthead_translit::normalize(text),
            canonical: canonical_form(text),
        }
    }
}

fn nfkc_lower(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_lowercase()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// The process-lifetime verification engine.
///
/// All shared state (index, rule tables, clusters) is read-only after
/// construction; title acceptance publishes a new index snapshot, so
/// concurrent verifications never coordinate.
pub struct Verifier {
    shared: SharedIndex,
    compliance: ComplianceEngine,
    clusters: Arc<ConceptClusters>,
    suggester: SuggestionEngine,
    highlighter: Highlighter,
    encoder: PhoneticEncoder,
    config: VerifierConfig,
}

impl Verifier {
    /// Load the title set, build the index, and compile the rule tables.
    pub fn new(
        store: &dyn TitleStore,
        catalog: RuleCatalog,
        clusters: ConceptClusters,
        config: VerifierConfig,
    ) -> Result<Self, CoreError> {
        let start = Instant::now();
        let mut titles = store.get_all_titles()?;
        if !config.use_embeddings {
            for title in &mut titles {
                title.embedding = None;
            }
        }
        let state = IndexState::build(titles);
        let clusters = Arc::new(clusters);
        let compliance = ComplianceEngine::new(catalog)?;
        let suggester = SuggestionEngine::new(compliance.catalog(), Arc::clone(&clusters));

        tracing::info!(
            indexed_titles = state.total_docs(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "verification engine ready"
        );

        Ok(Self {
            shared: SharedIndex::new(state),
            compliance,
            clusters,
            suggester,
            highlighter: Highlighter::default(),
            encoder: PhoneticEncoder::default(),
            config,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Number of titles currently indexed.
    pub fn indexed_titles(&self) -> usize {
        self.shared.snapshot().total_docs()
    }

    /// Verify a submitted title with default options.
    pub fn verify(&self, title: &str) -> VerificationResult {
        self.verify_with_options(title, &VerifyOptions::default())
    }

    /// Verify a submitted title.
    pub fn verify_with_options(&self, title: &str, opts: &VerifyOptions) -> VerificationResult {
        let result = self.run_pipeline(title, opts);
        tracing::info!(
            target: "masthead::audit",
            submitted_title = %title,
            decision = %result.decision,
            risk_tier = %result.metadata.risk_tier,
            confidence = result.metadata.confidence_score,
            is_compliant = result.is_compliant,
            "verification"
        );
        result
    }

    /// Accept a verified title into the live index and return its record.
    ///
    /// The caller (submission path) is responsible for persisting the record
    /// to the repository file.
    pub fn accept_title(&self, title: &str) -> TitleRecord {
        let record = self.shared.append_with(|state| {
            let mut record = TitleRecord::new(state.max_id() + 1, title);
            if !self.config.use_embeddings {
                record.embedding = None;
            }
            record
        });
        tracing::info!(id = record.id, title = %record.title, "title accepted into index");
        record
    }

    fn run_pipeline(&self, title: &str, opts: &VerifyOptions) -> VerificationResult {
        let started = Instant::now();

        // 1. Linguistic quality gate.
        let verdict = quality::validate(title);
        if verdict.is_low_quality {
            return quality_reject(&verdict, started);
        }

        // 2. Canonicalization.
        let normalized_query = normalize(title);
        let input_canonical = canonical_form(title);

        let snapshot = self.shared.snapshot();

        // 3. Concatenation fast path: a canonical-form overlap with any
        // existing record is a duplicate no matter how it was spaced.
        for record in snapshot.records() {
            let cand_canonical = record.canonical_title.as_str();
            if cand_canonical.len() < CONCAT_MIN_CANONICAL {
                continue;
            }
            let exact = input_canonical == cand_canonical;
            let cand_inside = cand_canonical.len() > CONCAT_CONTAINMENT_LEN
                && input_canonical.contains(cand_canonical);
            let input_inside = input_canonical.len() > CONCAT_CONTAINMENT_LEN
                && cand_canonical.contains(&input_canonical);
            if exact || cand_inside || input_inside {
                tracing::info!(
                    title = %title,
                    matched = %record.title,
                    "concatenation clash: spacing bypass matched existing title"
                );
                return concatenation_reject(title, &record.title, snapshot.total_docs(), started);
            }
        }

        // 4. Rule compliance, with the full title set for combination
        // detection.
        let report = self.compliance.check(title, snapshot.records());

        // 5. Structural patterns, for the explanation only.
        let found_patterns = patterns::detect(title);

        // 6. Candidate retrieval over both the normalized and the
        // transliterated token sets.
        let transliterated_query = masthead_translit::normalize(&normalized_query);
        let query_tokens: HashSet<&str> = normalized_query
            .split_whitespace()
            .chain(transliterated_query.split_whitespace())
            .collect();
        let candidates = snapshot.filter_by_tokens(query_tokens.iter().copied());
        tracing::debug!(count = candidates.len(), "token index retrieval");

        if candidates.is_empty() {
            return self.no_candidate_result(&report, found_patterns, started);
        }

        // 7-8. Dual-pass scoring of the top candidates. Compliance-emitted
        // cleaned titles rescore as extra query projections so a stripped
        // periodicity word cannot hide a near-duplicate.
        let mut query_forms = vec![QueryForms::of(title)];
        for cleaned in report.cleaned_titles() {
            query_forms.push(QueryForms::of(cleaned));
        }
        let word_count = title.split_whitespace().count();
        let short_title = word_count <= 2;

        let mut best_similarity = 0.0_f64;
        let mut best_match: Option<String> = None;
        let mut best_scores = SignalScores::default();
        let mut all_conflicts: Vec<ConflictDetail> = Vec::new();

        for record in candidates.iter().take(self.config.max_candidates) {
            if let Some(cancel) = &opts.cancel
                && cancel.is_cancelled()
            {
                break;
            }

            let cand_lower = nfkc_lower(&record.title);
            let cand_translit = masthead_translit::normalize(&record.title);
            let cand_canonical = canonical_form(&record.title);

            let mut scores = SignalScores::default();
            for forms in &query_forms {
                let sem = self.clusters.similarity(&forms.translit, &cand_translit);
                let lex = [
                    similarity::token_set_ratio(&forms.lower, &cand_lower),
                    similarity::token_set_ratio(&forms.translit, &cand_translit),
                    similarity::token_set_ratio(&forms.canonical, &cand_canonical),
                    similarity::ngram_jaccard(&forms.raw, &record.title, 3),
                ]
                .into_iter()
                .fold(0.0, f64::max);
                let pho = self
                    .encoder
                    .similarity(&forms.lower, &cand_lower)
                    .max(self.encoder.similarity(&forms.translit, &cand_translit));

                scores.lexical = scores.lexical.max(lex);
                scores.phonetic = scores.phonetic.max(pho);
                scores.semantic = scores.semantic.max(sem);
            }

            let contained = !cand_lower.is_empty()
                && !query_forms[0].lower.is_empty()
                && (cand_lower.contains(&query_forms[0].lower)
                    || query_forms[0].lower.contains(&cand_lower));
            let fused = fusion::fuse(&scores, contained, short_title, &self.config);

            tracing::debug!(
                candidate = %record.title,
                lex = scores.lexical,
                pho = scores.phonetic,
                sem = scores.semantic,
                fused,
                "candidate scored"
            );

            if fused > self.config.conflict_floor {
                let markers = self.conflict_markers(title, &record.title, &report);
                all_conflicts.push(ConflictDetail {
                    title: record.title.clone(),
                    conflict_type: if scores.lexical > scores.phonetic {
                        ConflictType::Lexical
                    } else {
                        ConflictType::Phonetic
                    },
                    similarity_score: round4(fused),
                    highlighted_text: self.highlighter.highlight(title, &markers),
                });
            }

            if fused > best_similarity {
                best_similarity = fused;
                best_match = Some(record.title.clone());
                best_scores = scores;
            }
        }

        // 9. Compliance soft override: a hard policy violation forces the
        // similarity into the reject band but keeps some gradation.
        if !report.is_compliant && report.penalty_score >= 1.0 {
            best_similarity = best_similarity.max(0.95);
        }

        // 10. Decision, probability, confidence.
        let confidence = fusion::confidence(&best_scores);
        let outcome = decision::categorize(best_similarity, report.is_compliant, &self.config);
        let probability = decision::probability(best_similarity, report.is_compliant, outcome.decision);
        let dominant_signal = fusion::dominant_signal(&best_scores);

        // 11. Deterministic conflict ordering: similarity first, then title.
        all_conflicts.sort_by(|a, b| {
            b.similarity_score
                .total_cmp(&a.similarity_score)
                .then_with(|| a.title.cmp(&b.title))
        });
        all_conflicts.truncate(self.config.max_conflicts);

        // 12. Explanation.
        let mut explanation = decision::build_explanation(&report, &best_scores);
        if let Some(best) = &best_match {
            explanation.push_str(&format!(
                " | Closest match: '{best}' ({:.2}%)",
                best_similarity * 100.0
            ));
        }
        if !found_patterns.is_empty() {
            let names: Vec<String> = found_patterns.iter().map(ToString::to_string).collect();
            explanation.push_str(&format!(" | Patterns: {}", names.join(", ")));
        }

        // 13. Suggestions, only for flagged outcomes and never re-entrantly.
        let suggestions = if !opts.skip_suggestions
            && matches!(outcome.decision, Decision::Reject | Decision::Review)
        {
            self.generate_suggestions(title, &all_conflicts, &best_scores, &report)
        } else {
            None
        };

        let analysis = analysis_detail(&report, &best_scores);

        VerificationResult {
            is_compliant: report.is_compliant,
            verification_probability: probability,
            decision: outcome.decision,
            explanation,
            conflicts: all_conflicts,
            scores: best_scores,
            analysis,
            suggestions,
            metadata: VerificationMetadata {
                risk_tier: outcome.risk_tier,
                dominant_signal: dominant_signal.to_string(),
                confidence_score: round4(confidence),
                structural_patterns: found_patterns,
                processing_time_ms: started.elapsed().as_millis() as u64,
                candidates_checked: candidates.len(),
                best_match,
            },
        }
    }

    fn conflict_markers(
        &self,
        title: &str,
        candidate: &str,
        report: &ComplianceReport,
    ) -> ConflictMarkers {
        let own: HashSet<String> = title
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();
        let tokens = candidate
            .to_lowercase()
            .split_whitespace()
            .filter(|t| own.contains(*t))
            .map(String::from)
            .collect();
        let phonetic = candidate
            .split_whitespace()
            .map(|w| self.encoder.primary(w))
            .filter(|code| !code.is_empty())
            .collect();
        ConflictMarkers {
            tokens,
            rules: report.violation_terms().into_iter().collect(),
            phonetic,
        }
    }

    /// Generate, re-verify, and rank alternatives. Each candidate goes back
    /// through the full pipeline and only Accept outcomes survive.
    fn generate_suggestions(
        &self,
        title: &str,
        conflicts: &[ConflictDetail],
        best_scores: &SignalScores,
        report: &ComplianceReport,
    ) -> Option<Vec<SuggestionDetail>> {
        let analysis = self
            .suggester
            .analyze_conflicts(title, conflicts, best_scores, report);
        let tokens: Vec<&str> = title.split_whitespace().collect();
        let risks = self.suggester.classify_token_risk(&tokens, &analysis);
        let raw = self.suggester.generate_candidates(
            &analysis,
            &risks,
            self.config.max_suggestion_candidates,
        );
        tracing::debug!(count = raw.len(), "suggestion candidates generated");

        let rescore_opts = VerifyOptions {
            skip_suggestions: true,
            cancel: None,
        };
        let scored = self.suggester.rescore_and_filter(
            raw,
            |candidate| self.verify_with_options(candidate, &rescore_opts),
            Some(self.config.suggestion_min_probability),
            self.config.max_suggestions,
        );
        if scored.is_empty() { None } else { Some(scored) }
    }

    fn no_candidate_result(
        &self,
        report: &ComplianceReport,
        found_patterns: Vec<StructuralPattern>,
        started: Instant,
    ) -> VerificationResult {
        let (decision, risk_tier, probability) = if report.is_compliant {
            (Decision::Accept, RiskTier::Low, 100.0)
        } else {
            (Decision::Reject, RiskTier::Critical, 0.0)
        };
        let explanation = if report.is_compliant {
            "No similar titles found.".to_string()
        } else {
            report.reasons().join("; ")
        };

        VerificationResult {
            is_compliant: report.is_compliant,
            verification_probability: probability,
            decision,
            explanation,
            conflicts: vec![],
            scores: SignalScores::default(),
            analysis: analysis_detail(report, &SignalScores::default()),
            suggestions: None,
            metadata: VerificationMetadata {
                risk_tier,
                dominant_signal: "None".to_string(),
                confidence_score: 1.0,
                structural_patterns: found_patterns,
                processing_time_ms: started.elapsed().as_millis() as u64,
                candidates_checked: 0,
                best_match: None,
            },
        }
    }
}

fn analysis_detail(report: &ComplianceReport, scores: &SignalScores) -> AnalysisDetail {
    AnalysisDetail {
        lexical_similarity: (scores.lexical * 100.0) as u32,
        phonetic_similarity: (scores.phonetic * 100.0) as u32,
        semantic_similarity: (scores.semantic * 100.0) as u32,
        disallowed_word: report.has(ViolationKind::Restricted),
        periodicity_violation: report.has(ViolationKind::Periodicity),
        combination_violation: report.has(ViolationKind::Combination),
        prefix_suffix_violation: report.has(ViolationKind::PrefixSuffix),
    }
}

fn quality_reject(verdict: &quality::QualityVerdict, started: Instant) -> VerificationResult {
    VerificationResult {
        is_compliant: false,
        verification_probability: 0.0,
        decision: Decision::Reject,
        explanation: format!(
            "Linguistic Quality Failure: {}",
            verdict.violations.join("; ")
        ),
        conflicts: vec![],
        scores: SignalScores::default(),
        analysis: AnalysisDetail::default(),
        suggestions: None,
        metadata: VerificationMetadata {
            risk_tier: verdict.risk,
            dominant_signal: "Linguistic Quality".to_string(),
            confidence_score: 1.0,
            structural_patterns: vec![],
            processing_time_ms: started.elapsed().as_millis() as u64,
            candidates_checked: 0,
            best_match: None,
        },
    }
}

fn concatenation_reject(
    title: &str,
    matched: &str,
    candidates_checked: usize,
    started: Instant,
) -> VerificationResult {
    let full = SignalScores {
        lexical: 1.0,
        phonetic: 1.0,
        semantic: 1.0,
    };
    VerificationResult {
        is_compliant: false,
        verification_probability: 0.0,
        decision: Decision::Reject,
        explanation: format!(
            "Concatenation duplicate detected. Space-agnostic string completely overlaps \
             with existing title '{matched}'."
        ),
        conflicts: vec![ConflictDetail {
            title: matched.to_string(),
            conflict_type: ConflictType::Lexical,
            similarity_score: 1.0,
            highlighted_text: format!("<span class=\"bionic-wrapper\">{title}</span>"),
        }],
        scores: full,
        analysis: AnalysisDetail {
            lexical_similarity: 100,
            phonetic_similarity: 100,
            semantic_similarity: 100,
            combination_violation: true,
            ..Default::default()
        },
        suggestions: None,
        metadata: VerificationMetadata {
            risk_tier: RiskTier::Critical,
            dominant_signal: "Space Bypass / Concatenation".to_string(),
            confidence_score: 1.0,
            structural_patterns: vec![],
            processing_time_ms: started.elapsed().as_millis() as u64,
            candidates_checked,
            best_match: Some(matched.to_string()),
        },
    }
}
