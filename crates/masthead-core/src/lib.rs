//! Title verification engine for publication-title registries.
//!
//! Answers one question per submitted title: is it sufficiently distinct
//! from every registered title and free of policy violations to be
//! accepted — and if not, which safer alternatives would be? The pipeline
//! runs a linguistic quality gate, canonicalization, rule compliance,
//! inverted-index candidate retrieval, multi-signal similarity scoring
//! (lexical, phonetic, conceptual), decision/risk categorization, and
//! conditional generation of compliant alternatives that are themselves
//! re-verified through the same pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod clusters;
pub mod compliance;
pub mod config;
pub mod config_file;
pub mod decision;
pub mod fusion;
pub mod highlight;
pub mod index;
pub mod normalize;
pub mod orchestrator;
pub mod patterns;
pub mod quality;
pub mod rules;
pub mod similarity;
pub mod store;
pub mod suggest;

// Re-export for convenience
pub use clusters::ConceptClusters;
pub use config::VerifierConfig;
pub use orchestrator::{VerifyOptions, Verifier};
pub use rules::RuleCatalog;
pub use store::{InMemoryTitleStore, JsonlTitleStore, TitleStore};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("repository error: {0}")]
    Repository(String),
    #[error("rule catalogue error: {0}")]
    Rules(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A registered title as stored in the repository.
///
/// `normalized_title` is the lowercase, stopword-stripped form used for
/// tokenization; `canonical_title` is the NFKC alphanumeric-only projection
/// used to defeat spacing and Unicode-mark bypasses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: u64,
    pub title: String,
    pub normalized_title: String,
    pub canonical_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl TitleRecord {
    /// Build a record from a raw title, deriving both comparison forms.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            normalized_title: normalize::normalize(&title),
            canonical_title: normalize::canonical_form(&title),
            id,
            title,
            embedding: None,
        }
    }
}

/// Final verdict for a submitted title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    Accept,
    Review,
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Accept => write!(f, "Accept"),
            Decision::Review => write!(f, "Review"),
            Decision::Reject => write!(f, "Reject"),
        }
    }
}

/// Coarse severity label attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
    Critical,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::MediumHigh => write!(f, "Medium-High"),
            RiskTier::High => write!(f, "High"),
            RiskTier::Critical => write!(f, "Critical"),
        }
    }
}

/// Which similarity family a conflict was attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConflictType {
    Lexical,
    Phonetic,
    Semantic,
    Rule,
}

/// One existing title that conflicts with the submission.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictDetail {
    pub title: String,
    pub conflict_type: ConflictType,
    pub similarity_score: f64,
    /// Bionic-highlighted markup of the submitted title; opaque at this layer.
    pub highlighted_text: String,
}

/// Per-signal similarity scores of the best-matching candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalScores {
    #[serde(rename = "lexical_similarity")]
    pub lexical: f64,
    #[serde(rename = "phonetic_similarity")]
    pub phonetic: f64,
    #[serde(rename = "semantic_similarity")]
    pub semantic: f64,
}

/// Integer-percentage score breakdown plus rule-violation flags, shaped for
/// dashboard consumption.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisDetail {
    pub lexical_similarity: u32,
    pub phonetic_similarity: u32,
    pub semantic_similarity: u32,
    pub disallowed_word: bool,
    pub periodicity_violation: bool,
    pub combination_violation: bool,
    pub prefix_suffix_violation: bool,
}

/// A compliant alternative title, already re-verified through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionDetail {
    pub suggested_title: String,
    pub verification_probability: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationMetadata {
    pub risk_tier: RiskTier,
    pub dominant_signal: String,
    pub confidence_score: f64,
    pub structural_patterns: Vec<patterns::StructuralPattern>,
    pub processing_time_ms: u64,
    pub candidates_checked: usize,
    pub best_match: Option<String>,
}

/// The full outcome of one verification run. Transient per request.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    /// Verdict of the rule-compliance engine alone; similarity rejects keep
    /// this true so probability semantics stay monotone.
    pub is_compliant: bool,
    /// Chance of acceptance in [0, 100]. Unrounded; round at display time.
    pub verification_probability: f64,
    pub decision: Decision,
    pub explanation: String,
    pub conflicts: Vec<ConflictDetail>,
    pub scores: SignalScores,
    pub analysis: AnalysisDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<SuggestionDetail>>,
    pub metadata: VerificationMetadata,
}
