//! Verifier policy knobs.
//!
//! Thresholds and fusion weights are policy choices of the registry, not
//! algorithm constants, so every one of them lives here with its documented
//! default. An optional TOML overlay (see [`crate::config_file`]) and a
//! single environment toggle adjust them at startup.

use crate::config_file::ConfigFile;

/// Environment variable suppressing the optional embedding subsystem.
/// When set (to anything but `0`/`false`), stored embedding vectors are
/// dropped at load time and the semantic signal relies on concept clusters
/// alone.
pub const DISABLE_EMBEDDINGS_ENV: &str = "MASTHEAD_DISABLE_EMBEDDINGS";

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Fused similarity at or above which a compliant title is rejected.
    pub reject_threshold: f64,
    /// Fused similarity at or above which a title needs manual review.
    pub review_threshold: f64,
    /// Weight of the dominant surface signal in the fusion blend.
    pub dominant_weight: f64,
    /// Weight of the conceptual signal in the fusion blend.
    pub semantic_weight: f64,
    /// Dominant score at which semantic blending is bypassed entirely.
    pub dominant_cutoff: f64,
    /// Additive boost when one title contains the other.
    pub containment_boost: f64,
    /// Multiplier for titles of at most two words.
    pub short_title_factor: f64,
    /// How many retrieved candidates get the full scoring pass.
    pub max_candidates: usize,
    /// Fused similarity above which a candidate is reported as a conflict.
    pub conflict_floor: f64,
    /// Conflicts kept in the result after sorting.
    pub max_conflicts: usize,
    /// Cap on generated suggestion candidates before re-scoring.
    pub max_suggestion_candidates: usize,
    /// Minimum verification probability a suggestion must reach. This is
    /// the orchestrator's reduced-mode gate; it overrides the suggestion
    /// engine's own conservative fallback
    /// ([`crate::suggest::DEFAULT_MIN_PROBABILITY`]).
    pub suggestion_min_probability: f64,
    /// Suggestions kept in the result.
    pub max_suggestions: usize,
    /// Whether stored embedding vectors are kept at load time.
    pub use_embeddings: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            reject_threshold: 0.85,
            review_threshold: 0.65,
            dominant_weight: 0.7,
            semantic_weight: 0.3,
            dominant_cutoff: 0.95,
            containment_boost: 0.10,
            short_title_factor: 1.03,
            max_candidates: 50,
            conflict_floor: 0.60,
            max_conflicts: 5,
            max_suggestion_candidates: 20,
            suggestion_min_probability: 10.0,
            max_suggestions: 5,
            use_embeddings: true,
        }
    }
}

impl VerifierConfig {
    /// Defaults, then the TOML overlay cascade, then the environment toggle.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_file(&crate::config_file::load_config());
        if embeddings_disabled_by_env() {
            config.use_embeddings = false;
        }
        config
    }

    /// Overlay non-empty file values onto this config.
    pub fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(t) = &file.thresholds {
            if let Some(v) = t.reject {
                self.reject_threshold = v;
            }
            if let Some(v) = t.review {
                self.review_threshold = v;
            }
            if let Some(v) = t.conflict_floor {
                self.conflict_floor = v;
            }
        }
        if let Some(f) = &file.fusion {
            if let Some(v) = f.dominant_weight {
                self.dominant_weight = v;
            }
            if let Some(v) = f.semantic_weight {
                self.semantic_weight = v;
            }
            if let Some(v) = f.containment_boost {
                self.containment_boost = v;
            }
            if let Some(v) = f.short_title_factor {
                self.short_title_factor = v;
            }
        }
        if let Some(s) = &file.suggestions {
            if let Some(v) = s.min_probability {
                self.suggestion_min_probability = v;
            }
            if let Some(v) = s.max_results {
                self.max_suggestions = v;
            }
        }
        if let Some(r) = &file.retrieval {
            if let Some(v) = r.max_candidates {
                self.max_candidates = v;
            }
        }
    }
}

fn embeddings_disabled_by_env() -> bool {
    match std::env::var(DISABLE_EMBEDDINGS_ENV) {
        Ok(v) => !matches!(v.as_str(), "" | "0" | "false"),
        Err(_) => false,
    }
}
