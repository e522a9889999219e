//! On-disk TOML configuration overlay.
//!
//! All fields are optional so partial configs work: a CWD `.masthead.toml`
//! cascades over the platform config file, and whatever neither sets falls
//! back to the built-in defaults in [`crate::config::VerifierConfig`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub thresholds: Option<ThresholdsConfig>,
    pub fusion: Option<FusionConfig>,
    pub retrieval: Option<RetrievalConfig>,
    pub suggestions: Option<SuggestionsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub reject: Option<f64>,
    pub review: Option<f64>,
    pub conflict_floor: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FusionConfig {
    pub dominant_weight: Option<f64>,
    pub semantic_weight: Option<f64>,
    pub containment_boost: Option<f64>,
    pub short_title_factor: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub max_candidates: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    pub min_probability: Option<f64>,
    pub max_results: Option<usize>,
}

/// Platform config path: `<config_dir>/masthead/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("masthead").join("config.toml"))
}

/// Load config by cascading CWD `.masthead.toml` over the platform config.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".masthead.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load from a specific path. `None` when the file is missing or invalid.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        thresholds: Some(ThresholdsConfig {
            reject: pick(&overlay.thresholds, &base.thresholds, |t| t.reject),
            review: pick(&overlay.thresholds, &base.thresholds, |t| t.review),
            conflict_floor: pick(&overlay.thresholds, &base.thresholds, |t| t.conflict_floor),
        }),
        fusion: Some(FusionConfig {
            dominant_weight: pick(&overlay.fusion, &base.fusion, |f| f.dominant_weight),
            semantic_weight: pick(&overlay.fusion, &base.fusion, |f| f.semantic_weight),
            containment_boost: pick(&overlay.fusion, &base.fusion, |f| f.containment_boost),
            short_title_factor: pick(&overlay.fusion, &base.fusion, |f| f.short_title_factor),
        }),
        retrieval: Some(RetrievalConfig {
            max_candidates: pick(&overlay.retrieval, &base.retrieval, |r| r.max_candidates),
        }),
        suggestions: Some(SuggestionsConfig {
            min_probability: pick(&overlay.suggestions, &base.suggestions, |s| s.min_probability),
            max_results: pick(&overlay.suggestions, &base.suggestions, |s| s.max_results),
        }),
    }
}

fn pick<S, T: Copy>(
    overlay: &Option<S>,
    base: &Option<S>,
    get: impl Fn(&S) -> Option<T>,
) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&get)
        .or_else(|| base.as_ref().and_then(&get))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_toml() {
        let config = ConfigFile {
            thresholds: Some(ThresholdsConfig {
                reject: Some(0.9),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.thresholds.unwrap().reject, Some(0.9));
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let parsed: ConfigFile = toml::from_str("[thresholds]\nreview = 0.6\n").unwrap();
        assert!(parsed.fusion.is_none());
        assert_eq!(parsed.thresholds.unwrap().review, Some(0.6));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            thresholds: Some(ThresholdsConfig {
                reject: Some(0.8),
                review: Some(0.6),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            thresholds: Some(ThresholdsConfig {
                reject: Some(0.9),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let t = merged.thresholds.unwrap();
        assert_eq!(t.reject, Some(0.9));
        assert_eq!(t.review, Some(0.6));
    }
}
