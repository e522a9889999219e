//! Rule catalogue: restricted terms, periodicity words, and banned
//! prefixes/suffixes.
//!
//! Loaded once from a JSON document with top-level keys `restricted_terms`,
//! `periodicity_terms`, and `restricted_prefix_suffix`. Every other
//! top-level key is unioned into the restricted-terms blacklist, so new rule
//! categories take effect without code changes. Built-in fallbacks apply
//! when no catalogue file is supplied.

use std::collections::BTreeSet;
use std::path::Path;

use crate::CoreError;

/// The loaded, read-only rule tables.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    restricted_terms: BTreeSet<String>,
    periodicity_terms: BTreeSet<String>,
    restricted_prefixes: Vec<String>,
    restricted_suffixes: Vec<String>,
}

impl Default for RuleCatalog {
    /// Fallback catalogue used when no rule file is configured.
    fn default() -> Self {
        Self {
            restricted_terms: ["police", "army", "cbi", "cid", "government", "ministry"]
                .into_iter()
                .map(String::from)
                .collect(),
            periodicity_terms: ["daily", "weekly", "monthly", "fortnightly", "annual"]
                .into_iter()
                .map(String::from)
                .collect(),
            restricted_prefixes: vec!["test-".into(), "prod-".into()],
            restricted_suffixes: vec!["-beta".into(), "-dev".into()],
        }
    }
}

impl RuleCatalog {
    /// Parse a catalogue from its JSON document form.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        let obj = doc
            .as_object()
            .ok_or_else(|| CoreError::Rules("catalogue root must be a JSON object".into()))?;

        let mut catalog = Self {
            restricted_terms: BTreeSet::new(),
            periodicity_terms: BTreeSet::new(),
            // The environment-marker bans always apply.
            restricted_prefixes: vec!["test-".into(), "prod-".into()],
            restricted_suffixes: vec!["-beta".into(), "-dev".into()],
        };

        for (key, value) in obj {
            let terms = string_array(key, value)?;
            match key.as_str() {
                "periodicity_terms" => catalog.periodicity_terms.extend(terms),
                "restricted_prefix_suffix" => {
                    catalog.restricted_prefixes.extend(terms.iter().cloned());
                    catalog.restricted_suffixes.extend(terms);
                }
                _ => catalog.restricted_terms.extend(terms),
            }
        }

        Ok(catalog)
    }

    /// Load a catalogue file, or fall back to the defaults when the path is
    /// `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                Self::from_json_str(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn restricted_terms(&self) -> impl Iterator<Item = &str> {
        self.restricted_terms.iter().map(String::as_str)
    }

    pub fn periodicity_terms(&self) -> impl Iterator<Item = &str> {
        self.periodicity_terms.iter().map(String::as_str)
    }

    pub fn restricted_prefixes(&self) -> &[String] {
        &self.restricted_prefixes
    }

    pub fn restricted_suffixes(&self) -> &[String] {
        &self.restricted_suffixes
    }

    pub fn is_periodicity(&self, word: &str) -> bool {
        self.periodicity_terms.contains(word)
    }

    /// Words banned from generated suggestions: the restricted blacklist
    /// plus every periodicity term.
    pub fn suggestion_blacklist(&self) -> BTreeSet<String> {
        self.restricted_terms
            .iter()
            .chain(self.periodicity_terms.iter())
            .cloned()
            .collect()
    }
}

fn string_array(key: &str, value: &serde_json::Value) -> Result<Vec<String>, CoreError> {
    let arr = value
        .as_array()
        .ok_or_else(|| CoreError::Rules(format!("catalogue key '{key}' must be an array")))?;
    arr.iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_lowercase())
                .ok_or_else(|| CoreError::Rules(format!("catalogue key '{key}' has a non-string entry")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_fallback_terms() {
        let c = RuleCatalog::default();
        assert!(c.restricted_terms().any(|t| t == "police"));
        assert!(c.is_periodicity("daily"));
        assert!(c.restricted_prefixes().contains(&"test-".to_string()));
    }

    #[test]
    fn json_known_keys_routed() {
        let c = RuleCatalog::from_json_str(
            r#"{
                "restricted_terms": ["Police", "Army"],
                "periodicity_terms": ["Daily", "Weekly"],
                "restricted_prefix_suffix": ["shree"]
            }"#,
        )
        .unwrap();
        assert!(c.restricted_terms().any(|t| t == "police"));
        assert!(c.is_periodicity("weekly"));
        assert!(c.restricted_prefixes().contains(&"shree".to_string()));
        assert!(c.restricted_suffixes().contains(&"shree".to_string()));
    }

    #[test]
    fn unknown_keys_union_into_blacklist() {
        let c = RuleCatalog::from_json_str(
            r#"{"agency_names": ["interpol"], "emblems": ["ashoka"]}"#,
        )
        .unwrap();
        assert!(c.restricted_terms().any(|t| t == "interpol"));
        assert!(c.restricted_terms().any(|t| t == "ashoka"));
        assert!(!c.is_periodicity("interpol"));
    }

    #[test]
    fn suggestion_blacklist_includes_periodicity() {
        let c = RuleCatalog::default();
        let bl = c.suggestion_blacklist();
        assert!(bl.contains("police"));
        assert!(bl.contains("daily"));
    }

    #[test]
    fn malformed_catalogue_is_an_error() {
        assert!(RuleCatalog::from_json_str("[1, 2]").is_err());
        assert!(RuleCatalog::from_json_str(r#"{"restricted_terms": "police"}"#).is_err());
        assert!(RuleCatalog::from_json_str("not json").is_err());
    }
}
