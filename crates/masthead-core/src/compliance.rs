//! Rule-based compliance engine.
//!
//! Four independent validators run over every submission: restricted terms
//! (substring), periodicity words (word boundary), banned prefixes and
//! suffixes, and combination-of-existing-titles detection. The two
//! multi-pattern matchers are Aho-Corasick automatons built once at load
//! time and shared read-only across requests.

use aho_corasick::AhoCorasick;

use crate::rules::RuleCatalog;
use crate::{CoreError, TitleRecord};

/// Which rule family a violation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Restricted,
    Periodicity,
    PrefixSuffix,
    Combination,
}

/// One rule violation with its severity penalty.
#[derive(Debug, Clone)]
pub struct Violation {
    pub kind: ViolationKind,
    pub reason: String,
    /// Offending terms, used by the conflict highlighter.
    pub terms: Vec<String>,
    /// The title with the offending part removed, for dual-pass similarity.
    pub cleaned_title: Option<String>,
    pub penalty: f64,
}

/// Aggregate outcome of all four validators.
#[derive(Debug, Clone, Default)]
pub struct ComplianceReport {
    pub is_compliant: bool,
    pub violations: Vec<Violation>,
    pub penalty_score: f64,
}

impl ComplianceReport {
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    pub fn violation_terms(&self) -> Vec<String> {
        self.violations
            .iter()
            .flat_map(|v| v.terms.iter().cloned())
            .collect()
    }

    pub fn cleaned_titles(&self) -> Vec<&str> {
        self.violations
            .iter()
            .filter_map(|v| v.cleaned_title.as_deref())
            .collect()
    }

    pub fn reasons(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.reason.as_str()).collect()
    }
}

/// Compiled validators. Immutable after construction.
pub struct ComplianceEngine {
    catalog: RuleCatalog,
    restricted: AhoCorasick,
    restricted_patterns: Vec<String>,
    periodicity: AhoCorasick,
    periodicity_patterns: Vec<String>,
}

impl ComplianceEngine {
    pub fn new(catalog: RuleCatalog) -> Result<Self, CoreError> {
        let restricted_patterns: Vec<String> =
            catalog.restricted_terms().map(String::from).collect();
        let periodicity_patterns: Vec<String> =
            catalog.periodicity_terms().map(String::from).collect();
        let restricted = AhoCorasick::new(&restricted_patterns)
            .map_err(|e| CoreError::Rules(format!("restricted-term automaton: {e}")))?;
        let periodicity = AhoCorasick::new(&periodicity_patterns)
            .map_err(|e| CoreError::Rules(format!("periodicity automaton: {e}")))?;
        Ok(Self {
            catalog,
            restricted,
            restricted_patterns,
            periodicity,
            periodicity_patterns,
        })
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Run all validators and aggregate their findings.
    ///
    /// `existing` enables combination detection; pass an empty slice to skip
    /// it (the suggestion re-scoring path supplies the live title set).
    pub fn check(&self, title: &str, existing: &[TitleRecord]) -> ComplianceReport {
        let mut report = ComplianceReport {
            is_compliant: true,
            ..Default::default()
        };

        let checks = [
            self.check_restricted(title),
            self.check_prefix_suffix(title),
            self.check_periodicity(title),
            self.check_combination(title, existing),
        ];
        for violation in checks.into_iter().flatten() {
            report.is_compliant = false;
            report.penalty_score += violation.penalty;
            report.violations.push(violation);
        }
        report
    }

    /// Restricted terms match anywhere in the title, even mid-word, so that
    /// squeezed forms like "metropolice" are still caught.
    fn check_restricted(&self, title: &str) -> Option<Violation> {
        let lowered = title.to_lowercase();
        let m = self.restricted.find(&lowered)?;
        let term = &self.restricted_patterns[m.pattern().as_usize()];
        Some(Violation {
            kind: ViolationKind::Restricted,
            reason: format!("Title contains restricted term: '{}'", term.to_uppercase()),
            terms: vec![term.clone()],
            cleaned_title: None,
            penalty: 1.0,
        })
    }

    /// Periodicity words only count as whole words; "weekly" inside
    /// "Weeklyn" is someone's name, not a publication cadence.
    fn check_periodicity(&self, title: &str) -> Option<Violation> {
        let lowered = title.to_lowercase();
        for m in self.periodicity.find_iter(&lowered) {
            if !is_word_match(&lowered, m.start(), m.end()) {
                continue;
            }
            let term = &self.periodicity_patterns[m.pattern().as_usize()];
            let cleaned = remove_word(&lowered, term);
            return Some(Violation {
                kind: ViolationKind::Periodicity,
                reason: format!("Title contains periodicity term: '{term}'"),
                terms: vec![term.clone()],
                cleaned_title: Some(cleaned),
                penalty: 0.5,
            });
        }
        None
    }

    fn check_prefix_suffix(&self, title: &str) -> Option<Violation> {
        let lowered = title.to_lowercase();
        let mut cleaned = lowered.clone();
        let mut reasons = Vec::new();
        let mut terms = Vec::new();

        for prefix in self.catalog.restricted_prefixes() {
            if lowered.starts_with(prefix.as_str()) {
                reasons.push(format!("Title starts with restricted prefix: {prefix}"));
                terms.push(prefix.clone());
                cleaned = cleaned
                    .strip_prefix(prefix.as_str())
                    .unwrap_or(&cleaned)
                    .trim()
                    .to_string();
            }
        }
        for suffix in self.catalog.restricted_suffixes() {
            if lowered.ends_with(suffix.as_str()) {
                reasons.push(format!("Title ends with restricted suffix: {suffix}"));
                terms.push(suffix.clone());
                cleaned = cleaned
                    .strip_suffix(suffix.as_str())
                    .unwrap_or(&cleaned)
                    .trim()
                    .to_string();
            }
        }

        if reasons.is_empty() {
            return None;
        }
        Some(Violation {
            kind: ViolationKind::PrefixSuffix,
            penalty: 0.2 * reasons.len() as f64,
            reason: reasons.join(" | "),
            terms,
            cleaned_title: Some(cleaned),
        })
    }

    /// Detect a title assembled from two or more registered titles, e.g.
    /// "Hindu Indian Express" when "Hindu" and "Indian Express" both exist.
    ///
    /// Candidate components must match as whole-word substrings. Once two
    /// match, distinctness is re-verified by greedily consuming the longest
    /// components from a working copy, so "Indian" and "Indian Express" do
    /// not double-count the same span.
    fn check_combination(&self, title: &str, existing: &[TitleRecord]) -> Option<Violation> {
        if existing.is_empty() {
            return None;
        }
        let lowered = title.to_lowercase();
        let mut found: Vec<&str> = Vec::new();

        for record in existing {
            let component = record.normalized_title.as_str();
            if component.is_empty() || !contains_word(&lowered, component) {
                continue;
            }
            if !found.contains(&component) {
                found.push(component);
            }
            if found.len() < 2 {
                continue;
            }

            let mut sorted = found.clone();
            sorted.sort_by_key(|c| std::cmp::Reverse(c.len()));
            let mut working = lowered.clone();
            let mut distinct: Vec<&str> = Vec::new();
            for comp in sorted {
                if working.contains(comp) {
                    distinct.push(comp);
                    working = working.replacen(comp, " ", 1);
                }
            }

            if distinct.len() >= 2 {
                return Some(Violation {
                    kind: ViolationKind::Combination,
                    reason: format!(
                        "Title appears to be a combination of existing titles: {}",
                        distinct.join(", ")
                    ),
                    terms: distinct.iter().map(|s| s.to_string()).collect(),
                    cleaned_title: None,
                    penalty: 1.0,
                });
            }
        }
        None
    }
}

/// True when the byte span `[start, end)` of `haystack` sits on word
/// boundaries: neither neighbour character is alphanumeric.
fn is_word_match(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    let after_ok = haystack[end..]
        .chars()
        .next()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    before_ok && after_ok
}

/// Whether `needle` occurs in `haystack` as a whole-word substring.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        if is_word_match(haystack, start, end) {
            return true;
        }
        from = start + 1;
    }
    false
}

/// Remove every whole-word occurrence of `word` and collapse the leftover
/// whitespace.
fn remove_word(haystack: &str, word: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();
        if is_word_match(haystack, start, end) {
            out.push_str(&haystack[from..start]);
            from = end;
        } else {
            out.push_str(&haystack[from..start + 1]);
            from = start + 1;
        }
    }
    out.push_str(&haystack[from..]);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
