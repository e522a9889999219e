//! Canonicalization of submitted and registered titles.
//!
//! Two projections: [`normalize`] keeps word structure (for tokenization and
//! token-set comparison) while [`canonical_form`] strips everything down to
//! ASCII alphanumerics (for concatenation-attack detection). Both run NFKC
//! first so invisible and directional marks cannot smuggle a near-duplicate
//! past either form.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;

/// English stopword bank, plus common registry filler words. Tokens in this
/// set carry no distinguishing power between titles.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
        "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
        "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
        "just", "don", "should", "now",
    ]
    .into_iter()
    .collect()
});

/// Lowercase, strip punctuation to spaces, drop stopwords, collapse
/// whitespace.
///
/// Every character outside `[a-z0-9\s]` becomes a single space, which is how
/// punctuation-based and invisible-character bypasses are neutralized before
/// tokenization.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lowered: String = text.nfkc().collect::<String>().to_lowercase();
    let spaced: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    spaced
        .split_whitespace()
        .filter(|t| !STOPWORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-agnostic canonical form: NFKC, lowercase, ASCII alphanumerics only.
///
/// `"Hindustan Times"`, `"HindustanTimes"`, and `"Hindustan\u{202D}Times"`
/// all collapse to `"hindustantimes"`.
pub fn canonical_form(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}
