//! Surface-similarity metrics: edit distance, token sets, character
//! n-grams, and double-metaphone phonetics.
//!
//! All metrics return values in `[0, 1]`. The orchestrator combines them
//! across the original, transliterated, and canonical forms of both titles;
//! nothing here looks at more than two strings at a time.

use std::collections::BTreeSet;

use rphonetic::{DoubleMetaphone, Encoder};

/// Damerau-Levenshtein similarity: `1 - dist / max(|a|, |b|, 1)` on the
/// lowercased strings. Transpositions count as a single edit, which matters
/// for swapped-letter near-duplicates like "Jagran" / "Jarang".
pub fn damerau_levenshtein_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let dist = rapidfuzz::distance::damerau_levenshtein::distance(a.chars(), b.chars());
    let max_len = a.chars().count().max(b.chars().count()).max(1);
    1.0 - dist as f64 / max_len as f64
}

/// RapidFuzz-style token-set ratio.
///
/// Both sides are split into token sets; the sorted intersection and the two
/// sorted remainders are compared pairwise with the normalized indel ratio
/// and the best of the three comparisons wins. Word order and duplicate
/// tokens therefore do not matter.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    let base = intersection.join(" ");
    let combined_a = join_nonempty(&base, &diff_a.join(" "));
    let combined_b = join_nonempty(&base, &diff_b.join(" "));

    let ratios = [
        rapidfuzz::fuzz::ratio(base.chars(), combined_a.chars()),
        rapidfuzz::fuzz::ratio(base.chars(), combined_b.chars()),
        rapidfuzz::fuzz::ratio(combined_a.chars(), combined_b.chars()),
    ];
    ratios.into_iter().fold(0.0, f64::max)
}

fn join_nonempty(base: &str, rest: &str) -> String {
    match (base.is_empty(), rest.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => rest.to_string(),
        (false, false) => format!("{base} {rest}"),
    }
}

/// Jaccard similarity over character n-grams of the space-stripped,
/// lowercased strings. Effective against concatenation, hyphenation, and
/// typo attacks because it ignores word structure entirely.
pub fn ngram_jaccard(a: &str, b: &str, n: usize) -> f64 {
    let a = strip_spaces(a);
    let b = strip_spaces(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let grams_a = ngrams(&a, n);
    let grams_b = ngrams(&b, n);
    let intersection = grams_a.intersection(&grams_b).count();
    let union = grams_a.union(&grams_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

fn strip_spaces(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect()
}

fn ngrams(s: &str, n: usize) -> BTreeSet<String> {
    let chars: Vec<char> = s.chars().collect();
    // A string shorter than n contributes itself as its only gram.
    let count = chars.len().saturating_sub(n - 1).max(1);
    (0..count)
        .map(|i| chars[i..(i + n).min(chars.len())].iter().collect())
        .collect()
}

/// Double-metaphone comparison wrapper.
///
/// Codes are computed over the whole string; non-letters are skipped by the
/// encoder, so multi-word titles compare as one phonetic stream.
#[derive(Default)]
pub struct PhoneticEncoder {
    encoder: DoubleMetaphone,
}

impl PhoneticEncoder {
    /// Primary metaphone code, e.g. for highlighter word classification.
    pub fn primary(&self, text: &str) -> String {
        self.encoder.encode(text)
    }

    /// Primary and alternate codes.
    pub fn codes(&self, text: &str) -> (String, String) {
        let primary = self.encoder.encode(text);
        let alternate = self.encoder.double_metaphone(text).alternate().to_string();
        (primary, alternate)
    }

    /// Phonetic similarity: best sequence ratio between the primary codes
    /// and between primary and alternate.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let (p1, _s1) = self.codes(a);
        let (p2, s2) = self.codes(b);

        // Non-Latin text encodes to nothing; empty codes carry no signal.
        if p1.is_empty() || p2.is_empty() {
            return 0.0;
        }

        let direct = rapidfuzz::fuzz::ratio(p1.chars(), p2.chars());
        let alternate = if s2.is_empty() { &p2 } else { &s2 };
        let cross = rapidfuzz::fuzz::ratio(p1.chars(), alternate.chars());
        direct.max(cross)
    }
}
