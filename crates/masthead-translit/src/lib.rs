//! Indic script detection and lossy Latin transliteration.
//!
//! Maps Devanagari and Oriya text to a lowercase ITRANS-equivalent ASCII
//! form, then collapses common transliteration variants of the same phoneme
//! (`bhaarat` → `barat`, `samaachar` → `samachar`) so that spelling variants
//! of one underlying name compare equal. The flattening is intentionally
//! lossy: it is a comparison key, not a readable romanization.

mod scheme;

use once_cell::sync::Lazy;
use regex::Regex;

pub use scheme::transliterate;

/// Writing system of a piece of text, detected from Unicode script classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Devanagari,
    Oriya,
    Latin,
    Unknown,
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Script::Devanagari => write!(f, "devanagari"),
            Script::Oriya => write!(f, "oriya"),
            Script::Latin => write!(f, "latin"),
            Script::Unknown => write!(f, "unknown"),
        }
    }
}

static DEVANAGARI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Devanagari}").unwrap());
static ORIYA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Oriya}").unwrap());
static LATIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").unwrap());

/// Identify the dominant script of `text`.
///
/// Indic scripts win over Latin when mixed, since a single Devanagari or
/// Oriya character is a much stronger signal than incidental ASCII.
pub fn detect_script(text: &str) -> Script {
    if DEVANAGARI_RE.is_match(text) {
        Script::Devanagari
    } else if ORIYA_RE.is_match(text) {
        Script::Oriya
    } else if LATIN_RE.is_match(text) {
        Script::Latin
    } else {
        Script::Unknown
    }
}

/// Ordered substring rewrites applied after the character-level rules.
/// Order matters: `chh` must survive the `sh` pass (it does — no earlier
/// pair overlaps it) and `tra` runs after `ri` has been consumed.
const FLATTEN_RULES: [(&str, &str); 12] = [
    ("aa", "a"),
    ("ee", "i"),
    ("oo", "u"),
    ("ou", "o"),
    ("bh", "b"),
    ("dh", "d"),
    ("th", "t"),
    ("ph", "f"),
    ("sh", "s"),
    ("chh", "ch"),
    ("ri", "r"),
    ("tra", "tara"),
];

/// Collapse transliteration variants of the same phoneme.
///
/// Stage one rewrites single characters (`c`→`k` except before `h`, `v`→`w`,
/// `z`→`j`, `x`→`ks`, `q`→`k`); stage two applies [`FLATTEN_RULES`] in order.
pub fn flatten(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            'c' if chars.peek() != Some(&'h') => out.push('k'),
            'v' => out.push('w'),
            'z' => out.push('j'),
            'x' => out.push_str("ks"),
            'q' => out.push('k'),
            other => out.push(other),
        }
    }
    for (pattern, replacement) in FLATTEN_RULES {
        if out.contains(pattern) {
            out = out.replace(pattern, replacement);
        }
    }
    out
}

/// Full normalization: lowercase, transliterate native scripts to Latin,
/// flatten phoneme clusters. Latin input skips the transliteration step.
pub fn normalize(text: &str) -> String {
    let text = text.to_lowercase();
    let text = text.trim();
    let romanized = match detect_script(text) {
        Script::Devanagari | Script::Oriya => transliterate(text),
        Script::Latin | Script::Unknown => text.to_string(),
    };
    flatten(&romanized)
}
