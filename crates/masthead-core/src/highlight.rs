//! Bionic conflict highlighter.
//!
//! Annotates the words of a submitted title that collide with an existing
//! title or a rule term, bolding a fixation prefix of each conflicting word
//! so a reviewer's eye lands on the problem immediately. Output is
//! HTML-like markup treated as opaque text by the rest of the pipeline.

use std::collections::HashSet;

use crate::similarity::PhoneticEncoder;

const SMALL_WORD_THRESHOLD: usize = 3;
const SMALL_WORD_RATIO: f64 = 0.66;
const FUNCTION_WORD_RATIO: f64 = 0.35;
const CONTENT_WORD_RATIO: f64 = 0.5;

const FUNCTION_WORDS: [&str; 23] = [
    "a", "an", "the", "in", "on", "at", "by", "for", "with", "from", "to", "of", "and", "but",
    "or", "so", "it", "its", "is", "are", "was", "were", "be",
];

/// What to mark: exact tokens, rule terms, and metaphone codes of the
/// conflicting candidate's words.
#[derive(Debug, Clone, Default)]
pub struct ConflictMarkers {
    pub tokens: HashSet<String>,
    pub rules: HashSet<String>,
    pub phonetic: HashSet<String>,
}

pub struct Highlighter {
    intensity: f64,
    encoder: PhoneticEncoder,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            encoder: PhoneticEncoder::default(),
        }
    }
}

impl Highlighter {
    pub fn new(intensity: f64) -> Self {
        Self {
            intensity,
            encoder: PhoneticEncoder::default(),
        }
    }

    fn fixation_weight(&self) -> u32 {
        (400.0 + self.intensity * 500.0).round() as u32
    }

    /// Bold the fixation prefix of one word.
    fn transform_word(&self, word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < 2 {
            return word.to_string();
        }
        let clean: String = word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        if clean.is_empty() {
            return word.to_string();
        }

        let n = clean.chars().count();
        let base_ratio = if n <= SMALL_WORD_THRESHOLD {
            SMALL_WORD_RATIO
        } else if FUNCTION_WORDS.contains(&clean.as_str()) {
            FUNCTION_WORD_RATIO
        } else {
            CONTENT_WORD_RATIO
        };
        let scaled = (base_ratio * (0.5 + self.intensity)).clamp(0.05, 0.95);
        let bold_count = ((n as f64 * scaled).ceil() as usize).max(1);

        let bold: String = chars.iter().take(bold_count).collect();
        let rest: String = chars.iter().skip(bold_count).collect();
        format!(
            "<span class=\"bionic-fixation\" style=\"font-weight:{}\">{}</span>{}",
            self.fixation_weight(),
            bold,
            rest
        )
    }

    /// Annotate `text`, wrapping the whole output in a single container.
    ///
    /// A word is marked when its alphabetic core is a conflicting token, its
    /// primary metaphone matches a conflicting code, or a rule term matches
    /// it exactly or as a substring.
    pub fn highlight(&self, text: &str, markers: &ConflictMarkers) -> String {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|word| {
                let clean: String = word
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .collect::<String>()
                    .to_lowercase();
                let code = self.encoder.primary(&clean);

                let is_conflict = markers.tokens.contains(&clean)
                    || markers.rules.contains(&clean)
                    || (!code.is_empty() && markers.phonetic.contains(&code))
                    || markers.rules.iter().any(|r| !r.is_empty() && clean.contains(r.as_str()));

                if is_conflict {
                    self.transform_word(word)
                } else {
                    word.to_string()
                }
            })
            .collect();

        format!("<span class=\"bionic-wrapper\">{}</span>", words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(tokens: &[&str]) -> ConflictMarkers {
        ConflictMarkers {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn wraps_output_in_container() {
        let h = Highlighter::default();
        let out = h.highlight("Quiet Valley", &ConflictMarkers::default());
        assert_eq!(out, "<span class=\"bionic-wrapper\">Quiet Valley</span>");
    }

    #[test]
    fn conflicting_token_gets_fixation_span() {
        let h = Highlighter::default();
        let out = h.highlight("Sunrise Chronicle", &markers(&["sunrise"]));
        // default intensity 0.5 → weight 650; "sunrise" (7 letters) bolds
        // ceil(7 * 0.5) = 4 characters
        assert!(out.contains("font-weight:650"));
        assert!(out.contains(">Sunr</span>ise"));
        assert!(out.contains(" Chronicle"));
        assert!(!out.contains("Chronicle</span>ise"));
    }

    #[test]
    fn small_word_bolds_most_of_it() {
        let h = Highlighter::default();
        let out = h.highlight("Ark Review", &markers(&["ark"]));
        // 3-letter word: ceil(3 * 0.66) = 2
        assert!(out.contains(">Ar</span>k"));
    }

    #[test]
    fn rule_term_substring_matches() {
        let h = Highlighter::default();
        let m = ConflictMarkers {
            rules: ["police".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let out = h.highlight("Metropolice Watch", &m);
        assert!(out.contains("bionic-fixation"));
    }

    #[test]
    fn phonetic_code_matches() {
        let h = Highlighter::default();
        let enc = PhoneticEncoder::default();
        let m = ConflictMarkers {
            phonetic: [enc.primary("jagran")].into_iter().collect(),
            ..Default::default()
        };
        // Different spelling, same primary metaphone
        let out = h.highlight("Jagaran Patrika", &m);
        assert!(out.contains("bionic-fixation"));
    }

    #[test]
    fn unmarked_words_pass_through() {
        let h = Highlighter::default();
        let out = h.highlight("Sunrise Chronicle", &markers(&["pratidin"]));
        assert!(!out.contains("bionic-fixation"));
    }

    #[test]
    fn punctuation_only_word_untouched() {
        let h = Highlighter::default();
        let out = h.highlight("Sunrise -- Chronicle", &markers(&["sunrise"]));
        assert!(out.contains(" -- "));
    }
}
