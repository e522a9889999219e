//! Brahmic → Latin scheme tables.
//!
//! Devanagari (U+0900) and Oriya (U+0B00) share the ISCII-derived block
//! layout, so a single table indexed by the offset from the block base
//! covers both scripts. Output is a lowercase ITRANS-equivalent form with
//! long vowels already collapsed (`आ` → `a`, `ी` → `i`); the caller's
//! flattening pass handles the remaining cluster variants.

const DEVANAGARI_BASE: u32 = 0x0900;
const ORIYA_BASE: u32 = 0x0B00;

/// Independent vowels, block offsets 0x05..=0x14.
const VOWELS: [&str; 16] = [
    "a", "a", "i", "i", "u", "u", "ri", "li", "e", "e", "e", "ai", "o", "o", "o", "au",
];

/// Consonants, block offsets 0x15..=0x39. The inherent `a` is appended by
/// the state machine unless a matra or virama follows.
const CONSONANTS: [&str; 37] = [
    "k", "kh", "g", "gh", "n", // velar
    "ch", "chh", "j", "jh", "n", // palatal
    "t", "th", "d", "dh", "n", // retroflex
    "t", "th", "d", "dh", "n", // dental
    "n", // nnna (0x29)
    "p", "ph", "b", "bh", "m", // labial
    "y", "r", "r", "l", "l", "l", // semivowels, 0x31 rra / 0x33 lla / 0x34 llla
    "v", "sh", "sh", "s", "h",
];

/// Dependent vowel signs (matras), block offsets 0x3E..=0x4C.
const MATRAS: [&str; 15] = [
    "a", "i", "i", "u", "u", "ri", "ri", "e", "e", "e", "ai", "o", "o", "o", "au",
];

/// Nukta consonants, Devanagari only, offsets 0x58..=0x5F.
const NUKTA_CONSONANTS: [&str; 8] = ["k", "kh", "g", "j", "d", "dh", "f", "y"];

fn block_offset(c: char) -> Option<u32> {
    let cp = c as u32;
    if (DEVANAGARI_BASE..DEVANAGARI_BASE + 0x80).contains(&cp) {
        Some(cp - DEVANAGARI_BASE)
    } else if (ORIYA_BASE..ORIYA_BASE + 0x80).contains(&cp) {
        Some(cp - ORIYA_BASE)
    } else {
        None
    }
}

/// Transliterate Devanagari/Oriya text to lowercase ASCII.
///
/// Characters outside both blocks pass through unchanged, so mixed-script
/// titles keep their Latin parts. The consonant state machine emits the
/// inherent `a` unless the next character is a matra or a virama.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Set after a consonant; owed unless cancelled by a matra or virama.
    let mut pending_a = false;

    for c in text.chars() {
        let Some(off) = block_offset(c) else {
            if pending_a {
                out.push('a');
                pending_a = false;
            }
            out.push(c);
            continue;
        };

        match off {
            // Matra: replaces the inherent vowel of the preceding consonant.
            0x3E..=0x4C => {
                pending_a = false;
                out.push_str(MATRAS[(off - 0x3E) as usize]);
            }
            // Virama: suppresses the inherent vowel entirely.
            0x4D => pending_a = false,
            // Nukta: modifier dot, already folded into the 0x58 row.
            0x3C => {}
            _ => {
                if pending_a {
                    out.push('a');
                    pending_a = false;
                }
                match off {
                    0x01 | 0x02 => out.push('n'), // candrabindu, anusvara
                    0x03 => out.push('h'),        // visarga
                    0x05..=0x14 => out.push_str(VOWELS[(off - 0x05) as usize]),
                    0x15..=0x39 => {
                        out.push_str(CONSONANTS[(off - 0x15) as usize]);
                        pending_a = true;
                    }
                    0x58..=0x5F if (c as u32) < ORIYA_BASE => {
                        out.push_str(NUKTA_CONSONANTS[(off - 0x58) as usize]);
                        pending_a = true;
                    }
                    0x60 => out.push_str("ri"),
                    0x61 => out.push_str("li"),
                    0x64 | 0x65 => out.push(' '), // danda, double danda
                    0x66..=0x6F => out.push(char::from(b'0' + (off - 0x66) as u8)),
                    0x71 if (c as u32) >= ORIYA_BASE => {
                        // Oriya wa
                        out.push('w');
                        pending_a = true;
                    }
                    _ => {}
                }
            }
        }
    }

    if pending_a {
        out.push('a');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_consonant_vowel() {
        // क + ा (aa matra) + ल → kala
        assert_eq!(transliterate("काल"), "kala");
    }

    #[test]
    fn inherent_a_emitted() {
        // ज न त a-final consonants all carry the inherent vowel
        assert_eq!(transliterate("जनता"), "janata");
    }

    #[test]
    fn virama_suppresses_vowel() {
        // हिन्द: न + virama + द → "hind" with trailing inherent a
        assert_eq!(transliterate("हिन्द"), "hinda");
    }

    #[test]
    fn dainik_jagran() {
        assert_eq!(transliterate("दैनिक जागरण"), "dainika jagarana");
    }

    #[test]
    fn anusvara_as_n() {
        // संध्या: स + anusvara + ध + virama + य + ा
        assert_eq!(transliterate("संध्या"), "sandhya");
    }

    #[test]
    fn digits_map_to_ascii() {
        assert_eq!(transliterate("२०२४"), "2024");
    }

    #[test]
    fn oriya_shares_tables() {
        // ସମ୍ବାଦ (sambad): ସ ମ ୍ ବ ା ଦ
        assert_eq!(transliterate("ସମ୍ବାଦ"), "sambada");
    }

    #[test]
    fn latin_passthrough() {
        assert_eq!(transliterate("news २४"), "news 24");
    }
}
