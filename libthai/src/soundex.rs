//! Thai soundex over romanized input.
//!
//! Codes are built in four passes:
//! 1. lowercase and trim
//! 2. replace digraphs in table order (`ng` first, so `chang` becomes `6A4`)
//! 3. map each remaining character to its consonant class digit or vowel
//!    letter; anything else is dropped
//! 4. collapse consecutive duplicates and truncate
//!
//! Consonant classes group sounds Thai speakers romanize interchangeably:
//! velars (`k c g kh`), labials (`p b ph`), dentals (`t d th`), `ng`,
//! nasals (`n m`), liquids (`l r`), sibilants (`s z j ch`), `w v`, `y`, `h`.

use libthai_core::{CodeSource, PhoneticCoder};
use phf::phf_map;

/// Default code length.
pub const DEFAULT_LENGTH: usize = 6;

/// Digraphs, applied with plain string replacement in this order.
const DIGRAPHS: &[(&str, &str)] = &[
    ("ng", "4"),
    ("ch", "6"),
    ("kh", "1"),
    ("ph", "2"),
    ("th", "3"),
    ("ai", "I"),
    ("ay", "I"),
    ("ei", "I"),
    ("ae", "E"),
    ("ea", "E"),
    ("ee", "I"),
    ("ii", "I"),
    ("oo", "U"),
    ("ou", "U"),
    ("ue", "U"),
];

static CHAR_CLASS: phf::Map<char, char> = phf_map! {
    'k' => '1', 'c' => '1', 'g' => '1',
    'p' => '2', 'b' => '2',
    't' => '3', 'd' => '3',
    'n' => '4', 'm' => '4',
    'l' => '5', 'r' => '5',
    's' => '6', 'z' => '6', 'j' => '6',
    'w' => '7', 'v' => '7',
    'y' => '8',
    'h' => '9',
    'a' => 'A', 'e' => 'E', 'i' => 'I', 'o' => 'O', 'u' => 'U',
};

/// Already-coded symbols produced by the digraph pass.
fn is_code_symbol(ch: char) -> bool {
    matches!(ch, '1'..='9' | 'A' | 'E' | 'I' | 'O' | 'U')
}

/// Encode romanized Thai into a code of at most `length` symbols.
///
/// # Example
/// ```
/// use libthai::soundex::thai_soundex;
/// assert_eq!(thai_soundex("narak", 6), "4A5A1");
/// assert_eq!(thai_soundex("mai", 6), thai_soundex("may", 6));
/// ```
pub fn thai_soundex(romanized: &str, length: usize) -> String {
    let mut text = romanized.trim().to_lowercase();
    if text.is_empty() || length == 0 {
        return String::new();
    }

    for (from, to) in DIGRAPHS {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }

    let mut code = String::with_capacity(length);
    let mut last: Option<char> = None;
    let mut count = 0;
    for ch in text.chars() {
        let symbol = match CHAR_CLASS.get(&ch) {
            Some(&mapped) => mapped,
            None if is_code_symbol(ch) => ch,
            None => continue,
        };
        if last == Some(symbol) {
            continue;
        }
        last = Some(symbol);
        code.push(symbol);
        count += 1;
        if count == length {
            break;
        }
    }
    code
}

/// Romanized Thai soundex as a pluggable phonetic coder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThaiSoundex {
    pub length: usize,
}

impl ThaiSoundex {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for ThaiSoundex {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl PhoneticCoder for ThaiSoundex {
    fn encode(&self, text: &str) -> String {
        thai_soundex(text, self.length)
    }

    fn name(&self) -> &str {
        "thai"
    }

    fn source(&self) -> CodeSource {
        CodeSource::Romanized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sx(s: &str) -> String {
        thai_soundex(s, DEFAULT_LENGTH)
    }

    #[test]
    fn test_basic_codes() {
        assert_eq!(sx("narak"), "4A5A1");
        assert_eq!(sx("kon"), "1O4");
        assert_eq!(sx("dee"), "3I");
    }

    #[test]
    fn test_digraph_order() {
        // "ng" is replaced before "ch"
        assert_eq!(sx("chang"), "6A4");
        assert_eq!(sx("khao"), "1AO");
        assert_eq!(sx("phom"), "2O4");
        assert_eq!(sx("tham"), "3A4");
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        // k and kh land in the same class
        assert_eq!(sx("kkhon"), "1O4");
        assert_eq!(sx("sawatdee"), "6A7A3I");
    }

    #[test]
    fn test_non_latin_is_dropped() {
        assert_eq!(sx("ka-1"), "1A1");
        assert_eq!(sx("คน"), "");
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(thai_soundex("narak", 0), "");
    }

    #[test]
    fn test_coder_identity() {
        let coder = ThaiSoundex::default();
        assert_eq!(coder.name(), "thai");
        assert_eq!(coder.source(), CodeSource::Romanized);
        assert_eq!(coder.encode("Narak"), "4A5A1");
    }
}
