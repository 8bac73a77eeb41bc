//! Cross-language soundex: Thai script and Latin romanization share one code
//! space, so corpus entries can be coded from their Thai spelling while
//! queries are coded from what the user typed.
//!
//! Only consonants carry information. Both scripts map into the same classes:
//!
//! | class | Latin            | Thai                      |
//! |-------|------------------|---------------------------|
//! | 1     | k g c q x kh     | ก ข ฃ ค ฅ ฆ               |
//! | 2     | p b f v ph       | บ ป ผ ฝ พ ฟ ภ             |
//! | 3     | t d th           | ฎ ฏ ฐ ฑ ฒ ด ต ถ ท ธ       |
//! | 4     | ng               | ง                         |
//! | 5     | n m              | ณ น ม                     |
//! | 6     | j s z ch sh      | จ ฉ ช ฌ ซ ศ ษ ส           |
//! | 7     | l r              | ล ร ฬ ฤ                   |
//! | 8     | w                | ว                         |
//! | 9     | y                | ย ญ                       |
//! | H     | h                | ห ฮ                       |
//!
//! Vowels, tone marks and อ are dropped. A Thai consonant carrying the
//! silencer mark (์) is dropped, and so is ห leading a sonorant (หน, หม, ...).

use libthai_core::{CodeSource, PhoneticCoder};
use phf::phf_map;

pub const DEFAULT_LENGTH: usize = 6;

const THANTHAKHAT: char = '\u{0E4C}';

static THAI_CLASS: phf::Map<char, char> = phf_map! {
    'ก' => '1', 'ข' => '1', 'ฃ' => '1', 'ค' => '1', 'ฅ' => '1', 'ฆ' => '1',
    'บ' => '2', 'ป' => '2', 'ผ' => '2', 'ฝ' => '2', 'พ' => '2', 'ฟ' => '2', 'ภ' => '2',
    'ฎ' => '3', 'ฏ' => '3', 'ฐ' => '3', 'ฑ' => '3', 'ฒ' => '3',
    'ด' => '3', 'ต' => '3', 'ถ' => '3', 'ท' => '3', 'ธ' => '3',
    'ง' => '4',
    'ณ' => '5', 'น' => '5', 'ม' => '5',
    'จ' => '6', 'ฉ' => '6', 'ช' => '6', 'ฌ' => '6', 'ซ' => '6', 'ศ' => '6', 'ษ' => '6', 'ส' => '6',
    'ล' => '7', 'ร' => '7', 'ฬ' => '7', 'ฤ' => '7',
    'ว' => '8',
    'ย' => '9', 'ญ' => '9',
    'ห' => 'H', 'ฮ' => 'H',
};

static LATIN_CLASS: phf::Map<char, char> = phf_map! {
    'k' => '1', 'g' => '1', 'c' => '1', 'q' => '1', 'x' => '1',
    'p' => '2', 'b' => '2', 'f' => '2', 'v' => '2',
    't' => '3', 'd' => '3',
    'n' => '5', 'm' => '5',
    'j' => '6', 's' => '6', 'z' => '6',
    'l' => '7', 'r' => '7',
    'w' => '8',
    'y' => '9',
    'h' => 'H',
};

/// Latin digraphs checked before single letters.
fn latin_digraph(a: char, b: char) -> Option<char> {
    match (a, b) {
        ('k', 'h') => Some('1'),
        ('p', 'h') => Some('2'),
        ('t', 'h') => Some('3'),
        ('n', 'g') => Some('4'),
        ('c', 'h') | ('s', 'h') => Some('6'),
        _ => None,
    }
}

/// ห is silent in front of these.
fn is_sonorant(ch: char) -> bool {
    matches!(ch, 'ง' | 'ญ' | 'น' | 'ม' | 'ย' | 'ร' | 'ล' | 'ว')
}

/// Consonant class symbols for text in either script, before collapsing.
fn classes(text: &str) -> Vec<char> {
    let chars: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if let Some(class) = next.and_then(|n| latin_digraph(ch, n)) {
            out.push(class);
            i += 2;
            continue;
        }
        if let Some(&class) = LATIN_CLASS.get(&ch) {
            out.push(class);
        } else if let Some(&class) = THAI_CLASS.get(&ch) {
            let silenced = next == Some(THANTHAKHAT);
            let leading_h = ch == 'ห' && next.is_some_and(is_sonorant);
            if !silenced && !leading_h {
                out.push(class);
            }
        }
        i += 1;
    }
    out
}

/// Encode Thai script or romanized text into a shared consonant code. Class
/// symbols are ASCII, so byte length equals symbol count.
pub fn cross_soundex(text: &str, length: usize) -> String {
    let mut code = String::with_capacity(length);
    let mut last = None;
    for symbol in classes(text.trim()) {
        if code.len() == length {
            break;
        }
        if last == Some(symbol) {
            continue;
        }
        last = Some(symbol);
        code.push(symbol);
    }
    code
}

/// Cross-language soundex as a pluggable coder. Corpus entries are coded from
/// their Thai-script canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossSoundex {
    pub length: usize,
}

impl CrossSoundex {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for CrossSoundex {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl PhoneticCoder for CrossSoundex {
    fn encode(&self, text: &str) -> String {
        cross_soundex(text, self.length)
    }

    fn name(&self) -> &str {
        "cross"
    }

    fn source(&self) -> CodeSource {
        CodeSource::Canonical
    }
}
