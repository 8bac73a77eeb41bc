//! libthai-core
//!
//! Language-agnostic matching and ranking engine shared by the Thai language
//! crate: an immutable corpus index, a composite phonetic similarity scorer,
//! a top-K ranker and the incremental input session driving it.
//!
//! The phonetic-code algorithm itself is pluggable (see [`PhoneticCoder`]), and
//! the corpus comes from anything implementing [`CorpusProvider`].
//!
//! Public API:
//! - `CorpusIndex` - Phonetic buckets plus an FST prefix map over the corpus
//! - `SimilarityScorer` - Weighted sum of soundex/edit/n-gram/prefix signals
//! - `Ranker` - Bounded candidate gathering and deterministic top-K
//! - `InputSession` - Keystroke-driven suggestion/commit state machine
//! - `Engine` - Cached one-shot and parallel batch lookups
//! - `Config` - Configuration (TOML)
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod corpus;
pub use corpus::{
    priority_from_frequency, Category, CorpusEntry, CorpusFile, CorpusFormat, CorpusProvider,
    CorpusRow, CorpusSnapshot,
};

pub mod phonetic;
pub use phonetic::{CodeSource, FnCoder, NoPhoneticCode, PhoneticCoder};

pub mod index;
pub use index::{CorpusIndex, IndexStats};

pub mod candidate;
pub use candidate::{ComponentScores, Lookup, ScoredCandidate};

pub mod scorer;
pub use scorer::{Query, Scorer, SimilarityScorer, Weights};

pub mod ranker;
pub use ranker::Ranker;

pub mod session;
pub use session::{FeedResult, InputSession, KeyEvent, Notice, RenderState, SessionState};

pub mod engine;
pub use engine::{CacheStats, Engine};

/// Generic configuration for the matching engine.
///
/// Contains only language-agnostic options. Phonetic algorithm selection and
/// other Thai-specific settings live in `ThaiConfig` in the language crate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Number of suggestions returned (and selectable with digit keys).
    pub top_k: usize,
    /// Hard cap on the fallback full scan.
    pub scan_cap: usize,

    // Component weights
    pub soundex_weight: f64,
    pub edit_weight: f64,
    pub ngram_weight: f64,
    pub prefix_weight: f64,

    /// Character n-gram size for the Jaccard component.
    pub ngram_size: usize,
    /// Number of leading query characters used for prefix candidates.
    pub prefix_len: usize,

    // Cache Management
    /// Maximum number of entries in the query -> lookups cache
    pub max_cache_size: usize,
    /// Rankings slower than this are logged at warn level.
    pub slow_query_ms: u64,

    // Compound matching (one-shot lookups only)
    pub compound_matching: bool,
    pub compound_penalty: f64,
    pub compound_min_score: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_k: 5,
            scan_cap: 50_000,
            soundex_weight: 40.0,
            edit_weight: 30.0,
            ngram_weight: 20.0,
            prefix_weight: 15.0,
            ngram_size: 2,
            prefix_len: 3,
            max_cache_size: 1000,
            slow_query_ms: 50,
            // Compounds
            compound_matching: false,
            compound_penalty: 30.0,
            compound_min_score: 50.0,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scorer weights as a bundle.
    pub fn weights(&self) -> Weights {
        Weights {
            soundex: self.soundex_weight,
            edit: self.edit_weight,
            ngram: self.ngram_weight,
            prefix: self.prefix_weight,
        }
    }

    /// Check option ranges.
    ///
    /// `top_k` is limited to 1..=9 because suggestions are selected with a
    /// single digit key.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.top_k) {
            return Err(Error::InvalidConfig(format!(
                "top_k must be within 1..=9, got {}",
                self.top_k
            )));
        }
        if self.ngram_size == 0 {
            return Err(Error::InvalidConfig("ngram_size must be positive".into()));
        }
        if self.prefix_len == 0 {
            return Err(Error::InvalidConfig("prefix_len must be positive".into()));
        }
        let weights = [
            ("soundex_weight", self.soundex_weight),
            ("edit_weight", self.edit_weight),
            ("ngram_weight", self.ngram_weight),
            ("prefix_weight", self.prefix_weight),
        ];
        for (name, value) in weights {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        s.nfc().collect::<String>().trim().to_string()
    }

    /// Normalize a romanized form or query: NFC, lowercase, whitespace and
    /// control characters removed.
    pub fn normalize_romanized(s: &str) -> String {
        s.nfc()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .flat_map(char::to_lowercase)
            .collect()
    }
}
