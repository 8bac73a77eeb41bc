//! Thai-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libthai_core::Config` (flattened via serde)
//! - The phonetic algorithm the corpus index is built with
//! - Code length for that algorithm
//! - Whether the built-in override rows are loaded ahead of the corpus
//!
//! # Example
//!
//! ```rust
//! use libthai::{PhoneticEngine, ThaiConfig};
//!
//! let config = ThaiConfig::from_toml_str("phonetic_engine = \"cross\"\ntop_k = 3\n").unwrap();
//! assert_eq!(config.phonetic_engine, PhoneticEngine::Cross);
//! assert_eq!(config.base.top_k, 3);
//! ```

use libthai_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phonetic algorithm used for both the corpus index and queries. Fixed for
/// the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneticEngine {
    /// Romanized Thai soundex; corpus codes come from romanized forms.
    #[default]
    Thai,
    /// Cross-language soundex; corpus codes come from Thai script.
    Cross,
}

impl PhoneticEngine {
    pub fn as_str(self) -> &'static str {
        match self {
            PhoneticEngine::Thai => "thai",
            PhoneticEngine::Cross => "cross",
        }
    }
}

impl fmt::Display for PhoneticEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhoneticEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thai" | "soundex" => Ok(PhoneticEngine::Thai),
            "cross" | "prayut" => Ok(PhoneticEngine::Cross),
            other => Err(format!("unknown phonetic engine '{}' (expected thai or cross)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThaiConfig {
    /// Base configuration fields (k, weights, scan cap, cache, etc.)
    #[serde(flatten)]
    pub base: libthai_core::Config,

    pub phonetic_engine: PhoneticEngine,

    /// Maximum phonetic code length
    pub code_length: usize,

    /// Load the built-in override rows ahead of the corpus
    pub builtin_overrides: bool,
}

impl Default for ThaiConfig {
    fn default() -> Self {
        Self {
            base: libthai_core::Config::default(),
            phonetic_engine: PhoneticEngine::Thai,
            code_length: 6,
            builtin_overrides: true,
        }
    }
}

impl ThaiConfig {
    /// Convert this Thai config into the base config for the core engine
    pub fn into_base(self) -> libthai_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libthai_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libthai_core::Config {
        &mut self.base
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if self.code_length == 0 {
            return Err(Error::InvalidConfig("code_length must be positive".into()));
        }
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ThaiConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
