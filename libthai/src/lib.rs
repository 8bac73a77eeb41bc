//! libthai crate root
//!
//! This crate provides the Thai phonetic coders, the built-in override rows
//! and a high-level `Engine` that composes them with the shared
//! `libthai-core` index, ranker and input session.
//!
//! Public API exported here:
//! - `ThaiSoundex` and `thai_soundex` from `soundex`
//! - `CrossSoundex` and `cross_soundex` from `cross_soundex`
//! - `Engine` and `coder_for` from `engine`
//! - `ThaiConfig` and `PhoneticEngine` from `config`

pub mod config;
pub mod cross_soundex;
pub mod engine;
pub mod overrides;
pub mod soundex;

// Session and result types callers need alongside the engine.
pub use libthai_core::{
    CacheStats, Category, ComponentScores, Config, CorpusFile, CorpusFormat, CorpusProvider,
    CorpusRow, Error, FeedResult, IndexStats, InputSession, KeyEvent, Lookup, Notice,
    PhoneticCoder, RenderState, Result, ScoredCandidate, SessionState,
};

pub use config::{PhoneticEngine, ThaiConfig};
pub use cross_soundex::{cross_soundex, CrossSoundex};
pub use engine::{coder_for, Engine};
pub use overrides::builtin_rows;
pub use soundex::{thai_soundex, ThaiSoundex};
