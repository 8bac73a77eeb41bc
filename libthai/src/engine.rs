//! Thai engine: picks the phonetic algorithm at startup, builds the matching
//! corpus index and wraps the core `Engine` for lookups and sessions.
//!
//! The two algorithms code the corpus from different fields, so each engine
//! owns an index built for exactly one of them; queries are never ranked
//! against an index built with the other.

use std::sync::Arc;

use libthai_core::{
    CacheStats, CorpusIndex, CorpusProvider, CorpusRow, Engine as CoreEngine, Error, IndexStats,
    InputSession, Lookup, PhoneticCoder, Result, ScoredCandidate,
};
use tracing::info;

use crate::config::{PhoneticEngine, ThaiConfig};
use crate::cross_soundex::CrossSoundex;
use crate::overrides::builtin_rows;
use crate::soundex::ThaiSoundex;

/// Phonetic coder for a configuration.
pub fn coder_for(config: &ThaiConfig) -> Arc<dyn PhoneticCoder> {
    match config.phonetic_engine {
        PhoneticEngine::Thai => Arc::new(ThaiSoundex::new(config.code_length)),
        PhoneticEngine::Cross => Arc::new(CrossSoundex::new(config.code_length)),
    }
}

/// High-level Thai lookup engine.
///
/// Cheap to share: the inner core engine sits behind an `Arc`.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<CoreEngine>,
    config: ThaiConfig,
}

impl Engine {
    /// Build from explicit rows. Built-in overrides are placed first when
    /// enabled, so they win duplicate pairs.
    pub fn from_rows(rows: Vec<CorpusRow>, config: ThaiConfig) -> Result<Self> {
        config.validate()?;
        let rows = if config.builtin_overrides {
            let mut all = builtin_rows().to_vec();
            all.extend(rows);
            all
        } else {
            rows
        };

        let coder = coder_for(&config);
        let index = CorpusIndex::build(rows, coder.as_ref())?;
        info!(
            engine = %config.phonetic_engine,
            entries = index.len(),
            "thai engine ready"
        );
        let inner = CoreEngine::new(Arc::new(index), coder, config.base.clone())?;
        Ok(Self {
            inner: Arc::new(inner),
            config,
        })
    }

    /// Build from any corpus provider (file, in-memory rows, ...).
    ///
    /// Provider failures surface as `CorpusUnavailable`.
    pub fn from_provider<P>(provider: &P, config: ThaiConfig) -> Result<Self>
    where
        P: CorpusProvider + ?Sized,
    {
        let rows = provider.rows().map_err(|e| match e {
            Error::CorpusUnavailable(_) => e,
            other => Error::CorpusUnavailable(other.to_string()),
        })?;
        Self::from_rows(rows, config)
    }

    /// Engine over the built-in override rows only.
    pub fn builtin(mut config: ThaiConfig) -> Result<Self> {
        config.builtin_overrides = true;
        Self::from_rows(Vec::new(), config)
    }

    pub fn config(&self) -> &ThaiConfig {
        &self.config
    }

    pub fn phonetic_engine(&self) -> PhoneticEngine {
        self.config.phonetic_engine
    }

    /// Get a cloned Arc to the inner core engine.
    pub fn inner_arc(&self) -> Arc<CoreEngine> {
        Arc::clone(&self.inner)
    }

    /// Phonetic code of `text` under this engine's algorithm.
    pub fn encode(&self, text: &str) -> String {
        self.inner.ranker().coder().encode(text)
    }

    /// Up to `k` `(canonical_form, score)` results for a romanized query.
    pub fn lookup(&self, query: &str, k: usize) -> Vec<Lookup> {
        self.inner.lookup(query, k)
    }

    /// Lookup with the configured `top_k`.
    pub fn lookup_default(&self, query: &str) -> Vec<Lookup> {
        self.inner.lookup(query, self.config.base.top_k)
    }

    /// Independent lookups, ranked in parallel.
    pub fn lookup_batch<Q: AsRef<str> + Sync>(&self, queries: &[Q], k: usize) -> Vec<Vec<Lookup>> {
        self.inner.lookup_batch(queries, k)
    }

    /// Candidates with component scores, for verbose output.
    pub fn rank(&self, query: &str, k: usize) -> Vec<ScoredCandidate> {
        self.inner.rank(query, k)
    }

    pub fn session(&self) -> InputSession {
        self.inner.session()
    }

    pub fn stats(&self) -> IndexStats {
        self.inner.index().stats()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache_stats()
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("phonetic_engine", &self.config.phonetic_engine)
            .field("index", self.inner.index())
            .finish()
    }
}
