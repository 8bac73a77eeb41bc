//! Engine facade: cached one-shot lookups, parallel batches and sessions.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use ahash::AHashMap;
use lru::LruCache;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::candidate::{Lookup, ScoredCandidate};
use crate::error::Result;
use crate::index::CorpusIndex;
use crate::phonetic::PhoneticCoder;
use crate::ranker::Ranker;
use crate::session::InputSession;
use crate::{utils, Config};

const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Cache counters, for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate as a percentage (0.0 to 100.0), `None` before any access.
    pub fn hit_rate(&self) -> Option<f32> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f32 / total as f32 * 100.0)
        }
    }
}

/// Main entry point for lookups.
///
/// The index and ranker are read-only and shared, so an `Engine` can be used
/// from several threads at once; only the result cache sits behind a lock.
pub struct Engine {
    ranker: Arc<Ranker>,
    config: Config,
    cache: Mutex<LruCache<(String, usize), Vec<Lookup>>>,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl Engine {
    /// Build an engine over an index. Fails only on an invalid config.
    pub fn new(
        index: Arc<CorpusIndex>,
        coder: Arc<dyn PhoneticCoder>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        let ranker = Ranker::new(index, coder, &config);
        let capacity = NonZeroUsize::new(config.max_cache_size).unwrap_or(DEFAULT_CACHE_SIZE);
        Ok(Self {
            ranker: Arc::new(ranker),
            config,
            cache: Mutex::new(LruCache::new(capacity)),
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ranker(&self) -> &Arc<Ranker> {
        &self.ranker
    }

    pub fn index(&self) -> &Arc<CorpusIndex> {
        self.ranker.index()
    }

    /// Start an input session sharing this engine's ranker.
    pub fn session(&self) -> InputSession {
        InputSession::new(Arc::clone(&self.ranker), self.config.top_k)
    }

    /// Scored candidates with their component breakdown (uncached).
    pub fn rank(&self, query: &str, k: usize) -> Vec<ScoredCandidate> {
        let started = Instant::now();
        let ranked = self.ranker.rank(query, k);
        self.check_slow(query, started.elapsed());
        ranked
    }

    /// One-shot lookup: up to `k` `(canonical_form, score)` results, best first.
    ///
    /// Results are cached per (normalized query, k). With `compound_matching`
    /// enabled, two-part splits of the query are merged in as well.
    pub fn lookup(&self, query: &str, k: usize) -> Vec<Lookup> {
        let normalized = utils::normalize_romanized(query);
        if normalized.is_empty() || k == 0 {
            return Vec::new();
        }

        let key = (normalized, k);
        if let Some(cached) = self.lock_cache().get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }
        self.cache_misses.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let results = if self.config.compound_matching {
            let direct = self.ranker.rank(&key.0, usize::MAX);
            self.merge_compounds(&key.0, k, direct)
        } else {
            self.ranker
                .rank(&key.0, k)
                .iter()
                .map(ScoredCandidate::to_lookup)
                .collect()
        };
        self.check_slow(&key.0, started.elapsed());

        self.lock_cache().put(key, results.clone());
        results
    }

    /// Look up independent queries in parallel. Output order follows input.
    pub fn lookup_batch<Q>(&self, queries: &[Q], k: usize) -> Vec<Vec<Lookup>>
    where
        Q: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|q| self.lookup(q.as_ref(), k))
            .collect()
    }

    /// Two-part splits `left + right` of a normalized query, each half matched
    /// on its own. Both halves need `compound_min_score`; the joined result
    /// scores `mean - compound_penalty`.
    pub fn compounds(&self, normalized: &str) -> Vec<Lookup> {
        let chars: Vec<char> = normalized.chars().collect();
        let mut out = Vec::new();
        if chars.len() < 4 {
            return out;
        }

        for split in 2..chars.len() - 1 {
            let left: String = chars[..split].iter().collect();
            let right: String = chars[split..].iter().collect();
            let (Some(l), Some(r)) = (
                self.ranker.rank(&left, 1).into_iter().next(),
                self.ranker.rank(&right, 1).into_iter().next(),
            ) else {
                continue;
            };
            let min = self.config.compound_min_score;
            if l.score < min || r.score < min {
                continue;
            }
            out.push(Lookup::new(
                format!("{}{}", l.canonical_form(), r.canonical_form()),
                format!("{}+{}", left, right),
                (l.score + r.score) / 2.0 - self.config.compound_penalty,
            ));
        }
        out
    }

    /// Union of every direct candidate and every compound, one result per
    /// canonical form at its best score, truncated once. The merged set does
    /// not depend on `k`, so `lookup(q, k)` is a prefix of `lookup(q, k + 1)`.
    fn merge_compounds(
        &self,
        normalized: &str,
        k: usize,
        direct: Vec<ScoredCandidate>,
    ) -> Vec<Lookup> {
        let compounds = self.compounds(normalized);
        let added = compounds.len();
        let mut slot: AHashMap<String, usize> = AHashMap::with_capacity(direct.len() + added);
        let mut merged: Vec<Lookup> = Vec::with_capacity(direct.len() + added);

        for found in direct.iter().map(ScoredCandidate::to_lookup).chain(compounds) {
            match slot.get(&found.canonical_form) {
                Some(&i) => {
                    if found.score > merged[i].score {
                        merged[i] = found;
                    }
                }
                None => {
                    slot.insert(found.canonical_form.clone(), merged.len());
                    merged.push(found);
                }
            }
        }

        // stable: direct matches keep precedence on equal scores
        merged.sort_by(|a, b| b.score.total_cmp(&a.score));
        merged.truncate(k);
        if added > 0 {
            debug!(query = normalized, added, "merged compound matches");
        }
        merged
    }

    fn check_slow(&self, query: &str, elapsed: Duration) {
        if elapsed > Duration::from_millis(self.config.slow_query_ms) {
            warn!(
                query,
                elapsed_ms = elapsed.as_millis() as u64,
                entries = self.ranker.index().len(),
                "slow query"
            );
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, LruCache<(String, usize), Vec<Lookup>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.lock_cache();
        CacheStats {
            hits: self.cache_hits.load(Ordering::Relaxed),
            misses: self.cache_misses.load(Ordering::Relaxed),
            size: cache.len(),
            capacity: cache.cap().get(),
        }
    }

    /// Clear the cache and its counters.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
    }
}
