//! Candidate gathering and top-K ranking.
//!
//! Per query the ranker:
//! 1. short-circuits an empty (normalized) query to an empty result
//! 2. unions the phonetic bucket of the query code with the romanized-prefix
//!    candidates of the first `prefix_len` characters
//! 3. falls back to a capped full scan when that union holds fewer than the
//!    configured `top_k` entries
//! 4. scores, sorts (score, priority, insertion order) and truncates to `k`
//!
//! The candidate set never depends on the requested `k`, so `rank(q, k)` is
//! always a prefix of `rank(q, k + 1)`.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::candidate::{sort_candidates, Lookup, ScoredCandidate};
use crate::corpus::CorpusEntry;
use crate::index::CorpusIndex;
use crate::phonetic::PhoneticCoder;
use crate::scorer::{Query, Scorer, SimilarityScorer};
use crate::{utils, Config};

/// Ranks corpus entries for romanized queries.
///
/// Holds only shared, read-only state, so one ranker can serve any number of
/// sessions and threads.
pub struct Ranker<S = SimilarityScorer> {
    index: Arc<CorpusIndex>,
    coder: Arc<dyn PhoneticCoder>,
    scorer: S,
    scan_cap: usize,
    prefix_len: usize,
    fallback_below: usize,
}

impl Ranker<SimilarityScorer> {
    /// Ranker using the weighted-sum scorer configured from `config`.
    pub fn new(index: Arc<CorpusIndex>, coder: Arc<dyn PhoneticCoder>, config: &Config) -> Self {
        Self::with_scorer(index, coder, SimilarityScorer::from_config(config), config)
    }
}

impl<S: Scorer> Ranker<S> {
    pub fn with_scorer(
        index: Arc<CorpusIndex>,
        coder: Arc<dyn PhoneticCoder>,
        scorer: S,
        config: &Config,
    ) -> Self {
        Self {
            index,
            coder,
            scorer,
            scan_cap: config.scan_cap,
            prefix_len: config.prefix_len.max(1),
            fallback_below: config.top_k,
        }
    }

    pub fn index(&self) -> &Arc<CorpusIndex> {
        &self.index
    }

    pub fn coder(&self) -> &Arc<dyn PhoneticCoder> {
        &self.coder
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Normalize and prepare a query. `None` for input that normalizes to
    /// nothing.
    pub fn prepare(&self, raw: &str) -> Option<Query> {
        let text = utils::normalize_romanized(raw);
        if text.is_empty() {
            return None;
        }
        Some(Query::new(&text, self.coder.as_ref(), self.scorer.ngram_size()))
    }

    /// Top-`k` candidates for `query`, best first. Never fails: an empty query
    /// or `k == 0` yields an empty vector without scoring anything.
    ///
    /// The candidate set is gathered independently of `k`: the fallback scan
    /// only runs when bucket and prefix candidates number fewer than the
    /// configured `top_k`. A `k` above `top_k` can therefore return fewer than
    /// `k` results even when the corpus holds more entries.
    pub fn rank(&self, query: &str, k: usize) -> Vec<ScoredCandidate> {
        if k == 0 {
            return Vec::new();
        }
        match self.prepare(query) {
            Some(prepared) => self.rank_prepared(&prepared, k),
            None => Vec::new(),
        }
    }

    /// Rank an already prepared query.
    pub fn rank_prepared(&self, query: &Query, k: usize) -> Vec<ScoredCandidate> {
        if k == 0 || query.is_empty() {
            return Vec::new();
        }

        let candidates = self.gather(query);
        let mut scored: Vec<ScoredCandidate> = candidates
            .values()
            .map(|entry| self.scorer.score(query, entry))
            .collect();

        sort_candidates(&mut scored);
        scored.truncate(k);

        debug!(
            query = query.text(),
            code = query.code(),
            candidates = candidates.len(),
            returned = scored.len(),
            "ranked query"
        );
        scored
    }

    /// Bucket ∪ prefix candidates, topped up from the capped scan when the
    /// union is smaller than `top_k`. Keyed by entry id so the set is
    /// deduplicated and iterates in insertion order.
    fn gather(&self, query: &Query) -> BTreeMap<u32, &Arc<CorpusEntry>> {
        let mut set: BTreeMap<u32, &Arc<CorpusEntry>> = BTreeMap::new();

        for entry in self.index.candidates_for_phonetic_code(query.code()) {
            set.insert(entry.id, entry);
        }

        let prefix: String = query.text().chars().take(self.prefix_len).collect();
        for entry in self.index.candidates_for_prefix(&prefix) {
            set.insert(entry.id, entry);
        }

        if set.len() < self.fallback_below {
            let before = set.len();
            for entry in self.index.all_entries(self.scan_cap) {
                set.insert(entry.id, entry);
            }
            debug!(
                query = query.text(),
                indexed = before,
                scanned = set.len() - before,
                "fallback scan"
            );
        }

        set
    }

    /// Convenience: the flattened `(canonical_form, score)` view.
    pub fn lookup(&self, query: &str, k: usize) -> Vec<Lookup> {
        self.rank(query, k).iter().map(ScoredCandidate::to_lookup).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Category, CorpusRow};
    use crate::phonetic::{FnCoder, NoPhoneticCode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingScorer {
        inner: SimilarityScorer,
        calls: AtomicUsize,
    }

    impl Scorer for CountingScorer {
        fn score(&self, query: &Query, entry: &Arc<CorpusEntry>) -> ScoredCandidate {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.score(query, entry)
        }

        fn ngram_size(&self) -> usize {
            self.inner.ngram_size()
        }
    }

    fn index(rows: Vec<CorpusRow>) -> Arc<CorpusIndex> {
        Arc::new(CorpusIndex::build(rows, &NoPhoneticCode).unwrap())
    }

    fn counting_ranker(rows: Vec<CorpusRow>, config: &Config) -> Ranker<CountingScorer> {
        let scorer = CountingScorer {
            inner: SimilarityScorer::from_config(config),
            calls: AtomicUsize::new(0),
        };
        Ranker::with_scorer(index(rows), Arc::new(NoPhoneticCode), scorer, config)
    }

    fn sample_rows() -> Vec<CorpusRow> {
        vec![
            CorpusRow::new("kon", "คน", Category::Generic),
            CorpusRow::new("kan", "กัน", Category::Generic),
            CorpusRow::new("khun", "คุณ", Category::Generic),
            CorpusRow::new("rak", "รัก", Category::Generic),
            CorpusRow::new("narak", "น่ารัก", Category::Override),
        ]
    }

    #[test]
    fn test_empty_query_scores_nothing() {
        let ranker = counting_ranker(sample_rows(), &Config::default());
        assert!(ranker.rank("", 5).is_empty());
        assert!(ranker.rank("   ", 5).is_empty());
        assert_eq!(ranker.scorer().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_k_scores_nothing() {
        let ranker = counting_ranker(sample_rows(), &Config::default());
        assert!(ranker.rank("kon", 0).is_empty());
        assert_eq!(ranker.scorer().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let ranker = Ranker::new(index(sample_rows()), Arc::new(NoPhoneticCode), &Config::default());
        let results = ranker.rank("kon", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].canonical_form(), "คน");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_prefix_union_avoids_scan_when_large_enough() {
        let mut rows: Vec<CorpusRow> = (0..20)
            .map(|i| CorpusRow::new(format!("ka{}", i), format!("ก{}", i), Category::Generic))
            .collect();
        rows.push(CorpusRow::new("zzz", "ซ", Category::Generic));
        let ranker = counting_ranker(rows, &Config::default());

        let results = ranker.rank("ka", 5);
        assert_eq!(results.len(), 5);
        // only the 20 "ka" prefix candidates are scored, not "zzz"
        assert_eq!(ranker.scorer().calls.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn test_k_above_top_k_does_not_widen_candidates() {
        // "ka" prefix yields 3 candidates, enough for top_k = 2
        let rows = vec![
            CorpusRow::new("kan", "กัน", Category::Generic),
            CorpusRow::new("kap", "กับ", Category::Generic),
            CorpusRow::new("kao", "ข้าว", Category::Generic),
            CorpusRow::new("rak", "รัก", Category::Generic),
            CorpusRow::new("nam", "น้ำ", Category::Generic),
        ];
        let config = Config { top_k: 2, ..Config::default() };
        let ranker = Ranker::new(index(rows), Arc::new(NoPhoneticCode), &config);

        let wide = ranker.rank("ka", 9);
        assert_eq!(wide.len(), 3);
        assert_eq!(ranker.rank("ka", 2)[..], wide[..2]);
    }

    #[test]
    fn test_fallback_scan_is_capped() {
        let rows: Vec<CorpusRow> = (0..10)
            .map(|i| CorpusRow::new(format!("w{}", i), format!("ว{}", i), Category::Generic))
            .collect();
        let mut config = Config::default();
        config.scan_cap = 4;
        let ranker = counting_ranker(rows, &config);

        let results = ranker.rank("xyz", 5);
        assert_eq!(results.len(), 4);
        assert_eq!(ranker.scorer().calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_phonetic_bucket_contributes_candidates() {
        // every word collapses to its consonant skeleton
        let coder = FnCoder(|s: &str| s.chars().filter(|c| !"aeiou".contains(*c)).collect::<String>());
        let rows = vec![
            CorpusRow::new("kin", "กิน", Category::Generic),
            CorpusRow::new("gin", "กิน", Category::Generic),
            CorpusRow::new("zzz", "ซ", Category::Generic),
        ];
        let index = Arc::new(CorpusIndex::build(rows, &coder).unwrap());
        let ranker = Ranker::new(index, Arc::new(coder), &Config::default());

        // "kan" shares only the "kn" bucket with "kin"; the "kan" prefix adds nothing
        let results = ranker.rank("kan", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].romanized_form(), "kin");
        assert_eq!(results[0].components.soundex_match, 1.0);
    }

    #[test]
    fn test_ties_break_by_priority_then_insertion_order() {
        let rows = vec![
            CorpusRow::new("tha", "ทา", Category::Generic),
            CorpusRow::new("tha", "ท่า", Category::Generic),
            CorpusRow::new("tha", "ถ้า", Category::Country),
        ];
        let ranker = Ranker::new(index(rows), Arc::new(NoPhoneticCode), &Config::default());
        let forms: Vec<String> = ranker
            .rank("tha", 3)
            .iter()
            .map(|c| c.canonical_form().to_string())
            .collect();
        assert_eq!(forms, vec!["ถ้า", "ทา", "ท่า"]);
    }

    #[test]
    fn test_query_is_normalized() {
        let ranker = Ranker::new(index(sample_rows()), Arc::new(NoPhoneticCode), &Config::default());
        let a = ranker.lookup("KON", 2);
        let b = ranker.lookup(" k o n ", 2);
        assert_eq!(a, b);
        assert_eq!(a[0].canonical_form, "คน");
    }
}
