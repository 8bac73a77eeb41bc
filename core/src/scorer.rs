//! Composite phonetic similarity between a query and a corpus entry.
//!
//! The score is a weighted sum of four normalized signals plus the entry's
//! priority weight, always summed in the same order:
//!
//! 1. `soundex_match`: 1.0 on equal phonetic codes, otherwise the share of
//!    code positions that agree
//! 2. `edit_distance`: `1 - levenshtein / max(len)`
//! 3. `ngram_similarity`: Jaccard similarity of character n-grams
//! 4. `prefix_bonus`: common prefix length over query length
//! 5. `priority_boost`: the entry's priority weight, unweighted

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use crate::candidate::{ComponentScores, ScoredCandidate};
use crate::corpus::CorpusEntry;
use crate::phonetic::PhoneticCoder;
use crate::Config;

/// Component weights, read from `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub soundex: f64,
    pub edit: f64,
    pub ngram: f64,
    pub prefix: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            soundex: 40.0,
            edit: 30.0,
            ngram: 20.0,
            prefix: 15.0,
        }
    }
}

impl Weights {
    /// Highest score reachable without the priority boost.
    pub fn max_similarity(&self) -> f64 {
        self.soundex + self.edit + self.ngram + self.prefix
    }
}

/// A normalized query with everything the scorer needs precomputed once per
/// ranking call instead of once per candidate.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    chars: Vec<char>,
    code: String,
    ngrams: AHashSet<String>,
}

impl Query {
    /// Prepare an already normalized query.
    pub fn new(text: &str, coder: &dyn PhoneticCoder, ngram_size: usize) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self {
            text: text.to_string(),
            ngrams: ngram_set(&chars, ngram_size),
            code: coder.encode(text),
            chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Scores one candidate entry against a prepared query.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &Query, entry: &Arc<CorpusEntry>) -> ScoredCandidate;

    /// n-gram size the query must be prepared with.
    fn ngram_size(&self) -> usize;
}

/// The weighted-sum scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    weights: Weights,
    ngram_size: usize,
}

impl SimilarityScorer {
    pub fn new(weights: Weights, ngram_size: usize) -> Self {
        Self {
            weights,
            ngram_size: ngram_size.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.weights(), config.ngram_size)
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Unweighted components for a query/entry pair.
    pub fn components(&self, query: &Query, entry: &CorpusEntry) -> ComponentScores {
        let entry_chars: SmallVec<[char; 32]> = entry.romanized_form.chars().collect();

        let ngram_similarity = if query.chars.len() < self.ngram_size
            || entry_chars.len() < self.ngram_size
        {
            0.0
        } else {
            jaccard(&query.ngrams, &ngram_set(&entry_chars, self.ngram_size))
        };

        let prefix_bonus = if query.chars.is_empty() {
            0.0
        } else {
            common_prefix_len(&query.chars, &entry_chars) as f64 / query.chars.len() as f64
        };

        ComponentScores {
            soundex_match: code_similarity(&query.code, &entry.phonetic_code),
            edit_distance: edit_similarity_chars(&query.chars, &entry_chars),
            ngram_similarity,
            prefix_bonus,
            priority_boost: entry.priority_weight,
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(Weights::default(), 2)
    }
}

impl Scorer for SimilarityScorer {
    fn score(&self, query: &Query, entry: &Arc<CorpusEntry>) -> ScoredCandidate {
        let c = self.components(query, entry);
        let w = &self.weights;

        let mut score = 0.0;
        score += w.soundex * c.soundex_match;
        score += w.edit * c.edit_distance;
        score += w.ngram * c.ngram_similarity;
        score += w.prefix * c.prefix_bonus;
        score += c.priority_boost;

        ScoredCandidate {
            entry: Arc::clone(entry),
            score,
            components: c,
        }
    }

    fn ngram_size(&self) -> usize {
        self.ngram_size
    }
}

/// Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: SmallVec<[char; 32]> = a.chars().collect();
    let b: SmallVec<[char; 32]> = b.chars().collect();
    levenshtein_chars(&a, &b)
}

fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // two rows instead of the full matrix
    let mut prev: SmallVec<[usize; 32]> = (0..=b.len()).collect();
    let mut curr: SmallVec<[usize; 32]> = SmallVec::from_elem(0, b.len() + 1);

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`; two empty strings are equal.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let a: SmallVec<[char; 32]> = a.chars().collect();
    let b: SmallVec<[char; 32]> = b.chars().collect();
    edit_similarity_chars(&a, &b)
}

fn edit_similarity_chars(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_chars(a, b) as f64 / longest as f64
}

/// Jaccard similarity of character n-grams; 0.0 when either side is shorter
/// than `n`.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if n == 0 || a.len() < n || b.len() < n {
        return 0.0;
    }
    jaccard(&ngram_set(&a, n), &ngram_set(&b, n))
}

fn ngram_set(chars: &[char], n: usize) -> AHashSet<String> {
    if n == 0 || chars.len() < n {
        return AHashSet::new();
    }
    chars.windows(n).map(|w| w.iter().collect::<String>()).collect()
}

fn jaccard(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// 1.0 for equal non-empty codes, otherwise the share of aligned positions
/// that agree, over the longer code. Empty codes never match.
pub fn code_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let a: SmallVec<[char; 16]> = a.chars().collect();
    let b: SmallVec<[char; 16]> = b.chars().collect();
    let agreeing = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    agreeing as f64 / a.len().max(b.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;
    use crate::phonetic::{FnCoder, NoPhoneticCode};

    fn entry(romanized: &str, code: &str, priority: f64) -> Arc<CorpusEntry> {
        Arc::new(CorpusEntry {
            id: 0,
            romanized_form: romanized.to_string(),
            canonical_form: "ท่า".to_string(),
            category: Category::Generic,
            priority_weight: priority,
            phonetic_code: code.to_string(),
        })
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("narak", "narak"), 0);
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("narak", "narok"), 1);
        assert_eq!(levenshtein("narak", "arak"), 1);
        assert_eq!(levenshtein("narak", "naraks"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("abc", "xyz"), 3);
        assert_eq!(levenshtein("คน", "คุณ"), 2);
    }

    #[test]
    fn test_levenshtein_past_inline_capacity() {
        // rows longer than the inline buffer spill to the heap
        let long = "kraikinkaikai".repeat(4);
        let mut changed = long.clone();
        changed.push_str("xyz");
        assert_eq!(levenshtein(&long, &long), 0);
        assert_eq!(levenshtein(&long, &changed), 3);
        assert_eq!(levenshtein("ab", &long), long.len() - 1);
        assert_eq!(edit_similarity(&long, &long), 1.0);
    }

    #[test]
    fn test_edit_similarity() {
        assert_eq!(edit_similarity("kon", "kon"), 1.0);
        assert!((edit_similarity("kon", "kan") - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(edit_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_bigram_example() {
        let sim = ngram_similarity("abc", "abd", 2);
        assert!((sim - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{:.3}", sim), "0.333");
    }

    #[test]
    fn test_ngram_short_strings() {
        assert_eq!(ngram_similarity("a", "ab", 2), 0.0);
        assert_eq!(ngram_similarity("ab", "ab", 2), 1.0);
        assert_eq!(ngram_similarity("ab", "ab", 0), 0.0);
    }

    #[test]
    fn test_code_similarity() {
        assert_eq!(code_similarity("4A5A1", "4A5A1"), 1.0);
        assert!((code_similarity("4A5A1", "4A5A") - 0.8).abs() < 1e-9);
        assert_eq!(code_similarity("", ""), 0.0);
        assert_eq!(code_similarity("12", "21"), 0.0);
    }

    #[test]
    fn test_exact_match_components() {
        let coder = FnCoder(|s: &str| s.to_ascii_uppercase());
        let scorer = SimilarityScorer::default();
        let query = Query::new("tha", &coder, 2);
        let e = entry("tha", "THA", 0.0);

        let cand = scorer.score(&query, &e);
        assert_eq!(cand.components.soundex_match, 1.0);
        assert_eq!(cand.components.edit_distance, 1.0);
        assert_eq!(cand.components.ngram_similarity, 1.0);
        assert_eq!(cand.components.prefix_bonus, 1.0);
        assert_eq!(cand.score, 105.0);
    }

    #[test]
    fn test_short_query_zeroes_ngram_only() {
        let scorer = SimilarityScorer::default();
        let query = Query::new("t", &NoPhoneticCode, 2);
        let cand = scorer.score(&query, &entry("tha", "", 0.0));

        assert_eq!(cand.components.ngram_similarity, 0.0);
        assert_eq!(cand.components.prefix_bonus, 1.0);
        assert!((cand.components.edit_distance - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(cand.components.soundex_match, 0.0);
    }

    #[test]
    fn test_priority_is_added_unweighted() {
        let scorer = SimilarityScorer::default();
        let query = Query::new("xyz", &NoPhoneticCode, 2);
        let plain = scorer.score(&query, &entry("abc", "", 0.0));
        let boosted = scorer.score(&query, &entry("abc", "", 7.5));
        assert_eq!(plain.score, 0.0);
        assert_eq!(boosted.score, 7.5);
        assert_eq!(boosted.components.priority_boost, 7.5);
    }

    #[test]
    fn test_weights_are_respected() {
        let weights = Weights {
            soundex: 0.0,
            edit: 1.0,
            ngram: 0.0,
            prefix: 0.0,
        };
        let scorer = SimilarityScorer::new(weights, 2);
        let query = Query::new("kon", &NoPhoneticCode, 2);
        let cand = scorer.score(&query, &entry("kan", "", 0.0));
        assert!((cand.score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(weights.max_similarity(), 1.0);
    }
}
