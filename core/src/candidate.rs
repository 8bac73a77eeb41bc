//! Scored candidate types.
//!
//! This module provides:
//! - `ScoredCandidate`: a corpus entry with its composite score and the
//!   per-component breakdown, created fresh for every query
//! - `Lookup`: the flattened `(canonical_form, score)` view returned by one-shot
//!   lookups

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::corpus::CorpusEntry;

/// Unweighted similarity components, each in `0.0..=1.0` except the priority
/// boost which is the entry's priority weight as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    pub soundex_match: f64,
    pub edit_distance: f64,
    pub ngram_similarity: f64,
    pub prefix_bonus: f64,
    pub priority_boost: f64,
}

/// A corpus entry scored against one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub entry: Arc<CorpusEntry>,
    pub score: f64,
    pub components: ComponentScores,
}

impl ScoredCandidate {
    pub fn canonical_form(&self) -> &str {
        &self.entry.canonical_form
    }

    pub fn romanized_form(&self) -> &str {
        &self.entry.romanized_form
    }

    /// Ranking order: score descending, then priority weight descending, then
    /// corpus insertion order.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.entry.priority_weight.total_cmp(&self.entry.priority_weight))
            .then_with(|| self.entry.id.cmp(&other.entry.id))
    }

    pub fn to_lookup(&self) -> Lookup {
        Lookup {
            canonical_form: self.entry.canonical_form.clone(),
            romanized_form: self.entry.romanized_form.clone(),
            score: self.score,
        }
    }
}

/// Sort candidates into ranking order. The order is total, so repeated calls on
/// the same input always agree.
pub fn sort_candidates(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| a.rank_cmp(b));
}

/// One-shot lookup result.
///
/// `romanized_form` is the matched corpus romanization, or the split that
/// produced a compound match (`"left+right"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    pub canonical_form: String,
    pub romanized_form: String,
    pub score: f64,
}

impl Lookup {
    pub fn new<C: Into<String>, R: Into<String>>(canonical: C, romanized: R, score: f64) -> Self {
        Self {
            canonical_form: canonical.into(),
            romanized_form: romanized.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;

    fn candidate(id: u32, priority: f64, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            entry: Arc::new(CorpusEntry {
                id,
                romanized_form: format!("r{}", id),
                canonical_form: format!("c{}", id),
                category: Category::Generic,
                priority_weight: priority,
                phonetic_code: String::new(),
            }),
            score,
            components: ComponentScores::default(),
        }
    }

    #[test]
    fn test_sort_by_score_then_priority_then_id() {
        let mut cands = vec![
            candidate(3, 0.0, 50.0),
            candidate(2, 5.0, 50.0),
            candidate(1, 0.0, 50.0),
            candidate(0, 0.0, 10.0),
            candidate(4, 0.0, 90.0),
        ];
        sort_candidates(&mut cands);
        let ids: Vec<u32> = cands.iter().map(|c| c.entry.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3, 0]);
    }

    #[test]
    fn test_to_lookup() {
        let lookup = candidate(7, 0.0, 42.5).to_lookup();
        assert_eq!(lookup, Lookup::new("c7", "r7", 42.5));
    }
}
