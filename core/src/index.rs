//! Immutable in-memory corpus index.
//!
//! Built once from provider rows, then read-only for the rest of the process.
//! Two access paths bound the per-keystroke candidate set:
//!
//! - phonetic buckets: exact phonetic code -> entry ids (insertion order)
//! - prefix map: an FST over lowercased romanized forms, each key pointing to a
//!   posting list of entry ids, searched with a `starts_with` automaton
//!
//! A capped full scan is available as the fallback path.

use ahash::{AHashMap, AHashSet};
use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Map, Streamer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::corpus::{Category, CorpusEntry, CorpusProvider, CorpusRow};
use crate::error::{Error, Result};
use crate::phonetic::{CodeSource, PhoneticCoder};
use crate::utils;

/// Summary counts, mostly for the CLI and tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub entries: usize,
    pub phonetic_buckets: usize,
    pub prefix_keys: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub coder: String,
}

pub struct CorpusIndex {
    entries: Vec<Arc<CorpusEntry>>,
    buckets: AHashMap<String, Vec<u32>>,
    prefix_map: Map<Vec<u8>>,
    postings: Vec<Vec<u32>>,
    coder_name: String,
    code_source: CodeSource,
}

impl CorpusIndex {
    /// Pull the rows from a provider and build the index.
    ///
    /// Any provider failure is reported as `CorpusUnavailable`.
    pub fn from_provider<P>(provider: &P, coder: &dyn PhoneticCoder) -> Result<Self>
    where
        P: CorpusProvider + ?Sized,
    {
        let rows = provider.rows().map_err(|e| match e {
            Error::CorpusUnavailable(_) => e,
            other => Error::CorpusUnavailable(other.to_string()),
        })?;
        Self::build(rows, coder)
    }

    /// Build the index from rows, computing each entry's phonetic code.
    ///
    /// Rows with an empty canonical form are skipped. Rows with an empty
    /// romanized form are kept only when the coder reads the canonical form
    /// and yields a code; they get a bucket but no prefix key. A repeated
    /// (romanized, canonical) pair keeps its first occurrence.
    pub fn build(rows: Vec<CorpusRow>, coder: &dyn PhoneticCoder) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::CorpusUnavailable(
                "provider returned zero rows".into(),
            ));
        }

        let code_source = coder.source();
        let mut entries: Vec<Arc<CorpusEntry>> = Vec::with_capacity(rows.len());
        let mut buckets: AHashMap<String, Vec<u32>> = AHashMap::new();
        let mut keyed: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        let mut seen: AHashSet<(String, String)> = AHashSet::with_capacity(rows.len());
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for row in rows {
            let romanized = utils::normalize_romanized(&row.romanized_form);
            let canonical = utils::normalize(&row.canonical_form);
            let phonetic_code = match code_source {
                CodeSource::Romanized => coder.encode(&romanized),
                CodeSource::Canonical => coder.encode(&canonical),
            };
            // script-coded rows stay reachable through their bucket alone
            let orphan = romanized.is_empty()
                && (code_source == CodeSource::Romanized || phonetic_code.is_empty());
            if canonical.is_empty() || orphan {
                warn!(
                    romanized = %row.romanized_form,
                    canonical = %row.canonical_form,
                    "skipping corpus row with an empty form"
                );
                skipped += 1;
                continue;
            }
            if !seen.insert((romanized.clone(), canonical.clone())) {
                duplicates += 1;
                continue;
            }

            let id = u32::try_from(entries.len()).map_err(|_| {
                Error::CorpusUnavailable("corpus exceeds u32::MAX entries".into())
            })?;

            let priority_weight = if row.priority_weight.is_finite() {
                row.priority_weight
            } else {
                row.category.default_priority()
            };

            if !phonetic_code.is_empty() {
                buckets.entry(phonetic_code.clone()).or_default().push(id);
            }
            if !romanized.is_empty() {
                keyed.entry(romanized.clone()).or_default().push(id);
            }

            entries.push(Arc::new(CorpusEntry {
                id,
                romanized_form: romanized,
                canonical_form: canonical,
                category: row.category,
                priority_weight,
                phonetic_code,
            }));
        }

        if entries.is_empty() {
            return Err(Error::CorpusUnavailable(format!(
                "no usable rows ({} skipped)",
                skipped
            )));
        }

        // BTreeMap iteration is already in byte order, as the FST builder requires.
        let mut postings = Vec::with_capacity(keyed.len());
        let mut keys = Vec::with_capacity(keyed.len());
        for (key, ids) in keyed {
            keys.push((key, postings.len() as u64));
            postings.push(ids);
        }
        let prefix_map = Map::from_iter(keys)
            .map_err(|e| Error::CorpusUnavailable(format!("building prefix map: {}", e)))?;

        info!(
            entries = entries.len(),
            buckets = buckets.len(),
            prefix_keys = postings.len(),
            skipped,
            duplicates,
            coder = coder.name(),
            "corpus index built"
        );

        Ok(Self {
            entries,
            buckets,
            prefix_map,
            postings,
            coder_name: coder.name().to_string(),
            code_source,
        })
    }

    /// Entries whose romanized form starts with `prefix` (ASCII case-insensitive),
    /// in insertion order. An empty prefix matches nothing.
    pub fn candidates_for_prefix(&self, prefix: &str) -> Vec<&Arc<CorpusEntry>> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut ids: Vec<u32> = Vec::new();
        let mut stream = self
            .prefix_map
            .search(Str::new(&prefix).starts_with())
            .into_stream();
        while let Some((_, posting)) = stream.next() {
            if let Some(list) = self.postings.get(posting as usize) {
                ids.extend_from_slice(list);
            }
        }
        ids.sort_unstable();

        debug!(prefix = %prefix, matches = ids.len(), "prefix lookup");
        ids.into_iter()
            .filter_map(|id| self.entries.get(id as usize))
            .collect()
    }

    /// Entries in the bucket for exactly `code`, in insertion order.
    pub fn candidates_for_phonetic_code(&self, code: &str) -> Vec<&Arc<CorpusEntry>> {
        if code.is_empty() {
            return Vec::new();
        }
        match self.buckets.get(code) {
            Some(ids) => ids
                .iter()
                .filter_map(|&id| self.entries.get(id as usize))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Full scan over the corpus in insertion order, hard-capped at `cap`
    /// entries. The iterator is `Clone`, so a scan can be restarted.
    pub fn all_entries(&self, cap: usize) -> std::iter::Take<std::slice::Iter<'_, Arc<CorpusEntry>>> {
        self.entries.iter().take(cap)
    }

    pub fn entry(&self, id: u32) -> Option<&Arc<CorpusEntry>> {
        self.entries.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn coder_name(&self) -> &str {
        &self.coder_name
    }

    pub fn code_source(&self) -> CodeSource {
        self.code_source
    }

    pub fn stats(&self) -> IndexStats {
        let mut by_category = BTreeMap::new();
        for entry in &self.entries {
            *by_category.entry(entry.category).or_insert(0) += 1;
        }
        IndexStats {
            entries: self.entries.len(),
            phonetic_buckets: self.buckets.len(),
            prefix_keys: self.postings.len(),
            by_category,
            coder: self.coder_name.clone(),
        }
    }
}

impl fmt::Debug for CorpusIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpusIndex")
            .field("entries", &self.entries.len())
            .field("buckets", &self.buckets.len())
            .field("prefix_keys", &self.postings.len())
            .field("coder", &self.coder_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonetic::{FnCoder, NoPhoneticCode};

    /// First letter of each word, uppercased: crude but predictable buckets.
    fn initial_coder() -> FnCoder<fn(&str) -> String> {
        fn initial(s: &str) -> String {
            s.chars().next().map(|c| c.to_ascii_uppercase().to_string()).unwrap_or_default()
        }
        FnCoder(initial)
    }

    fn rows() -> Vec<CorpusRow> {
        vec![
            CorpusRow::new("kon", "คน", Category::Override),
            CorpusRow::new("kan", "กัน", Category::Generic),
            CorpusRow::new("khao", "เขา", Category::Generic),
            CorpusRow::new("khao", "ข้าว", Category::Generic),
            CorpusRow::new("Narak", "น่ารัก", Category::Override),
        ]
    }

    #[test]
    fn test_zero_rows_is_corpus_unavailable() {
        let err = CorpusIndex::build(Vec::new(), &NoPhoneticCode).unwrap_err();
        assert!(matches!(err, Error::CorpusUnavailable(_)));
    }

    #[test]
    fn test_only_empty_rows_is_corpus_unavailable() {
        let rows = vec![CorpusRow::new("  ", "คน", Category::Generic)];
        let err = CorpusIndex::build(rows, &NoPhoneticCode).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_prefix_lookup_is_case_insensitive_and_ordered() {
        let index = CorpusIndex::build(rows(), &initial_coder()).unwrap();

        let ks: Vec<&str> = index
            .candidates_for_prefix("K")
            .iter()
            .map(|e| e.canonical_form.as_str())
            .collect();
        assert_eq!(ks, vec!["คน", "กัน", "เขา", "ข้าว"]);

        let kh = index.candidates_for_prefix("kh");
        assert_eq!(kh.len(), 2);
        assert_eq!(kh[0].id, 2);
        assert_eq!(kh[1].id, 3);

        // romanized forms are lowercased at build time
        assert_eq!(index.candidates_for_prefix("nar").len(), 1);
        assert!(index.candidates_for_prefix("").is_empty());
        assert!(index.candidates_for_prefix("zzz").is_empty());
    }

    #[test]
    fn test_phonetic_bucket_lookup() {
        let index = CorpusIndex::build(rows(), &initial_coder()).unwrap();
        let bucket = index.candidates_for_phonetic_code("K");
        assert_eq!(bucket.len(), 4);
        assert!(bucket.windows(2).all(|w| w[0].id < w[1].id));
        assert!(index.candidates_for_phonetic_code("").is_empty());
        assert!(index.candidates_for_phonetic_code("Q").is_empty());
    }

    #[test]
    fn test_no_code_means_no_bucket() {
        let index = CorpusIndex::build(rows(), &NoPhoneticCode).unwrap();
        assert_eq!(index.stats().phonetic_buckets, 0);
        assert_eq!(index.candidates_for_prefix("k").len(), 4);
    }

    #[test]
    fn test_duplicate_pairs_keep_first() {
        let mut rows = rows();
        rows.push(CorpusRow::new("kon", "คน", Category::Generic));
        let index = CorpusIndex::build(rows, &NoPhoneticCode).unwrap();
        assert_eq!(index.len(), 5);
        assert_eq!(index.entry(0).unwrap().category, Category::Override);
    }

    /// Codes the Thai-script side by its length.
    struct ScriptCoder;

    impl PhoneticCoder for ScriptCoder {
        fn encode(&self, text: &str) -> String {
            if text.is_empty() {
                String::new()
            } else {
                format!("S{}", text.chars().count())
            }
        }

        fn source(&self) -> CodeSource {
            CodeSource::Canonical
        }
    }

    #[test]
    fn test_script_only_rows_need_a_canonical_coder() {
        let rows = vec![
            CorpusRow::new("", "ภูเก็ต", Category::Generic),
            CorpusRow::new("kon", "คน", Category::Generic),
            CorpusRow::new("", "", Category::Generic),
        ];

        let index = CorpusIndex::build(rows.clone(), &ScriptCoder).unwrap();
        assert_eq!(index.len(), 2);
        let bucket = index.candidates_for_phonetic_code("S6");
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].canonical_form, "ภูเก็ต");
        assert_eq!(index.stats().prefix_keys, 1);

        let index = CorpusIndex::build(rows, &NoPhoneticCode).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_all_entries_is_capped_and_restartable() {
        let index = CorpusIndex::build(rows(), &NoPhoneticCode).unwrap();
        let scan = index.all_entries(3);
        let first: Vec<u32> = scan.clone().map(|e| e.id).collect();
        let again: Vec<u32> = scan.map(|e| e.id).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(first, again);
        assert_eq!(index.all_entries(100).count(), 5);
    }

    #[test]
    fn test_stats_by_category() {
        let index = CorpusIndex::build(rows(), &initial_coder()).unwrap();
        let stats = index.stats();
        assert_eq!(stats.entries, 5);
        assert_eq!(stats.by_category[&Category::Override], 2);
        assert_eq!(stats.by_category[&Category::Generic], 3);
        assert_eq!(stats.prefix_keys, 4);
    }
}
