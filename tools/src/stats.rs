use anyhow::{Context, Result};
use libthai_core::{Category, CorpusFile, CorpusProvider, CorpusRow};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Rows per category, in `Category::ALL` order, zero counts included.
pub fn category_counts(rows: &[CorpusRow]) -> Vec<(Category, usize)> {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.category).or_insert(0) += 1;
    }
    Category::ALL
        .iter()
        .map(|c| (*c, counts.get(c).copied().unwrap_or(0)))
        .collect()
}

pub fn report(rows: &[CorpusRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "rows: {}", rows.len());
    for (category, count) in category_counts(rows) {
        let _ = writeln!(out, "  {:<12} {}", category.as_str(), count);
    }
    let empty = rows
        .iter()
        .filter(|r| r.romanized_form.trim().is_empty() || r.canonical_form.trim().is_empty())
        .count();
    if empty > 0 {
        let _ = writeln!(out, "  (skipped at load: {} rows with an empty form)", empty);
    }
    out
}

pub fn run(input: &Path) -> Result<String> {
    let rows = CorpusFile::open(input)?
        .rows()
        .with_context(|| format!("reading {}", input.display()))?;
    Ok(report(&rows))
}
