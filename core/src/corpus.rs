//! Corpus rows, entries and the file-backed corpus provider.
//!
//! A corpus is a finite table of `(romanized_form, canonical_form, category,
//! priority_weight)` rows. Where the rows come from is not this crate's concern;
//! it only needs something implementing [`CorpusProvider`]. For convenience the
//! three on-disk layouts used by the tools are supported here:
//!
//! - `.tsv` / `.txt`: `romanized<TAB>canonical[<TAB>category[<TAB>priority]]`
//! - `.json`: an array of [`CorpusRow`] objects
//! - `.bin`: a bincode [`CorpusSnapshot`]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Snapshot format version written by [`save_snapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Entry category. Proper-noun categories carry a higher default priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "word", alias = "wiki")]
    Generic,
    Country,
    Province,
    #[serde(alias = "name")]
    PersonName,
    #[serde(alias = "known")]
    Override,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Override,
        Category::Country,
        Category::Province,
        Category::PersonName,
        Category::Generic,
        Category::Other,
    ];

    /// Priority weight used when a row does not specify one.
    ///
    /// Override rows get the maximal weight so hand-curated mappings always
    /// outrank the bulk vocabulary for the same romanization.
    pub fn default_priority(self) -> f64 {
        match self {
            Category::Override => 25.0,
            Category::Country => 12.0,
            Category::Province => 10.0,
            Category::PersonName => 8.0,
            Category::Generic | Category::Other => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Generic => "generic",
            Category::Country => "country",
            Category::Province => "province",
            Category::PersonName => "person_name",
            Category::Override => "override",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Generic
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the canonical names plus the labels used by older corpus dumps
    /// (`known`, `name`, `word`, `wiki`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "word" | "wiki" => Ok(Category::Generic),
            "country" => Ok(Category::Country),
            "province" => Ok(Category::Province),
            "person_name" | "name" => Ok(Category::PersonName),
            "override" | "known" => Ok(Category::Override),
            "other" => Ok(Category::Other),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Map a raw corpus frequency to a priority weight on the score scale.
///
/// Log scale, capped at 10.
pub fn priority_from_frequency(freq: u64) -> f64 {
    ((freq.max(1) as f64).log10() / 2.0).min(10.0)
}

/// One row as produced by a corpus provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRow {
    pub romanized_form: String,
    pub canonical_form: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority_weight: f64,
}

impl CorpusRow {
    /// Create a row using the category's default priority.
    pub fn new<R: Into<String>, C: Into<String>>(romanized: R, canonical: C, category: Category) -> Self {
        Self {
            romanized_form: romanized.into(),
            canonical_form: canonical.into(),
            category,
            priority_weight: category.default_priority(),
        }
    }

    pub fn with_priority(mut self, priority_weight: f64) -> Self {
        self.priority_weight = priority_weight;
        self
    }
}

/// A JSON corpus row. A missing priority resolves to the category default,
/// the same as a TSV row without a fourth column.
#[derive(Deserialize)]
struct JsonRow {
    romanized_form: String,
    canonical_form: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    priority_weight: Option<f64>,
}

impl From<JsonRow> for CorpusRow {
    fn from(row: JsonRow) -> Self {
        let priority_weight = row
            .priority_weight
            .unwrap_or_else(|| row.category.default_priority());
        Self {
            romanized_form: row.romanized_form,
            canonical_form: row.canonical_form,
            category: row.category,
            priority_weight,
        }
    }
}

/// An indexed, immutable corpus entry.
///
/// `id` is the insertion order inside its `CorpusIndex` and is the final
/// tie-breaker when ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: u32,
    pub romanized_form: String,
    pub canonical_form: String,
    pub category: Category,
    pub priority_weight: f64,
    pub phonetic_code: String,
}

/// Versioned bincode payload for `.bin` corpora.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSnapshot {
    pub version: u32,
    pub rows: Vec<CorpusRow>,
}

/// Anything able to hand over the corpus rows once, before indexing.
pub trait CorpusProvider {
    fn rows(&self) -> Result<Vec<CorpusRow>>;
}

impl CorpusProvider for Vec<CorpusRow> {
    fn rows(&self) -> Result<Vec<CorpusRow>> {
        Ok(self.clone())
    }
}

impl CorpusProvider for [CorpusRow] {
    fn rows(&self) -> Result<Vec<CorpusRow>> {
        Ok(self.to_vec())
    }
}

/// On-disk corpus layout, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Tsv,
    Json,
    Snapshot,
}

impl CorpusFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tsv" | "txt" => Some(CorpusFormat::Tsv),
            "json" => Some(CorpusFormat::Json),
            "bin" => Some(CorpusFormat::Snapshot),
            _ => None,
        }
    }
}

/// A corpus stored in a file.
#[derive(Debug, Clone)]
pub struct CorpusFile {
    path: PathBuf,
    format: CorpusFormat,
}

impl CorpusFile {
    /// Open a corpus file, detecting its format from the extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = CorpusFormat::from_path(&path).ok_or_else(|| {
            Error::CorpusUnavailable(format!(
                "unrecognized corpus extension for {} (expected .tsv, .txt, .json or .bin)",
                path.display()
            ))
        })?;
        Ok(Self { path, format })
    }

    pub fn with_format<P: AsRef<Path>>(path: P, format: CorpusFormat) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> CorpusFormat {
        self.format
    }
}

impl CorpusProvider for CorpusFile {
    fn rows(&self) -> Result<Vec<CorpusRow>> {
        match self.format {
            CorpusFormat::Tsv => {
                let content = std::fs::read_to_string(&self.path)?;
                parse_tsv(&content)
            }
            CorpusFormat::Json => {
                let reader = BufReader::new(File::open(&self.path)?);
                parse_json(reader)
            }
            CorpusFormat::Snapshot => load_snapshot(&self.path),
        }
    }
}

/// Parse tab separated corpus rows.
///
/// Blank lines and lines starting with `#` are skipped. Category defaults to
/// `generic`; priority defaults to the category's default priority.
pub fn parse_tsv(content: &str) -> Result<Vec<CorpusRow>> {
    let mut rows = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let romanized = fields.next().unwrap_or("").trim();
        let canonical = fields.next().map(str::trim).ok_or_else(|| Error::CorpusFormat {
            line: line_no,
            reason: "expected at least two tab separated fields".into(),
        })?;

        let category = match fields.next().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<Category>().map_err(|reason| Error::CorpusFormat {
                line: line_no,
                reason,
            })?,
            None => Category::Generic,
        };

        let priority_weight = match fields.next().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<f64>().map_err(|e| Error::CorpusFormat {
                line: line_no,
                reason: format!("invalid priority '{}': {}", s, e),
            })?,
            None => category.default_priority(),
        };

        rows.push(CorpusRow {
            romanized_form: romanized.to_string(),
            canonical_form: canonical.to_string(),
            category,
            priority_weight,
        });
    }

    Ok(rows)
}

/// Parse a JSON array of rows. Omitted categories default to `generic`,
/// omitted priorities to the category's default priority.
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<CorpusRow>> {
    let rows: Vec<JsonRow> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().map(CorpusRow::from).collect())
}

/// Render rows back into the tab separated layout.
pub fn to_tsv(rows: &[CorpusRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            row.romanized_form, row.canonical_form, row.category, row.priority_weight
        ));
    }
    out
}

/// Load a bincode snapshot.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Vec<CorpusRow>> {
    let mut buf = Vec::new();
    File::open(path.as_ref())?.read_to_end(&mut buf)?;
    let snapshot: CorpusSnapshot = bincode::deserialize(&buf)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(Error::CorpusUnavailable(format!(
            "snapshot version {} is not supported (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    Ok(snapshot.rows)
}

/// Write rows as a bincode snapshot.
pub fn save_snapshot<P: AsRef<Path>>(path: P, rows: &[CorpusRow]) -> Result<()> {
    let snapshot = CorpusSnapshot {
        version: SNAPSHOT_VERSION,
        rows: rows.to_vec(),
    };
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    bincode::serialize_into(&mut writer, &snapshot)?;
    writer.flush()?;
    Ok(())
}
