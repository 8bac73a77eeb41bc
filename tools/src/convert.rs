use anyhow::{bail, Context, Result};
use libthai_core::corpus::{parse_tsv, save_snapshot, to_tsv};
use libthai_core::{priority_from_frequency, CorpusFile, CorpusFormat, CorpusProvider, CorpusRow};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::warn;

/// Read rows from any supported corpus file.
///
/// With `from_frequency`, a TSV's fourth column is read as a raw frequency and
/// turned into a priority weight; rows without one keep their category default.
pub fn read_rows(input: &Path, from_frequency: bool) -> Result<Vec<CorpusRow>> {
    let file = CorpusFile::open(input)?;
    if !from_frequency {
        return file
            .rows()
            .with_context(|| format!("reading {}", input.display()));
    }
    if file.format() != CorpusFormat::Tsv {
        bail!("--from-frequency needs a tab separated input, got {}", input.display());
    }

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let mut rows = parse_tsv(&content).with_context(|| format!("parsing {}", input.display()))?;
    let frequencies = frequency_column(&content);
    for (row, freq) in rows.iter_mut().zip(frequencies) {
        match freq {
            Some(f) => row.priority_weight = priority_from_frequency(f),
            None => row.priority_weight = row.category.default_priority(),
        }
    }
    Ok(rows)
}

/// Fourth-column values of each data line, in `parse_tsv` row order.
fn frequency_column(content: &str) -> Vec<Option<u64>> {
    content
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(|l| {
            let raw = l.split('\t').nth(3).map(str::trim).filter(|s| !s.is_empty())?;
            // frequency dumps sometimes carry floats
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Some(v as u64),
                _ => {
                    warn!(value = raw, "ignoring unparsable frequency");
                    None
                }
            }
        })
        .collect()
}

/// Write rows in the format implied by the output extension.
pub fn write_rows(output: &Path, rows: &[CorpusRow]) -> Result<()> {
    let format = CorpusFormat::from_path(output)
        .with_context(|| format!("unrecognized output extension: {}", output.display()))?;
    match format {
        CorpusFormat::Tsv => std::fs::write(output, to_tsv(rows))?,
        CorpusFormat::Json => {
            let writer = BufWriter::new(File::create(output)?);
            serde_json::to_writer_pretty(writer, rows)?;
        }
        CorpusFormat::Snapshot => save_snapshot(output, rows)?,
    }
    Ok(())
}

pub fn run(input: &Path, output: &Path, from_frequency: bool) -> Result<usize> {
    let rows = read_rows(input, from_frequency)?;
    write_rows(output, &rows).with_context(|| format!("writing {}", output.display()))?;
    Ok(rows.len())
}
