//! SNP reference arrays and the parsers for their on-disk records.
//!
//! - Allele record: one `rsid minor major` row per SNP.
//! - Frequency record: `P` whitespace-separated major-allele frequencies per
//!   row, same row order as the allele record.
//!
//! Blank lines are ignored in both records. Allele rows that do not split
//! into exactly three tokens are skipped.
use std::io::BufRead;

use ndarray::Array2;

use crate::model::errors::{ModelError, ModelResult};

/// Parsed reference arrays of one model.
///
/// Invariant (enforced by the repository): `rsids`, `major`, `minor` and the
/// rows of `frequency` are aligned and of equal length `S`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub rsids: Vec<String>,
    pub major: Vec<char>,
    pub minor: Vec<char>,
    /// `S × P` major-allele frequencies, values in [0, 1].
    pub frequency: Array2<f64>,
}

impl ModelData {
    pub fn snp_count(&self) -> usize {
        self.rsids.len()
    }

    pub fn population_count(&self) -> usize {
        self.frequency.ncols()
    }
}

/// Rows of an allele record, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlleleRecord {
    pub rsids: Vec<String>,
    pub minor: Vec<char>,
    pub major: Vec<char>,
}

impl AlleleRecord {
    pub fn len(&self) -> usize {
        self.rsids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsids.is_empty()
    }
}

/// Parse an allele record.
///
/// `source` names the input in `ReadFailed` errors.
///
/// # Errors
/// - [`ModelError::ReadFailed`] if a line cannot be read.
/// - [`ModelError::MalformedAlleleRow`] if an allele token is not a single
///   character.
pub fn parse_alleles<R: BufRead>(reader: R, source: &str) -> ModelResult<AlleleRecord> {
    let mut record = AlleleRecord::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| read_failed(source, e))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [rsid, minor, major] = tokens.as_slice() else {
            continue;
        };
        let minor = single_allele(minor).ok_or(ModelError::MalformedAlleleRow {
            line: idx + 1,
            reason: "Minor allele must be a single character.",
        })?;
        let major = single_allele(major).ok_or(ModelError::MalformedAlleleRow {
            line: idx + 1,
            reason: "Major allele must be a single character.",
        })?;
        record.rsids.push((*rsid).to_string());
        record.minor.push(minor);
        record.major.push(major);
    }
    Ok(record)
}

/// Parse a frequency record into an `S × P` matrix.
///
/// The first non-blank row fixes `P`. An input without rows yields a `0 × 0`
/// matrix.
///
/// # Errors
/// - [`ModelError::ReadFailed`] if a line cannot be read.
/// - [`ModelError::MalformedFrequency`] for a token that is not a float.
/// - [`ModelError::RaggedFrequencyRow`] when a row's width differs from `P`.
/// - [`ModelError::FrequencyOutOfRange`] for non-finite values or values
///   outside [0, 1].
pub fn parse_frequencies<R: BufRead>(reader: R, source: &str) -> ModelResult<Array2<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| read_failed(source, e))?;
        let line_no = idx + 1;
        let mut row = Vec::new();
        for (column, token) in line.split_whitespace().enumerate() {
            let value: f64 = token.parse().map_err(|_| ModelError::MalformedFrequency {
                line: line_no,
                token: token.to_string(),
            })?;
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ModelError::FrequencyOutOfRange { line: line_no, column, value });
            }
            row.push(value);
        }
        if row.is_empty() {
            continue;
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ModelError::RaggedFrequencyRow {
                    line: line_no,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }
    let cols = rows.first().map_or(0, Vec::len);
    Ok(Array2::from_shape_fn((rows.len(), cols), |(i, j)| rows[i][j]))
}

fn single_allele(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn read_failed(source: &str, err: std::io::Error) -> ModelError {
    ModelError::ReadFailed { path: source.to_string(), message: err.to_string() }
}
