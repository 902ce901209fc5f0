//! Genotype matching against a reference SNP panel.
//!
//! For each reference SNP `i` the user's token at `rsids[i]` is resolved to
//! an allele pair and compared allele-by-allele with `major[i]` and
//! `minor[i]`:
//!
//! | token            | pair        | counted as matched |
//! |------------------|-------------|--------------------|
//! | absent           | none        | no                 |
//! | `"AG"` (2 chars) | `(A, G)`    | yes                |
//! | `"A"` (1 char)   | `(A, A)`    | yes                |
//! | other lengths    | none        | yes                |
//!
//! Lengths are measured in Unicode scalar values. Each count lands in
//! `{0, 1, 2}`; major and minor are tallied independently, so a token with an
//! allele outside `{major, minor}` simply contributes less.
use std::{collections::HashMap, hash::BuildHasher};

use ndarray::Array1;

use crate::admixture::errors::{CalcError, CalcResult};

/// Per-SNP allele counts and coverage statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeCounts {
    /// Copies of the major allele per reference SNP.
    pub major: Array1<f64>,
    /// Copies of the minor allele per reference SNP.
    pub minor: Array1<f64>,
    /// `matched / reference SNPs`, 0 for an empty panel.
    pub model_match_ratio: f64,
    /// `matched / user entries`, 0 for an empty mapping.
    pub user_match_ratio: f64,
    /// Reference SNPs present in the user mapping.
    pub matched: usize,
}

/// Resolve a genotype token to its allele pair.
///
/// Two characters give the pair as written, one character is read as
/// homozygous, anything else has no pair.
pub fn resolve_alleles(token: &str) -> Option<(char, char)> {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        (Some(a), None, _) => Some((a, a)),
        _ => None,
    }
}

/// Count major/minor alleles of `user` at every reference SNP.
///
/// # Errors
/// - [`CalcError::SnpCountMismatch`] if `major` or `minor` is not aligned
///   with `rsids`.
pub fn match_genotypes<S: BuildHasher>(
    user: &HashMap<String, String, S>, rsids: &[String], major: &[char], minor: &[char],
) -> CalcResult<GenotypeCounts> {
    let snps = rsids.len();
    for (what, found) in [("Major allele list", major.len()), ("Minor allele list", minor.len())] {
        if found != snps {
            return Err(CalcError::SnpCountMismatch { what, expected: snps, found });
        }
    }

    let mut major_count = Array1::<f64>::zeros(snps);
    let mut minor_count = Array1::<f64>::zeros(snps);
    let mut matched = 0_usize;

    for (i, rsid) in rsids.iter().enumerate() {
        let Some(token) = user.get(rsid) else {
            continue;
        };
        matched += 1;
        if let Some((a, b)) = resolve_alleles(token) {
            major_count[i] = allele_copies(a, b, major[i]);
            minor_count[i] = allele_copies(a, b, minor[i]);
        }
    }

    Ok(GenotypeCounts {
        major: major_count,
        minor: minor_count,
        model_match_ratio: ratio(matched, snps),
        user_match_ratio: ratio(matched, user.len()),
        matched,
    })
}

fn allele_copies(a: char, b: char, allele: char) -> f64 {
    f64::from(u8::from(a == allele) + u8::from(b == allele))
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// A raw genotype call as produced by an upstream genome parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeCall {
    pub genotype: String,
    pub chromosome: String,
    pub position: Option<u64>,
}

/// Keep the calls that are usable for admixture estimation.
///
/// A call is kept when its chromosome is an autosome written `"1"` to
/// `"22"`, its genotype has exactly two characters, and the first of them is
/// one of `A`, `C`, `G`, `T`.
pub fn autosomal_genotypes<S: BuildHasher>(
    calls: &HashMap<String, GenotypeCall, S>,
) -> HashMap<String, String> {
    calls
        .iter()
        .filter(|(_, call)| is_autosome(&call.chromosome) && is_called_pair(&call.genotype))
        .map(|(rsid, call)| (rsid.clone(), call.genotype.clone()))
        .collect()
}

fn is_autosome(chromosome: &str) -> bool {
    match chromosome.parse::<u8>() {
        Ok(n @ 1..=22) => n.to_string() == chromosome,
        _ => false,
    }
}

fn is_called_pair(genotype: &str) -> bool {
    let mut chars = genotype.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some('A' | 'C' | 'G' | 'T'), Some(_), None)
    )
}
