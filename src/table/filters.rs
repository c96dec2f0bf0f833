//! Row filters and chromosome-name normalization for interval tables.
//!
//! Filters compute a per-row "keep" mask; they never reorder rows.

use std::collections::HashSet;

use super::labels::Scalar;

/// The chromosome-name rewrite applied to every row of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChromNormalization {
    /// Names were left as they are.
    Unchanged,
    /// A leading `"chr"` was removed.
    StripPrefix,
    /// `"chr"` was prepended.
    AddPrefix,
}

/// Rewrite chromosome names to (`num_chr = false`) or from (`num_chr = true`) the
/// `"chr1"` naming convention.
///
/// The convention the file uses is detected from the *first* row only, and the same
/// rewrite is then applied to every row; files that mix conventions are not handled.
pub fn normalize_chromosomes(chroms: &mut [String], num_chr: bool) -> ChromNormalization {
    let first_has_prefix = match chroms.first() {
        Some(first) => first.starts_with("chr"),
        None => return ChromNormalization::Unchanged,
    };

    if num_chr && first_has_prefix {
        for chrom in chroms.iter_mut() {
            if let Some(stripped) = chrom.strip_prefix("chr") {
                *chrom = stripped.to_string();
            }
        }
        ChromNormalization::StripPrefix
    } else if !num_chr && !first_has_prefix {
        for chrom in chroms.iter_mut() {
            chrom.insert_str(0, "chr");
        }
        ChromNormalization::AddPrefix
    } else {
        ChromNormalization::Unchanged
    }
}

/// Keep mask dropping the rows whose labels *all* match `mask`.
///
/// `labels` is column-major (one `Vec` per task). Rows with no labels at all are kept.
pub fn ambiguous_keep_mask(labels: &[Vec<Scalar>], nrows: usize, mask: &Scalar) -> Vec<bool> {
    if labels.is_empty() {
        return vec![true; nrows];
    }
    (0..nrows)
        .map(|row| !labels.iter().all(|column| column[row].matches(mask)))
        .collect()
}

/// Keep mask retaining (`retain = true`) or excluding (`retain = false`) the rows whose
/// chromosome is in `seqnames`.
pub fn seqname_keep_mask(chroms: &[String], seqnames: &[String], retain: bool) -> Vec<bool> {
    let seqnames: HashSet<&str> = seqnames.iter().map(String::as_str).collect();
    chroms
        .iter()
        .map(|chrom| seqnames.contains(chrom.as_str()) == retain)
        .collect()
}

/// Retain the elements of `values` whose entry in `keep` is `true`, preserving order.
pub fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut keep = keep.iter();
    values.retain(|_| *keep.next().unwrap_or(&true));
}
