//! Genomic intervals.
//!
//! An [`Interval`] is a 0-indexed, right-exclusive range on a named sequence (i.e.
//! chromosome), carrying whatever BED fields the interval table declared. Intervals are
//! value types: they are built fresh for every table lookup, and the resizing operations in
//! [`operations`] return new intervals rather than modifying them.

use std::fmt;
use std::str::FromStr;

use crate::{
    error::SeqDataError,
    table::labels::Scalar,
    traits::{AdjustableGenericRange, GenericRange},
    Position,
};

pub mod operations;

/// Nucleotide strand enum type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl FromStr for Strand {
    type Err = SeqDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." => Ok(Strand::Unstranded),
            _ => Err(SeqDataError::InvalidStrand(s.to_string())),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unstranded => ".",
        };
        write!(f, "{}", symbol)
    }
}

/// A genomic interval with its BED fields.
///
/// # Fields
/// * `chrom`: the sequence name.
/// * `start`, `stop`: 0-indexed, right-exclusive coordinates.
/// * `name`, `score`, `strand`: BED columns 4-6 (`None`/[`Strand::Unstranded`] when the
///   table has fewer columns, or the column holds `'.'`).
/// * `extra`: BED columns 7-12 (thickStart, thickEnd, itemRgb, blockCount, blockSizes,
///   blockStarts), as many as the table declared.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pub chrom: String,
    pub start: Position,
    pub stop: Position,
    pub name: Option<String>,
    pub score: Option<f64>,
    pub strand: Strand,
    pub extra: Vec<Scalar>,
}

impl Interval {
    /// Create a new BED3-style interval, with no name, score, or strand.
    pub fn new(chrom: impl Into<String>, start: Position, stop: Position) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
            name: None,
            score: None,
            strand: Strand::Unstranded,
            extra: Vec::new(),
        }
    }

    /// Set the strand of this interval (builder-style).
    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    /// The interval length, `stop - start`.
    pub fn len(&self) -> usize {
        self.width() as usize
    }

    /// Whether this is a zero-width interval.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The (possibly half-integer) midpoint of the interval.
    pub fn midpoint(&self) -> f64 {
        (self.start as f64 + self.stop as f64) / 2.0
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.stop)
    }
}

impl GenericRange for Interval {
    fn start(&self) -> Position {
        self.start
    }
    fn end(&self) -> Position {
        self.stop
    }
}

impl AdjustableGenericRange for Interval {
    fn set_start(&mut self, start: Position) {
        self.start = start
    }
    fn set_end(&mut self, end: Position) {
        self.stop = end
    }
}

/// Validates a signed `start`/`end` pair and converts it to [`Position`]s.
///
/// Ranges must satisfy `0 <= start <= end`, and `end` must fit in a [`Position`].
pub fn try_range(
    start: crate::PositionOffset,
    end: crate::PositionOffset,
) -> Result<(Position, Position), SeqDataError> {
    if start < 0 || start > end {
        return Err(SeqDataError::InvalidGenomicRange(start, end));
    }
    let invalid = || SeqDataError::InvalidGenomicRange(start, end);
    let start_position = Position::try_from(start).map_err(|_| invalid())?;
    let end_position = Position::try_from(end).map_err(|_| invalid())?;
    Ok((start_position, end_position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_parsing() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Reverse);
        assert_eq!(".".parse::<Strand>().unwrap(), Strand::Unstranded);
        assert!(matches!(
            "x".parse::<Strand>(),
            Err(SeqDataError::InvalidStrand(_))
        ));
    }

    #[test]
    fn test_interval_len_midpoint() {
        let interval = Interval::new("chr1", 30, 35);
        assert_eq!(interval.len(), 5);
        assert_eq!(interval.width(), 5);
        assert_eq!(interval.midpoint(), 32.5);
        assert_eq!(interval.to_string(), "chr1:30-35");
    }

    #[test]
    fn test_try_range() {
        assert_eq!(try_range(3, 10).unwrap(), (3, 10));
        assert_eq!(try_range(4, 4).unwrap(), (4, 4));
        assert!(matches!(
            try_range(-2, 10),
            Err(SeqDataError::InvalidGenomicRange(-2, 10))
        ));
        assert!(matches!(
            try_range(5, 1),
            Err(SeqDataError::InvalidGenomicRange(5, 1))
        ));
    }
}
