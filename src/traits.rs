//! Traits used by the seqdata library.
//!

use crate::{error::SeqDataError, ranges::Interval, Position};

/// The [`GenericRange`] trait defines common functionality for all range types.
pub trait GenericRange: Clone {
    fn start(&self) -> Position;
    fn end(&self) -> Position;
    fn width(&self) -> Position {
        self.end() - self.start()
    }
}

/// The [`AdjustableGenericRange`] trait extends additional functionality to adjustable
/// generic ranges.
pub trait AdjustableGenericRange: GenericRange {
    /// Set the start to the specified position.
    fn set_start(&mut self, start: Position);
    /// Set the end to the specified position.
    fn set_end(&mut self, end: Position);
}

/// A [`SequenceExtractor`] maps an [`Interval`] to its nucleotide sequence in some
/// reference genome.
///
/// Implementations decide at construction time whether to reverse-complement
/// negative-strand intervals and whether to upper-case the output, so `extract()` only
/// needs the interval.
///
/// Extractors may hold interior-mutable state (e.g. an open file handle and a cache), so
/// they are not required to be [`Sync`]; use one extractor per thread when looking up
/// examples in parallel.
pub trait SequenceExtractor {
    /// Extract the sequence spanning `interval` as a [`String`].
    fn extract(&self, interval: &Interval) -> Result<String, SeqDataError>;
}

/// A random-access collection of examples.
pub trait Dataset {
    type Item;

    /// Number of examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the example at `index`, or return [`SeqDataError::IndexOutOfRange`].
    fn get(&self, index: usize) -> Result<Self::Item, SeqDataError>;
}

/// Defines how to serialize something to TSV.
pub trait TsvSerialize {
    fn to_tsv(&self, config: &crate::io::tsv::TsvConfig) -> String;
}
