//! Types and methods for extracting nucleotide sequences from a reference genome.
//!
//! Two [`SequenceExtractor`] implementations are provided:
//!
//!  - [`FastaStringExtractor`]: lazily loads one sequence at a time from an indexed
//!    (`.fai`) FASTA file. This is the one to use with real genomes.
//!  - [`InMemoryStringExtractor`]: loads a whole (possibly compressed) FASTA file into
//!    memory.
//!
//! Currently this requires the [`noodles::fasta`] module, but their API is unstable
//! and may be a source of future pain.

use bytes::Bytes;
use genomap::GenomeMap;
use indexmap::IndexMap;
use log::debug;
use noodles::core::Region;
use noodles::fasta::indexed_reader;
use noodles::fasta::{io::BufReadSeek, reader, record::Sequence, IndexedReader};
use std::ops::Deref;
use std::path::PathBuf;

use super::lazy::LazyLoader;
use crate::{
    error::SeqDataError,
    ranges::{Interval, Strand},
    traits::SequenceExtractor,
    PositionOffset,
};

/// A newtype around raw nucleotide [`Bytes`], for making it more
/// display and other operations more convenient.
#[derive(Clone, Debug, PartialEq)]
pub struct Nucleotides(Bytes);

impl Deref for Nucleotides {
    type Target = Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&Sequence> for Nucleotides {
    fn from(sequence: &Sequence) -> Self {
        let seq = Bytes::from(sequence.as_ref().to_vec());
        Nucleotides(seq)
    }
}

/// The complement of a nucleotide, including IUPAC ambiguity codes. Case is preserved,
/// and unknown symbols are returned unchanged.
pub fn complement(base: u8) -> u8 {
    let upper = match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'U' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        // S, W, N and gaps are their own complements
        other => other,
    };
    if base.is_ascii_lowercase() {
        upper.to_ascii_lowercase()
    } else {
        upper
    }
}

/// Reverse-complement a nucleotide sequence.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement(base)).collect()
}

/// Strand and case handling shared by the extractors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractOptions {
    /// Reverse-complement sequences of [`Strand::Reverse`] intervals.
    pub use_strand: bool,
    /// Upper-case extracted sequences.
    pub force_upper: bool,
}

impl ExtractOptions {
    pub fn new(use_strand: bool, force_upper: bool) -> Self {
        Self {
            use_strand,
            force_upper,
        }
    }

    /// Slice `interval` out of a whole sequence `seq`, and apply the strand and case
    /// options.
    fn slice(&self, seq: &[u8], interval: &Interval) -> Result<String, SeqDataError> {
        let (start, stop) = (interval.start as usize, interval.stop as usize);
        if stop > seq.len() {
            return Err(SeqDataError::InvalidRangeForSequence {
                seqname: interval.chrom.clone(),
                start: PositionOffset::from(interval.start),
                end: PositionOffset::from(interval.stop),
                length: seq.len(),
            });
        }
        let region = &seq[start..stop];
        let mut bases = if self.use_strand && interval.strand == Strand::Reverse {
            reverse_complement(region)
        } else {
            region.to_vec()
        };
        if self.force_upper {
            bases.make_ascii_uppercase();
        }
        Ok(String::from_utf8(bases)?)
    }
}

/// Use the [`noodles`] library to parse a FASTA file into memory.
pub fn parse_fasta(filepath: impl Into<PathBuf>) -> Result<GenomeMap<Nucleotides>, SeqDataError> {
    let filepath = filepath.into();
    let mut reader = reader::Builder.build_from_path(filepath)?;

    let mut sequences = GenomeMap::new();
    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8(record.definition().name().to_vec())?;
        sequences.insert(&name, Nucleotides::from(record.sequence()))?;
    }

    Ok(sequences)
}

/// A [`SequenceExtractor`] over a whole reference genome held in memory.
pub struct InMemoryStringExtractor {
    data: GenomeMap<Nucleotides>,
    options: ExtractOptions,
}

impl InMemoryStringExtractor {
    /// Load an entire FASTA file into memory.
    ///
    /// # Arguments
    /// * `filepath`: a path to the (possibly bgzip-compressed, `.gz`) FASTA file.
    /// * `options`: strand and case handling.
    pub fn from_fasta(
        filepath: impl Into<PathBuf>,
        options: ExtractOptions,
    ) -> Result<Self, SeqDataError> {
        let data = parse_fasta(filepath)?;
        Ok(Self { data, options })
    }

    /// Retrieve the sequence names and their lengths.
    pub fn seqlens(&self) -> IndexMap<String, usize> {
        self.data
            .iter()
            .map(|(name, seq)| (name.clone(), seq.len()))
            .collect()
    }
}

impl SequenceExtractor for InMemoryStringExtractor {
    fn extract(&self, interval: &Interval) -> Result<String, SeqDataError> {
        let seq = self
            .data
            .get(&interval.chrom)
            .ok_or(SeqDataError::MissingSequence(interval.chrom.clone()))?;
        self.options.slice(seq, interval)
    }
}

/// A [`SequenceExtractor`] over an indexed FASTA file, which keeps only the most recently
/// used sequence in memory.
///
/// Lookups that stay on one chromosome are cheap; each change of chromosome reloads a
/// whole sequence, so sorting intervals by chromosome pays off.
#[derive(Debug)]
pub struct FastaStringExtractor {
    seqlens: IndexMap<String, usize>,
    lazy: LazyLoader<IndexedReader<Box<dyn BufReadSeek>>, Nucleotides, String>,
    options: ExtractOptions,
}

impl FastaStringExtractor {
    /// Open an indexed FASTA file (the `.fai` index must sit next to it).
    ///
    /// # Arguments
    /// * `filepath` - the path to the (bgzipped) and indexed FASTA file.
    /// * `options`: strand and case handling.
    pub fn new(
        filepath: impl Into<PathBuf>,
        options: ExtractOptions,
    ) -> Result<Self, SeqDataError> {
        let filepath = filepath.into();
        let reader = indexed_reader::Builder::default().build_from_path(&filepath)?;

        let mut seqlens = IndexMap::new();
        for record in reader.index().iter() {
            let name = String::from_utf8(record.name().to_vec())?;
            #[allow(clippy::unnecessary_cast)]
            let length = record.length() as usize;
            seqlens.insert(name, length);
        }
        debug!(
            "opened indexed FASTA {} with {} sequences",
            filepath.display(),
            seqlens.len()
        );

        let lazy = LazyLoader::new(reader, move |reader, seqname: &String| {
            // NOTE: noodles API uses &[u8] for names
            let region = Region::new(seqname.clone().into_bytes(), ..);
            let record = reader.query(&region)?;
            let nucs: Nucleotides = record.sequence().into();
            Ok(nucs)
        });

        Ok(Self {
            seqlens,
            lazy,
            options,
        })
    }

    /// Get an [`IndexMap`] of the sequence names and their lengths.
    pub fn seqlens(&self) -> &IndexMap<String, usize> {
        &self.seqlens
    }

    /// Return a `bool` indicating whether the specified sequence is cached.
    pub fn is_loaded(&self, seqname: &str) -> bool {
        self.lazy.is_loaded(&seqname.to_string())
    }
}

impl SequenceExtractor for FastaStringExtractor {
    fn extract(&self, interval: &Interval) -> Result<String, SeqDataError> {
        if !self.seqlens.contains_key(&interval.chrom) {
            return Err(SeqDataError::MissingSequence(interval.chrom.clone()));
        }
        self.lazy
            .with_data(&interval.chrom, |seq| self.options.slice(seq, interval))?
    }
}
