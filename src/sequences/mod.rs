//! Reference genome sequence extraction.
//!
//! The [`SequenceExtractor`] trait is the only thing the datasets need from a reference
//! genome; [`nucleotide`] implements it for FASTA files, and [`lazy`] provides the
//! one-sequence cache the indexed implementation is built on.
//!
//! [`SequenceExtractor`]: crate::traits::SequenceExtractor

pub mod lazy;
pub mod nucleotide;
