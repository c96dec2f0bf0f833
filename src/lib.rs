//! # seqdata: genomic training examples for machine-learning models
//!
//! `seqdata` turns a table of (optionally labeled) genomic intervals and a reference
//! genome into fixed-length training examples: either raw nucleotide strings, or
//! one-hot encoded numeric tensors. Each example is paired with its label vector and the
//! genomic range it was extracted from.
//!
//! The pieces, from the bottom up:
//!
//!  - [`IntervalTable`]: typed parsing and filtering of a tab-separated interval file
//!    (BED columns followed by task label columns).
//!  - [`resize_interval()`]: deterministic resizing of an interval to a fixed length
//!    around an [`Anchor`].
//!  - [`SequenceExtractor`]: the reference genome lookup, with FASTA-backed
//!    implementations in [`sequences`].
//!  - [`StringSequenceDataset`]: index → sequence string, labels and range metadata.
//!  - [`one_hot()`] and [`AxisTransformPipeline`]: alphabet mapping, dummy-axis insertion
//!    and axis reordering.
//!  - [`EncodedSequenceDataset`]: index → one-hot tensor, labels and range metadata.
//!
//! Every lookup is a pure, independent, random-access transform from an index to an
//! example; there is no batching or shuffling here.
//!
//! [`IntervalTable`]: crate::table::IntervalTable
//! [`resize_interval()`]: crate::ranges::operations::resize_interval
//! [`Anchor`]: crate::ranges::operations::Anchor
//! [`SequenceExtractor`]: crate::traits::SequenceExtractor
//! [`StringSequenceDataset`]: crate::datasets::StringSequenceDataset
//! [`one_hot()`]: crate::transforms::one_hot
//! [`AxisTransformPipeline`]: crate::transforms::AxisTransformPipeline
//! [`EncodedSequenceDataset`]: crate::datasets::EncodedSequenceDataset

pub mod commands;
pub mod config;
pub mod datasets;
pub mod error;
pub mod io;
pub mod ranges;
pub mod reporting;
pub mod sequences;
pub mod table;
pub mod test_utilities;
pub mod traits;
pub mod transforms;

/// Genomic coordinate type (0-indexed, right-exclusive).
pub type Position = u32;

/// Signed offset type, used for intermediate coordinate arithmetic.
pub type PositionOffset = i64;

pub mod prelude {
    pub use crate::config::{EncodedSequenceConfig, IntervalTableConfig, StringSequenceConfig};
    pub use crate::datasets::{
        EncodedSequenceDataset, GenomicRanges, Metadata, Record, StringSequenceDataset,
    };
    pub use crate::error::SeqDataError;
    pub use crate::ranges::operations::{resize_interval, Anchor};
    pub use crate::ranges::{Interval, Strand};
    pub use crate::sequences::nucleotide::{FastaStringExtractor, InMemoryStringExtractor};
    pub use crate::table::labels::{LabelDtype, Scalar};
    pub use crate::table::IntervalTable;
    pub use crate::traits::{Dataset, SequenceExtractor};
    pub use crate::transforms::{one_hot, Alphabet, AxisTransformPipeline};
}
