//! Random-access datasets of labeled sequence examples.
//!
//! Both datasets implement [`Dataset`]: `get(index)` is a pure function of the index and
//! returns a [`Record`], whose `inputs` are a sequence string
//! ([`StringSequenceDataset`]) or a one-hot tensor ([`EncodedSequenceDataset`]).
//!
//! [`Dataset`]: crate::traits::Dataset

use serde::Serialize;

use crate::{
    io::tsv::TsvConfig, ranges::Interval, table::labels::Scalar, traits::TsvSerialize, Position,
};

pub mod encoded;
pub mod string;

pub use encoded::EncodedSequenceDataset;
pub use string::StringSequenceDataset;

/// The genomic range an example was extracted from. `id` is the example's index, as a
/// string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenomicRanges {
    pub chrom: String,
    pub start: Position,
    pub stop: Position,
    pub id: String,
}

impl GenomicRanges {
    pub fn new(interval: &Interval, index: usize) -> Self {
        Self {
            chrom: interval.chrom.clone(),
            start: interval.start,
            stop: interval.stop,
            id: index.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metadata {
    pub ranges: GenomicRanges,
}

/// One example: model inputs, task labels (empty if the table has no tasks) and
/// metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record<I> {
    pub inputs: I,
    pub targets: Vec<Scalar>,
    pub metadata: Metadata,
}

impl<I> Record<I> {
    /// Replace the inputs with `func(inputs)`, keeping targets and metadata.
    pub fn map_inputs<J, F: FnOnce(I) -> J>(self, func: F) -> Record<J> {
        Record {
            inputs: func(self.inputs),
            targets: self.targets,
            metadata: self.metadata,
        }
    }

    /// The genomic range the inputs came from.
    pub fn ranges(&self) -> &GenomicRanges {
        &self.metadata.ranges
    }
}

impl TsvSerialize for Record<String> {
    /// `id`, `chrom`, `start`, `stop`, the sequence, then one column per label.
    fn to_tsv(&self, config: &TsvConfig) -> String {
        let ranges = &self.metadata.ranges;
        let mut line = format!(
            "{}\t{}\t{}\t{}\t{}",
            ranges.id, ranges.chrom, ranges.start, ranges.stop, self.inputs
        );
        if !self.targets.is_empty() {
            line.push('\t');
            line.push_str(&self.targets.to_tsv(config));
        }
        line
    }
}
