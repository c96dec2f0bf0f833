//! Datasets of labeled one-hot encoded sequences.

use log::debug;
use ndarray::ArrayD;
use std::path::{Path, PathBuf};

use super::{Record, StringSequenceDataset};
use crate::{
    config::EncodedSequenceConfig,
    error::SeqDataError,
    sequences::nucleotide::FastaStringExtractor,
    traits::{Dataset, SequenceExtractor},
    transforms::AxisTransformPipeline,
};

/// A [`StringSequenceDataset`] whose sequences are passed through an
/// [`AxisTransformPipeline`], giving `f32` tensors.
///
/// # Example
///
/// ```no_run
/// use seqdata::prelude::*;
///
/// let mut config = EncodedSequenceConfig::default();
/// config.sequence.required_seq_len = Some(1000);
/// config.sequence.auto_resize = Some(Anchor::Center);
/// config.dummy_axis = Some(2);
///
/// let dataset = EncodedSequenceDataset::from_fasta("peaks.tsv", "hg38.fa", &config)
///     .expect("could not build dataset");
/// assert_eq!(dataset.output_shape(), Some(vec![1000, 4, 1]));
/// ```
#[derive(Debug)]
pub struct EncodedSequenceDataset<E> {
    strings: StringSequenceDataset<E>,
    pipeline: AxisTransformPipeline,
}

impl<E: SequenceExtractor> EncodedSequenceDataset<E> {
    pub fn new(strings: StringSequenceDataset<E>, pipeline: AxisTransformPipeline) -> Self {
        Self { strings, pipeline }
    }

    /// Parse the interval file at `intervals_file` and build a dataset over it.
    ///
    /// The extractor should upper-case its output, unless the alphabet is lower-case.
    pub fn from_path(
        intervals_file: impl AsRef<Path>,
        extractor: E,
        config: &EncodedSequenceConfig,
    ) -> Result<Self, SeqDataError> {
        let pipeline = AxisTransformPipeline::from_config(config)?;
        let strings =
            StringSequenceDataset::from_path(intervals_file, extractor, &config.sequence)?;
        Ok(Self::new(strings, pipeline))
    }

    /// The underlying string dataset.
    pub fn strings(&self) -> &StringSequenceDataset<E> {
        &self.strings
    }

    pub fn pipeline(&self) -> &AxisTransformPipeline {
        &self.pipeline
    }

    /// The shape of every tensor in the dataset, if a sequence length is required.
    pub fn output_shape(&self) -> Option<Vec<usize>> {
        self.strings
            .required_seq_len()
            .map(|len| self.pipeline.output_shape(len))
    }
}

impl EncodedSequenceDataset<FastaStringExtractor> {
    /// Build a dataset over an interval file and an indexed FASTA file.
    ///
    /// Sequences are always upper-cased before encoding, whatever `force_upper` says.
    pub fn from_fasta(
        intervals_file: impl AsRef<Path>,
        fasta_file: impl Into<PathBuf>,
        config: &EncodedSequenceConfig,
    ) -> Result<Self, SeqDataError> {
        let pipeline = AxisTransformPipeline::from_config(config)?;
        let mut sequence_config = config.sequence.clone();
        if !sequence_config.force_upper {
            debug!("force_upper is always on for encoded sequences");
            sequence_config.force_upper = true;
        }
        let strings =
            StringSequenceDataset::from_fasta(intervals_file, fasta_file, &sequence_config)?;
        Ok(Self::new(strings, pipeline))
    }
}

impl<E: SequenceExtractor> Dataset for EncodedSequenceDataset<E> {
    type Item = Record<ArrayD<f32>>;

    fn len(&self) -> usize {
        self.strings.len()
    }

    fn get(&self, index: usize) -> Result<Record<ArrayD<f32>>, SeqDataError> {
        let record = self.strings.get(index)?;
        Ok(record.map_inputs(|sequence| self.pipeline.apply(&sequence)))
    }
}
