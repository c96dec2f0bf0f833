//! Datasets of labeled sequence strings.

use log::{info, warn};
use std::path::{Path, PathBuf};

use super::{GenomicRanges, Metadata, Record};
use crate::{
    config::StringSequenceConfig,
    error::SeqDataError,
    ranges::{operations::resize_interval, operations::Anchor, Interval},
    sequences::nucleotide::{ExtractOptions, FastaStringExtractor},
    table::IntervalTable,
    traits::{Dataset, GenericRange, SequenceExtractor},
    Position,
};

/// Maps an index to the sequence string of the interval in that row of an
/// [`IntervalTable`], along with its labels.
///
/// If a required sequence length is set, intervals of a different length are either
/// resized around the `auto_resize` anchor or rejected with
/// [`SeqDataError::SequenceLengthMismatch`].
///
/// The extractor is built before the dataset and owned by it, so nothing is initialized
/// on first lookup. Extractors need not be [`Sync`]; give each thread its own dataset.
///
/// # Example
///
/// ```no_run
/// use seqdata::prelude::*;
///
/// let config = StringSequenceConfig {
///     required_seq_len: Some(1000),
///     auto_resize: Some(Anchor::Center),
///     ..Default::default()
/// };
/// let dataset = StringSequenceDataset::from_fasta("peaks.tsv", "hg38.fa", &config)
///     .expect("could not build dataset");
/// let record = dataset.get(0).expect("lookup failed");
/// assert_eq!(record.inputs.len(), 1000);
/// ```
#[derive(Debug)]
pub struct StringSequenceDataset<E> {
    table: IntervalTable,
    extractor: E,
    required_seq_len: Option<Position>,
    auto_resize: Option<Anchor>,
}

impl<E: SequenceExtractor> StringSequenceDataset<E> {
    /// Build a dataset over `table`, with sequences from `extractor`.
    ///
    /// Only the length options of `config` are used here; strand and case handling are
    /// properties of the extractor.
    pub fn new(
        table: IntervalTable,
        extractor: E,
        config: &StringSequenceConfig,
    ) -> Result<Self, SeqDataError> {
        let required_seq_len = config
            .required_seq_len
            .map(|len| {
                Position::try_from(len).map_err(|_| SeqDataError::RequiredSeqLenTooLarge(len))
            })
            .transpose()?;
        if config.auto_resize.is_some() && required_seq_len.is_none() {
            warn!("auto_resize is set but required_seq_len is not; intervals will not be resized");
        }
        info!(
            "dataset of {} intervals from {} ({} tasks, required length: {})",
            table.len(),
            table.filepath().display(),
            table.n_tasks(),
            required_seq_len.map_or("none".to_string(), |len| len.to_string())
        );
        Ok(Self {
            table,
            extractor,
            required_seq_len,
            auto_resize: config.auto_resize,
        })
    }

    /// Parse the interval file at `intervals_file` and build a dataset over it.
    pub fn from_path(
        intervals_file: impl AsRef<Path>,
        extractor: E,
        config: &StringSequenceConfig,
    ) -> Result<Self, SeqDataError> {
        let table = IntervalTable::from_path(intervals_file, &config.table)?;
        Self::new(table, extractor, config)
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn required_seq_len(&self) -> Option<usize> {
        self.required_seq_len.map(|len| len as usize)
    }

    /// The interval that will be extracted for row `index`: the table's interval,
    /// resized if necessary.
    pub fn interval(&self, index: usize) -> Result<Interval, SeqDataError> {
        let (interval, _) = self.table.get(index)?;
        self.resolve(index, interval)
    }

    fn resolve(&self, index: usize, interval: Interval) -> Result<Interval, SeqDataError> {
        let Some(required) = self.required_seq_len else {
            return Ok(interval);
        };
        if interval.width() == required {
            return Ok(interval);
        }
        match self.auto_resize {
            Some(anchor) => resize_interval(&interval, anchor, required),
            None => Err(SeqDataError::SequenceLengthMismatch {
                index,
                expected: required as usize,
                found: interval.len(),
            }),
        }
    }
}

impl StringSequenceDataset<FastaStringExtractor> {
    /// Build a dataset over an interval file and an indexed FASTA file, with the strand
    /// and case options from `config`.
    pub fn from_fasta(
        intervals_file: impl AsRef<Path>,
        fasta_file: impl Into<PathBuf>,
        config: &StringSequenceConfig,
    ) -> Result<Self, SeqDataError> {
        let options = ExtractOptions::new(config.use_strand, config.force_upper);
        let extractor = FastaStringExtractor::new(fasta_file, options)?;
        Self::from_path(intervals_file, extractor, config)
    }
}

impl<E: SequenceExtractor> Dataset for StringSequenceDataset<E> {
    type Item = Record<String>;

    fn len(&self) -> usize {
        self.table.len()
    }

    fn get(&self, index: usize) -> Result<Record<String>, SeqDataError> {
        let (interval, targets) = self.table.get(index)?;
        let interval = self.resolve(index, interval)?;
        let inputs = self.extractor.extract(&interval)?;
        Ok(Record {
            inputs,
            targets,
            metadata: Metadata {
                ranges: GenomicRanges::new(&interval, index),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ranges::Strand,
        sequences::nucleotide::InMemoryStringExtractor,
        table::labels::{LabelDtype, Scalar},
        test_utilities::temp_file_with,
    };
    use tempfile::NamedTempFile;

    // chr1 is 60bp, a 30bp sequence repeated twice
    const FASTA: &str = "\
>chr1
TTCACTACTATTAGTACTCACGGCGCAATATTCACTACTATTAGTACTCACGGCGCAATA
>chr2
acgtNNacgtACGTACGTAC
";

    /// An extractor that ignores the reference and returns 'N's of the right length.
    #[derive(Debug)]
    struct AllN;

    impl SequenceExtractor for AllN {
        fn extract(&self, interval: &Interval) -> Result<String, SeqDataError> {
            Ok("N".repeat(interval.len()))
        }
    }

    fn in_memory(use_strand: bool, force_upper: bool) -> (NamedTempFile, InMemoryStringExtractor) {
        let file = temp_file_with(FASTA);
        let options = ExtractOptions::new(use_strand, force_upper);
        let extractor = InMemoryStringExtractor::from_fasta(file.path(), options).unwrap();
        (file, extractor)
    }

    fn config(
        required_seq_len: Option<usize>,
        auto_resize: Option<Anchor>,
    ) -> StringSequenceConfig {
        let mut config = StringSequenceConfig {
            required_seq_len,
            auto_resize,
            ..Default::default()
        };
        config.table.label_dtype = LabelDtype::Int;
        config
    }

    #[test]
    fn test_get_records() {
        let intervals = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\t0\n");
        let (_fasta, extractor) = in_memory(false, true);
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), extractor, &config(None, None))
                .unwrap();
        assert_eq!(dataset.len(), 2);

        let record = dataset.get(0).unwrap();
        assert_eq!(record.inputs, "TTAGTACTCA");
        assert_eq!(record.targets, vec![Scalar::Int(1)]);
        assert_eq!(
            record.metadata.ranges,
            GenomicRanges {
                chrom: "chr1".to_string(),
                start: 10,
                stop: 20,
                id: "0".to_string()
            }
        );

        let record = dataset.get(1).unwrap();
        assert_eq!(record.inputs, "TTCAC");
        assert_eq!(record.ranges().id, "1");

        // lookups are deterministic
        assert_eq!(dataset.get(1).unwrap(), record);
    }

    #[test]
    fn test_center_resize() {
        let intervals = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\t0\n");
        let (_fasta, extractor) = in_memory(false, true);
        let config = config(Some(20), Some(Anchor::Center));
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), extractor, &config).unwrap();

        let record = dataset.get(1).unwrap();
        let ranges = record.ranges();
        assert_eq!(ranges.stop - ranges.start, 20);
        assert_eq!((ranges.start, ranges.stop), (22, 42));
        let midpoint = (ranges.start + ranges.stop) as f64 / 2.0;
        assert!((midpoint - 32.5).abs() < 1.0);
        assert_eq!(record.inputs, "GCGCAATATTCACTACTATT");

        let record = dataset.get(0).unwrap();
        assert_eq!((record.ranges().start, record.ranges().stop), (5, 25));
        assert_eq!(record.inputs, "TACTATTAGTACTCACGGCG");
    }

    #[test]
    fn test_start_end_resize() {
        let intervals = temp_file_with("chr1\t30\t35\t0\n");
        let (_fasta, extractor) = in_memory(false, true);
        let dataset = StringSequenceDataset::from_path(
            intervals.path(),
            extractor,
            &config(Some(8), Some(Anchor::Start)),
        )
        .unwrap();
        let interval = dataset.interval(0).unwrap();
        assert_eq!((interval.start, interval.stop), (30, 38));

        let (_fasta, extractor) = in_memory(false, true);
        let dataset = StringSequenceDataset::from_path(
            intervals.path(),
            extractor,
            &config(Some(8), Some(Anchor::End)),
        )
        .unwrap();
        let interval = dataset.interval(0).unwrap();
        assert_eq!((interval.start, interval.stop), (27, 35));
    }

    #[test]
    fn test_length_mismatch() {
        let intervals = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\t0\n");
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), AllN, &config(Some(10), None))
                .unwrap();
        assert_eq!(dataset.get(0).unwrap().inputs, "NNNNNNNNNN");
        let err = dataset.get(1).unwrap_err();
        assert!(matches!(
            err,
            SeqDataError::SequenceLengthMismatch {
                index: 1,
                expected: 10,
                found: 5
            }
        ));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_required_seq_len_too_large() {
        let intervals = temp_file_with("chr1\t10\t20\t1\n");
        let len = Position::MAX as usize + 1;
        let err =
            StringSequenceDataset::from_path(intervals.path(), AllN, &config(Some(len), None))
                .unwrap_err();
        assert!(matches!(err, SeqDataError::RequiredSeqLenTooLarge(l) if l == len));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_index_out_of_range() {
        let intervals = temp_file_with("chr1\t10\t20\t1\n");
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), AllN, &config(None, None)).unwrap();
        assert!(matches!(
            dataset.get(1),
            Err(SeqDataError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_auto_resize_without_length_is_ignored() {
        let intervals = temp_file_with("chr1\t30\t35\n");
        let dataset = StringSequenceDataset::from_path(
            intervals.path(),
            AllN,
            &config(None, Some(Anchor::Center)),
        )
        .unwrap();
        let record = dataset.get(0).unwrap();
        assert_eq!(record.inputs.len(), 5);
        assert!(record.targets.is_empty());
    }

    #[test]
    fn test_strand_and_case() {
        let intervals = temp_file_with("chr2\t0\t4\t.\t0\t-\nchr2\t4\t8\t.\t0\t+\n");
        let mut config = config(None, None);
        config.table.bed_columns = 6;

        let (_fasta, extractor) = in_memory(true, false);
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), extractor, &config).unwrap();
        let (interval, _) = dataset.table().get(0).unwrap();
        assert_eq!(interval.strand, Strand::Reverse);
        assert_eq!(dataset.get(0).unwrap().inputs, "acgt");
        assert_eq!(dataset.get(1).unwrap().inputs, "NNac");

        let (_fasta, extractor) = in_memory(false, true);
        let dataset =
            StringSequenceDataset::from_path(intervals.path(), extractor, &config).unwrap();
        assert_eq!(dataset.get(0).unwrap().inputs, "ACGT");
        assert_eq!(dataset.get(1).unwrap().inputs, "NNAC");
    }

    #[test]
    fn test_resize_out_of_bounds() {
        let intervals = temp_file_with("chr2\t2\t4\n");
        let (_fasta, extractor) = in_memory(false, true);
        let dataset = StringSequenceDataset::from_path(
            intervals.path(),
            extractor,
            &config(Some(10), Some(Anchor::End)),
        )
        .unwrap();
        assert!(matches!(
            dataset.get(0),
            Err(SeqDataError::InvalidGenomicRange(_, _))
        ));
    }
}
