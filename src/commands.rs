//! Command functions for the `seqdata` command line tool.
//!
//! Each command builds a dataset, runs every index through it, and writes the results.

use ndarray::{ArrayD, ArrayView, Axis, IxDyn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    config::{EncodedSequenceConfig, IntervalTableConfig, StringSequenceConfig},
    datasets::{EncodedSequenceDataset, GenomicRanges, StringSequenceDataset},
    error::SeqDataError,
    io::{OutputFile, BED_TSV},
    reporting::{CommandOutput, Report},
    sequences::nucleotide::{ExtractOptions, FastaStringExtractor, InMemoryStringExtractor},
    table::IntervalTable,
    traits::{Dataset, SequenceExtractor, TsvSerialize},
    transforms::AxisTransformPipeline,
};

/// Where the reference sequences come from.
#[derive(Clone, Debug)]
pub struct ReferenceFasta {
    pub path: PathBuf,
    /// Load the whole file into memory, rather than reading it through its `.fai` index.
    pub in_memory: bool,
}

impl ReferenceFasta {
    pub fn new(path: impl Into<PathBuf>, in_memory: bool) -> Self {
        Self {
            path: path.into(),
            in_memory,
        }
    }
}

fn output_stream(output: Option<&PathBuf>) -> OutputFile {
    output.map_or(OutputFile::new_stdout(), OutputFile::new)
}

/// Whether the record at `index` was resized, i.e. its range differs from the table's.
fn note_resized(table: &IntervalTable, index: usize, ranges: &GenomicRanges) -> bool {
    table
        .get(index)
        .map(|(interval, _)| interval.start != ranges.start || interval.stop != ranges.stop)
        .unwrap_or(false)
}

fn report_resized(
    report: &mut Report,
    resized: usize,
    total: usize,
    config: &StringSequenceConfig,
) {
    if resized > 0 {
        let anchor = config
            .auto_resize
            .map_or("?".to_string(), |anchor| anchor.to_string());
        report.add_issue(format!(
            "{} of {} intervals were resized to {}bp around their {}",
            resized,
            total,
            config.required_seq_len.unwrap_or_default(),
            anchor
        ));
    }
}

fn write_strings<E: SequenceExtractor>(
    dataset: &StringSequenceDataset<E>,
    config: &StringSequenceConfig,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<usize>, SeqDataError> {
    let mut writer = output_stream(output).writer()?;
    let mut report = Report::new();

    let mut resized = 0;
    for index in 0..dataset.len() {
        let record = dataset.get(index)?;
        if note_resized(dataset.table(), index, record.ranges()) {
            resized += 1;
        }
        writeln!(writer, "{}", record.to_tsv(&BED_TSV))?;
    }
    writer.flush()?;
    report_resized(&mut report, resized, dataset.len(), config);
    Ok(CommandOutput::new(dataset.len(), report))
}

/// Write the sequence string of every interval, one TSV line per interval:
/// `id`, `chrom`, `start`, `stop`, the sequence, then the labels.
pub fn seqdata_strings(
    intervals: &Path,
    fasta: &ReferenceFasta,
    config: &StringSequenceConfig,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<usize>, SeqDataError> {
    let options = ExtractOptions::new(config.use_strand, config.force_upper);
    if fasta.in_memory {
        let extractor = InMemoryStringExtractor::from_fasta(&fasta.path, options)?;
        let dataset = StringSequenceDataset::from_path(intervals, extractor, config)?;
        write_strings(&dataset, config, output)
    } else {
        let extractor = FastaStringExtractor::new(&fasta.path, options)?;
        let dataset = StringSequenceDataset::from_path(intervals, extractor, config)?;
        write_strings(&dataset, config, output)
    }
}

/// Encode every record and stack the tensors along a new first axis.
///
/// All tensors must have the same shape, otherwise this fails with
/// [`SeqDataError::InconsistentShapes`].
pub fn stack_records<E: SequenceExtractor>(
    dataset: &EncodedSequenceDataset<E>,
    report: &mut Report,
) -> Result<ArrayD<f32>, SeqDataError> {
    let mut tensors: Vec<ArrayD<f32>> = Vec::with_capacity(dataset.len());
    let mut resized = 0;
    for index in 0..dataset.len() {
        let record = dataset.get(index)?;
        if note_resized(dataset.strings().table(), index, record.ranges()) {
            resized += 1;
        }
        if let Some(first) = tensors.first() {
            if first.shape() != record.inputs.shape() {
                return Err(SeqDataError::InconsistentShapes {
                    index,
                    expected: first.shape().to_vec(),
                    found: record.inputs.shape().to_vec(),
                });
            }
        }
        tensors.push(record.inputs);
    }
    if resized > 0 {
        report.add_issue(format!(
            "{} of {} intervals were resized",
            resized,
            dataset.len()
        ));
    }

    if tensors.is_empty() {
        let mut shape = vec![0];
        shape.extend(
            dataset
                .output_shape()
                .unwrap_or_else(|| dataset.pipeline().output_shape(0)),
        );
        return Ok(ArrayD::zeros(IxDyn(&shape)));
    }
    let views: Vec<ArrayView<f32, IxDyn>> = tensors.iter().map(|tensor| tensor.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

/// One-hot encode every interval's sequence and write them as one `(records, ...)`
/// `float32` array to a `.npy` file.
pub fn seqdata_onehot(
    intervals: &Path,
    fasta: &ReferenceFasta,
    config: &EncodedSequenceConfig,
    output: &Path,
) -> Result<CommandOutput<Vec<usize>>, SeqDataError> {
    let mut report = Report::new();
    let pipeline = AxisTransformPipeline::from_config(config)?;
    // encoded sequences are always upper-cased
    let options = ExtractOptions::new(config.sequence.use_strand, true);
    let stacked = if fasta.in_memory {
        let extractor = InMemoryStringExtractor::from_fasta(&fasta.path, options)?;
        let strings = StringSequenceDataset::from_path(intervals, extractor, &config.sequence)?;
        stack_records(&EncodedSequenceDataset::new(strings, pipeline), &mut report)?
    } else {
        let extractor = FastaStringExtractor::new(&fasta.path, options)?;
        let strings = StringSequenceDataset::from_path(intervals, extractor, &config.sequence)?;
        stack_records(&EncodedSequenceDataset::new(strings, pipeline), &mut report)?
    };
    ndarray_npy::write_npy(output, &stacked)?;
    Ok(CommandOutput::new(stacked.shape().to_vec(), report))
}

/// Write the label matrix of an interval table, one TSV line per interval.
pub fn seqdata_targets(
    intervals: &Path,
    config: &IntervalTableConfig,
    output: Option<&PathBuf>,
) -> Result<CommandOutput<usize>, SeqDataError> {
    let table = IntervalTable::from_path(intervals, config)?;
    let mut writer = output_stream(output).writer()?;
    let mut report = Report::new();
    if table.n_tasks() == 0 {
        report.add_issue(format!(
            "{} has no task label columns",
            table.filepath().display()
        ));
    }

    let targets = table.get_targets();
    for row in targets.rows() {
        writeln!(writer, "{}", row.to_vec().to_tsv(&BED_TSV))?;
    }
    writer.flush()?;
    Ok(CommandOutput::new(table.len(), report))
}
