//! Interval tables: typed, filtered, randomly-addressable BED-like files with task labels.
//!
//! An interval file is a headerless TSV:
//!
//! ```text
//! chrom  start  end  [name  score  strand ...]  task1  task2 ...
//! ```
//!
//! The first `bed_columns` columns follow the BED column order (and types, see
//! [`BED_COLUMN_TYPES`]); every remaining column is a task label. The number of tasks is
//! detected from the first row. The whole file is read once, into column vectors, and is
//! immutable after that.
//!
//! [`BED_COLUMN_TYPES`]: crate::io::tsv::BED_COLUMN_TYPES

use csv::StringRecord;
use log::debug;
use ndarray::Array2;
use std::path::{Path, PathBuf};

use crate::{
    config::IntervalTableConfig,
    error::SeqDataError,
    io::tsv::{build_tsv_reader, parse_column, BedColumnType, BED_COLUMN_TYPES},
    ranges::{Interval, Strand},
    Position,
};

pub mod filters;
pub mod labels;

use filters::{ambiguous_keep_mask, normalize_chromosomes, retain_by_mask, seqname_keep_mask};
use labels::{infer_column, LabelDtype, Scalar};

/// BED column index of the strand.
const STRAND_COLUMN: usize = 5;

/// A parsed and filtered interval table.
///
/// Rows are `(Interval, labels)` pairs in file order (minus filtered rows), addressable
/// by a 0-based index.
///
/// # Example
///
/// ```no_run
/// use seqdata::prelude::*;
///
/// let config = IntervalTableConfig {
///     label_dtype: LabelDtype::Int,
///     ..Default::default()
/// };
/// let table = IntervalTable::from_path("intervals.tsv", &config).expect("parsing error");
/// let (interval, labels) = table.get(0).expect("empty table");
/// println!("{} has {} labels", interval, labels.len());
/// ```
#[derive(Clone, Debug)]
pub struct IntervalTable {
    filepath: PathBuf,
    bed_columns: usize,
    label_dtype: LabelDtype,
    chroms: Vec<String>,
    starts: Vec<Position>,
    stops: Vec<Position>,
    strands: Vec<Strand>,
    // BED columns 4 to `bed_columns`, column-major
    bed_extra: Vec<Vec<Scalar>>,
    // task label columns, column-major
    labels: Vec<Vec<Scalar>>,
}

/// Parse an optional BED column (4th onwards); a lone `'.'` is a missing value.
fn parse_bed_extra(
    column_type: BedColumnType,
    value: &str,
    record: &StringRecord,
) -> Result<Scalar, SeqDataError> {
    if value == "." {
        return Ok(Scalar::Missing);
    }
    Ok(match column_type {
        BedColumnType::String => Scalar::Str(value.to_string()),
        BedColumnType::Int => Scalar::Int(parse_column(value, record)?),
        BedColumnType::Float => Scalar::Float(parse_column(value, record)?),
    })
}

impl IntervalTable {
    /// Read, parse and filter an interval file.
    ///
    /// # Arguments
    /// * `filepath`: path to the (possibly gzipped) tab-separated interval file.
    /// * `config`: parsing and filtering options; see [`IntervalTableConfig`].
    ///
    /// # Errors
    /// Configuration errors ([`SeqDataError::InvalidBedColumns`],
    /// [`SeqDataError::NegativeTaskCount`]) are reported before any row is parsed.
    /// Malformed rows fail with the [`csv`] reader's error or a column parsing error.
    pub fn from_path(
        filepath: impl AsRef<Path>,
        config: &IntervalTableConfig,
    ) -> Result<Self, SeqDataError> {
        let filepath = filepath.as_ref().to_path_buf();
        let bed_columns = config.bed_columns;
        if !(3..=BED_COLUMN_TYPES.len()).contains(&bed_columns) {
            return Err(SeqDataError::InvalidBedColumns(bed_columns));
        }
        // a mask from a config file is untyped; compare it as a label of the table's type
        let ambiguous_mask = config
            .ambiguous_mask
            .as_ref()
            .map(|mask| config.label_dtype.coerce(mask))
            .transpose()?;

        let mut reader = build_tsv_reader(&filepath)?;
        let mut records = reader.records();

        // peek at the first row to get the number of tasks
        let first = match records.next() {
            Some(record) => record?,
            None => {
                return Err(SeqDataError::EmptyIntervalFile(
                    filepath.display().to_string(),
                ))
            }
        };
        let columns = first.len();
        if columns < bed_columns {
            return Err(SeqDataError::NegativeTaskCount {
                columns,
                bed_columns,
            });
        }
        let n_tasks = columns - bed_columns;
        debug!(
            "{}: {} columns, {} BED columns and {} task columns",
            filepath.display(),
            columns,
            bed_columns,
            n_tasks
        );

        let mut table = IntervalTable {
            filepath,
            bed_columns,
            label_dtype: config.label_dtype,
            chroms: Vec::new(),
            starts: Vec::new(),
            stops: Vec::new(),
            strands: Vec::new(),
            bed_extra: vec![Vec::new(); bed_columns - 3],
            labels: vec![Vec::new(); n_tasks],
        };
        // raw label strings, only kept when column types are inferred
        let mut raw_labels: Vec<Vec<String>> = vec![Vec::new(); n_tasks];

        for result in std::iter::once(Ok(first)).chain(records) {
            let record = result?;
            let start: Position = parse_column(&record[1], &record)?;
            let stop: Position = parse_column(&record[2], &record)?;
            if start > stop {
                return Err(SeqDataError::InvalidGenomicRange(start.into(), stop.into()));
            }
            table.chroms.push(record[0].to_string());
            table.starts.push(start);
            table.stops.push(stop);

            let mut strand = Strand::Unstranded;
            for (i, column) in table.bed_extra.iter_mut().enumerate() {
                let index = i + 3;
                let value = &record[index];
                if index == STRAND_COLUMN {
                    strand = value.parse()?;
                }
                column.push(parse_bed_extra(BED_COLUMN_TYPES[index], value, &record)?);
            }
            table.strands.push(strand);

            for (task, value) in record.iter().skip(bed_columns).enumerate() {
                match config.label_dtype {
                    LabelDtype::Inferred => raw_labels[task].push(value.to_string()),
                    dtype => table.labels[task].push(dtype.parse(value, &record)?),
                }
            }
        }

        if config.label_dtype == LabelDtype::Inferred {
            table.labels = raw_labels.into_iter().map(infer_column).collect();
        }

        let action = normalize_chromosomes(&mut table.chroms, config.num_chr);
        debug!("chromosome name normalization: {:?}", action);

        if let Some(mask) = &ambiguous_mask {
            let keep = ambiguous_keep_mask(&table.labels, table.len(), mask);
            table.retain_rows(&keep, "ambiguous labels");
        }
        if let Some(seqnames) = &config.incl_chromosomes {
            let keep = seqname_keep_mask(&table.chroms, seqnames, true);
            table.retain_rows(&keep, "chromosome inclusion list");
        }
        if let Some(seqnames) = &config.excl_chromosomes {
            let keep = seqname_keep_mask(&table.chroms, seqnames, false);
            table.retain_rows(&keep, "chromosome exclusion list");
        }

        Ok(table)
    }

    /// Drop rows whose `keep` entry is `false`, from every column.
    fn retain_rows(&mut self, keep: &[bool], reason: &str) {
        let before = self.len();
        retain_by_mask(&mut self.chroms, keep);
        retain_by_mask(&mut self.starts, keep);
        retain_by_mask(&mut self.stops, keep);
        retain_by_mask(&mut self.strands, keep);
        for column in self.bed_extra.iter_mut().chain(self.labels.iter_mut()) {
            retain_by_mask(column, keep);
        }
        debug!(
            "{} of {} rows removed by {}",
            before - self.len(),
            before,
            reason
        );
    }

    /// The file this table was read from.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    /// The number of rows left after filtering.
    pub fn len(&self) -> usize {
        self.chroms.len()
    }

    /// Whether the table has no rows left after filtering.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of leading BED columns.
    pub fn bed_columns(&self) -> usize {
        self.bed_columns
    }

    /// The number of task label columns.
    pub fn n_tasks(&self) -> usize {
        self.labels.len()
    }

    /// The data type label columns were cast to.
    pub fn label_dtype(&self) -> LabelDtype {
        self.label_dtype
    }

    /// Chromosome names of all rows, after normalization.
    pub fn chroms(&self) -> &[String] {
        &self.chroms
    }

    /// Build the row at `index`; the caller guarantees `index < len()`.
    fn row(&self, index: usize) -> (Interval, Vec<Scalar>) {
        let extra = |column: usize| self.bed_extra.get(column - 3).map(|c| &c[index]);
        let name = match extra(3) {
            Some(Scalar::Str(name)) => Some(name.clone()),
            _ => None,
        };
        let score = extra(4).and_then(Scalar::as_f64);
        let interval = Interval {
            chrom: self.chroms[index].clone(),
            start: self.starts[index],
            stop: self.stops[index],
            name,
            score,
            strand: self.strands[index],
            extra: self
                .bed_extra
                .iter()
                .skip(STRAND_COLUMN + 1 - 3)
                .map(|column| column[index].clone())
                .collect(),
        };
        let labels = self
            .labels
            .iter()
            .map(|column| column[index].clone())
            .collect();
        (interval, labels)
    }

    /// Get the interval and label vector at `index`.
    ///
    /// The label vector is empty when the table has no task columns.
    pub fn get(&self, index: usize) -> Result<(Interval, Vec<Scalar>), SeqDataError> {
        if index >= self.len() {
            return Err(SeqDataError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(self.row(index))
    }

    /// Iterate over all `(Interval, labels)` rows, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (Interval, Vec<Scalar>)> + '_ {
        (0..self.len()).map(move |index| self.row(index))
    }

    /// All label columns as a `(rows, tasks)` matrix, in table row order.
    pub fn get_targets(&self) -> Array2<Scalar> {
        Array2::from_shape_fn((self.len(), self.n_tasks()), |(row, task)| {
            self.labels[task][row].clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with;

    fn int_config() -> IntervalTableConfig {
        IntervalTableConfig {
            label_dtype: LabelDtype::Int,
            ..Default::default()
        }
    }

    #[test]
    fn test_basic_table() {
        let file = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\t0\n");
        let table = IntervalTable::from_path(file.path(), &int_config()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.n_tasks(), 1);
        let (interval, labels) = table.get(0).unwrap();
        assert_eq!(interval, Interval::new("chr1", 10, 20));
        assert_eq!(labels, vec![Scalar::Int(1)]);
        let (interval, labels) = table.get(1).unwrap();
        assert_eq!((interval.start, interval.stop), (30, 35));
        assert_eq!(labels, vec![Scalar::Int(0)]);
    }

    #[test]
    fn test_index_out_of_range() {
        let file = temp_file_with("chr1\t10\t20\t1\n");
        let table = IntervalTable::from_path(file.path(), &int_config()).unwrap();
        assert!(matches!(
            table.get(1),
            Err(SeqDataError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_no_tasks() {
        let file = temp_file_with("chr1\t10\t20\nchr2\t5\t6\n");
        let table = IntervalTable::from_path(file.path(), &Default::default()).unwrap();
        assert_eq!(table.n_tasks(), 0);
        let (_, labels) = table.get(1).unwrap();
        assert!(labels.is_empty());
        assert_eq!(table.get_targets().shape(), &[2, 0]);
    }

    #[test]
    fn test_too_few_columns() {
        let file = temp_file_with("chr1\t10\t20\n");
        let config = IntervalTableConfig {
            bed_columns: 6,
            ..Default::default()
        };
        let err = IntervalTable::from_path(file.path(), &config).unwrap_err();
        assert!(matches!(
            err,
            SeqDataError::NegativeTaskCount {
                columns: 3,
                bed_columns: 6
            }
        ));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_invalid_bed_columns() {
        let file = temp_file_with("chr1\t10\t20\n");
        let config = IntervalTableConfig {
            bed_columns: 2,
            ..Default::default()
        };
        assert!(matches!(
            IntervalTable::from_path(file.path(), &config),
            Err(SeqDataError::InvalidBedColumns(2))
        ));
    }

    #[test]
    fn test_empty_file() {
        let file = temp_file_with("");
        assert!(matches!(
            IntervalTable::from_path(file.path(), &Default::default()),
            Err(SeqDataError::EmptyIntervalFile(_))
        ));
    }

    #[test]
    fn test_ragged_rows() {
        let file = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\n");
        let result = IntervalTable::from_path(file.path(), &int_config());
        assert!(matches!(result, Err(SeqDataError::CsvError(_))));
    }

    #[test]
    fn test_bad_label_type() {
        let file = temp_file_with("chr1\t10\t20\t1\nchr1\t30\t35\tyes\n");
        let result = IntervalTable::from_path(file.path(), &int_config());
        assert!(matches!(
            result,
            Err(SeqDataError::InvalidColumnType { line, .. }) if line == "chr1\t30\t35\tyes"
        ));
    }

    #[test]
    fn test_bed6_fields() {
        let file = temp_file_with("chr1\t10\t20\tpeak1\t5.5\t-\t1\nchr1\t30\t35\t.\t.\t.\t0\n");
        let config = IntervalTableConfig {
            bed_columns: 6,
            ..int_config()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.n_tasks(), 1);
        let (interval, labels) = table.get(0).unwrap();
        assert_eq!(interval.name.as_deref(), Some("peak1"));
        assert_eq!(interval.score, Some(5.5));
        assert_eq!(interval.strand, Strand::Reverse);
        assert!(interval.extra.is_empty());
        assert_eq!(labels, vec![Scalar::Int(1)]);

        let (interval, _) = table.get(1).unwrap();
        assert_eq!(interval.name, None);
        assert_eq!(interval.score, None);
        assert_eq!(interval.strand, Strand::Unstranded);
    }

    #[test]
    fn test_bed12_extra_fields() {
        let file = temp_file_with("chr1\t10\t20\tn\t0\t+\t12\t18\t255,0,0\t1\t10\t0\n");
        let config = IntervalTableConfig {
            bed_columns: 12,
            ..Default::default()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.n_tasks(), 0);
        let (interval, _) = table.get(0).unwrap();
        assert_eq!(interval.strand, Strand::Forward);
        assert_eq!(
            interval.extra,
            vec![
                Scalar::Int(12),
                Scalar::Int(18),
                Scalar::Str("255,0,0".to_string()),
                Scalar::Int(1),
                Scalar::Int(10),
                Scalar::Int(0),
            ]
        );
    }

    #[test]
    fn test_invalid_strand() {
        let file = temp_file_with("chr1\t10\t20\tn\t0\tx\n");
        let config = IntervalTableConfig {
            bed_columns: 6,
            ..Default::default()
        };
        assert!(matches!(
            IntervalTable::from_path(file.path(), &config),
            Err(SeqDataError::InvalidStrand(_))
        ));
    }

    #[test]
    fn test_start_after_end() {
        let file = temp_file_with("chr1\t20\t10\n");
        assert!(matches!(
            IntervalTable::from_path(file.path(), &Default::default()),
            Err(SeqDataError::InvalidGenomicRange(20, 10))
        ));
    }

    #[test]
    fn test_ambiguous_mask() {
        let file = temp_file_with(
            "chr1\t0\t10\t1\t-1\nchr1\t10\t20\t-1\t-1\nchr1\t20\t30\t-1\t0\n",
        );
        let config = IntervalTableConfig {
            ambiguous_mask: Some(Scalar::Int(-1)),
            ..int_config()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.len(), 2);
        let starts: Vec<Position> = table.iter().map(|(i, _)| i.start).collect();
        assert_eq!(starts, vec![0, 20]);
    }

    #[test]
    fn test_ambiguous_mask_cast_to_label_dtype() {
        let file = temp_file_with("chr1\t0\t10\t-1\nchr1\t10\t20\t1\n");
        let config = IntervalTableConfig::from_toml_str(
            "label_dtype = \"string\"\nambiguous_mask = -1\n",
        )
        .unwrap();
        assert_eq!(config.ambiguous_mask, Some(Scalar::Int(-1)));
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap().1, vec![Scalar::Str("1".to_string())]);
    }

    #[test]
    fn test_chromosome_filters() {
        let file = temp_file_with("chr1\t0\t10\nchr2\t0\t10\nchrX\t0\t10\nchr1\t5\t10\n");
        let config = IntervalTableConfig {
            incl_chromosomes: Some(vec!["chr1".to_string(), "chrX".to_string()]),
            excl_chromosomes: Some(vec!["chrX".to_string()]),
            ..Default::default()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.chroms(), &["chr1".to_string(), "chr1".to_string()]);
        assert_eq!(table.get(1).unwrap().0.start, 5);
    }

    #[test]
    fn test_filters_after_normalization() {
        let file = temp_file_with("1\t0\t10\n2\t0\t10\n");
        let config = IntervalTableConfig {
            excl_chromosomes: Some(vec!["chr2".to_string()]),
            ..Default::default()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.chroms(), &["chr1".to_string()]);
    }

    #[test]
    fn test_num_chr() {
        let file = temp_file_with("chr1\t0\t10\nchr2\t0\t10\n");
        let config = IntervalTableConfig {
            num_chr: true,
            ..Default::default()
        };
        let table = IntervalTable::from_path(file.path(), &config).unwrap();
        assert_eq!(table.chroms(), &["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_inferred_labels() {
        let file = temp_file_with("chr1\t0\t10\t1\t0.5\tpos\nchr1\t0\t10\t0\t1\tneg\n");
        let table = IntervalTable::from_path(file.path(), &Default::default()).unwrap();
        let targets = table.get_targets();
        assert_eq!(targets.shape(), &[2, 3]);
        assert_eq!(targets[[0, 0]], Scalar::Int(1));
        assert_eq!(targets[[1, 1]], Scalar::Float(1.0));
        assert_eq!(targets[[1, 2]], Scalar::Str("neg".to_string()));
    }

    #[test]
    fn test_gzipped_table() {
        let file = crate::test_utilities::temp_gz_file_with("chr1\t10\t20\t1\n");
        let table = IntervalTable::from_path(file.path(), &int_config()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
