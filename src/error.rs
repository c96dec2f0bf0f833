//! The [`SeqDataError`] `enum` definition and error messages.
//!
use crate::PositionOffset;
use genomap::GenomeMapError;
use std::string::FromUtf8Error;
use thiserror::Error;

/// The [`SeqDataError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum SeqDataError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("TSV reading error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Could not parse configuration file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Could not write .npy output: {0}")]
    NpyWriteError(#[from] ndarray_npy::WriteNpyError),
    #[error("Sequence name is not valid UTF8: {0}")]
    FromUtf8Error(#[from] FromUtf8Error),

    // File parsing related errors
    #[error("Interval file '{0}' contains no rows")]
    EmptyIntervalFile(String),
    #[error("Column has invalid type: expected {expected_type}, found '{found_value}'.\nLine: {line}")]
    InvalidColumnType {
        expected_type: String,
        found_value: String,
        line: String,
    },
    #[error("Invalid BED strand '{0}': must be either '+', '-', or '.'")]
    InvalidStrand(String),
    #[error("Range invalid: start ({0}) must be non-negative and no greater than end ({1})")]
    InvalidGenomicRange(PositionOffset, PositionOffset),

    // Configuration errors
    #[error("Invalid number of BED columns ({0}): must be between 3 and 12")]
    InvalidBedColumns(usize),
    #[error("Interval file has {columns} columns, fewer than the {bed_columns} BED columns requested")]
    NegativeTaskCount { columns: usize, bed_columns: usize },
    #[error("Label data type '{0}' not recognized. Allowed are: 'string', 'int', 'float', 'bool', 'none'")]
    UnknownLabelDtype(String),
    #[error("Resize anchor '{0}' not recognized. Allowed are: 'start', 'end', 'center'")]
    UnknownAnchor(String),
    #[error("Alphabet '{0}' not recognized. Use 'DNA', 'RNA', 'AMINO_ACIDS' or a list of single-character symbols")]
    UnknownAlphabet(String),
    #[error("Alphabet is empty")]
    EmptyAlphabet,
    #[error("Alphabet symbol '{0}' occurs more than once")]
    DuplicateAlphabetSymbol(char),
    #[error("Sequence interval for index {index} has length {found}, which does not match the required sequence length {expected}. Update the intervals file or use the 'auto_resize' argument.")]
    SequenceLengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Required sequence length {0} is larger than any genomic position")]
    RequiredSeqLenTooLarge(usize),
    #[error("Axis {axis} is out of bounds for a tensor with {ndim} axes")]
    InvalidAxis { axis: usize, ndim: usize },
    #[error("Record {index} has shape {found:?}, but earlier records have shape {expected:?}. Set a required sequence length.")]
    InconsistentShapes {
        index: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    // Lookup errors
    #[error("Index {index} is out of range for a dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // Reference sequence errors
    #[error("Sequence name '{0}' is not in the reference")]
    MissingSequence(String),
    #[error("Range [{start}, {end}) is invalid for sequence '{seqname}' of length {length}")]
    InvalidRangeForSequence {
        seqname: String,
        start: PositionOffset,
        end: PositionOffset,
        length: usize,
    },
    #[error("Error encountered in genomap::GenomeMap")]
    GenomeMapError(#[from] GenomeMapError),
    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),
}

impl SeqDataError {
    /// Whether this error stems from an invalid configuration (as opposed to bad input
    /// data, an out-of-range lookup, or I/O).
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SeqDataError::InvalidBedColumns(_)
                | SeqDataError::NegativeTaskCount { .. }
                | SeqDataError::UnknownLabelDtype(_)
                | SeqDataError::UnknownAnchor(_)
                | SeqDataError::UnknownAlphabet(_)
                | SeqDataError::EmptyAlphabet
                | SeqDataError::DuplicateAlphabetSymbol(_)
                | SeqDataError::SequenceLengthMismatch { .. }
                | SeqDataError::RequiredSeqLenTooLarge(_)
                | SeqDataError::InvalidAxis { .. }
                | SeqDataError::InconsistentShapes { .. }
        )
    }
}
