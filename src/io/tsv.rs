//! Essential TSV reading and writing functionality, which wraps the blazingly-fast [`csv`]
//! crate.

use csv::{Reader, ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::PathBuf;

use crate::error::SeqDataError;
use crate::io::InputFile;

/// This is an extensible type to handle common TSV output configurations, e.g. what to
/// print for missing values.
pub struct TsvConfig {
    pub no_value_string: &'static str,
}

/// The standard BED format TSV configuration.
pub const BED_TSV: TsvConfig = TsvConfig {
    no_value_string: ".",
};

/// Build a headerless TSV reader which ignores comment lines and works on gzip-compressed
/// files.
///
/// Rows must all have the same number of columns; ragged rows are reported by
/// [`csv`] as errors.
pub fn build_tsv_reader(
    filepath: impl Into<PathBuf>,
) -> Result<Reader<Box<dyn Read>>, SeqDataError> {
    let stream: Box<dyn Read> = Box::new(InputFile::new(filepath).reader()?);
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(false)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(stream);
    Ok(reader)
}

/// The types of the (up to twelve) BED columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BedColumnType {
    String,
    Int,
    Float,
}

/// BED column types, according to <https://www.ensembl.org/info/website/upload/bed.html>.
pub const BED_COLUMN_TYPES: [BedColumnType; 12] = [
    BedColumnType::String, // chrom
    BedColumnType::Int,    // chromStart
    BedColumnType::Int,    // chromEnd
    BedColumnType::String, // name
    BedColumnType::Float,  // score
    BedColumnType::String, // strand
    BedColumnType::Int,    // thickStart
    BedColumnType::Int,    // thickEnd
    BedColumnType::String, // itemRgb
    BedColumnType::Int,    // blockCount
    BedColumnType::Int,    // blockSizes
    BedColumnType::Int,    // blockStarts
];

/// Rejoin a parsed row into its tab-separated line, for error messages.
pub fn record_line(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join("\t")
}

/// Parse a single TSV column into `T`, reporting the expected type and the offending
/// row on failure.
pub fn parse_column<T: std::str::FromStr>(
    column: &str,
    record: &StringRecord,
) -> Result<T, SeqDataError>
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    column
        .parse::<T>()
        .map_err(|_| SeqDataError::InvalidColumnType {
            expected_type: std::any::type_name::<T>().to_string(),
            found_value: column.to_string(),
            line: record_line(record),
        })
}
