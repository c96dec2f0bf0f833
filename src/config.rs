//! Dataset configuration.
//!
//! Each layer of the pipeline has a config struct, and the higher layers embed (flatten)
//! the lower ones:
//!
//!  - [`IntervalTableConfig`]: how the interval file is parsed and filtered.
//!  - [`StringSequenceConfig`]: sequence length enforcement and extraction options.
//!  - [`EncodedSequenceConfig`]: the one-hot alphabet and output axis layout.
//!
//! All of them have defaults and can be read from TOML, e.g.
//!
//! ```toml
//! bed_columns = 3
//! label_dtype = "int"
//! ambiguous_mask = -1
//! excl_chromosomes = ["chrX", "chrY"]
//! required_seq_len = 1000
//! auto_resize = "center"
//! alphabet = "DNA"
//! dummy_axis = 2
//! ```

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::{
    error::SeqDataError,
    io::InputFile,
    ranges::operations::Anchor,
    table::labels::{LabelDtype, Scalar},
    transforms::Alphabet,
};

/// Parse a config struct from a TOML file.
fn read_toml<T: for<'de> Deserialize<'de>>(filepath: impl AsRef<Path>) -> Result<T, SeqDataError> {
    let mut contents = String::new();
    InputFile::new(filepath.as_ref())
        .reader()?
        .read_to_string(&mut contents)?;
    Ok(toml::from_str(&contents)?)
}

/// Options for parsing and filtering an interval table.
///
/// # Fields
/// * `bed_columns`: the number of leading BED columns (3 to 12); the remaining columns
///   are task labels.
/// * `num_chr`: if `true`, chromosome names are stripped of a `"chr"` prefix; if
///   `false`, one is added. Which (if either) happens is decided from the first row.
/// * `label_dtype`: the type label columns are cast to.
/// * `ambiguous_mask`: rows whose labels all equal this value are dropped.
/// * `incl_chromosomes`: if set, only rows on these chromosomes are kept.
/// * `excl_chromosomes`: if set, rows on these chromosomes are dropped.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntervalTableConfig {
    pub bed_columns: usize,
    pub num_chr: bool,
    pub label_dtype: LabelDtype,
    pub ambiguous_mask: Option<Scalar>,
    pub incl_chromosomes: Option<Vec<String>>,
    pub excl_chromosomes: Option<Vec<String>>,
}

impl Default for IntervalTableConfig {
    fn default() -> Self {
        Self {
            bed_columns: 3,
            num_chr: false,
            label_dtype: LabelDtype::default(),
            ambiguous_mask: None,
            incl_chromosomes: None,
            excl_chromosomes: None,
        }
    }
}

impl IntervalTableConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, SeqDataError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(filepath: impl AsRef<Path>) -> Result<Self, SeqDataError> {
        read_toml(filepath)
    }
}

/// Options for a [`StringSequenceDataset`].
///
/// # Fields
/// * `table`: the [`IntervalTableConfig`] (flattened in TOML).
/// * `required_seq_len`: if set, every extracted sequence must have this length.
/// * `auto_resize`: resize intervals of the wrong length around this anchor, rather
///   than failing. Only used when `required_seq_len` is set.
/// * `use_strand`: reverse-complement sequences of negative-strand intervals.
/// * `force_upper`: upper-case extracted sequences.
///
/// [`StringSequenceDataset`]: crate::datasets::StringSequenceDataset
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StringSequenceConfig {
    #[serde(flatten)]
    pub table: IntervalTableConfig,
    pub required_seq_len: Option<usize>,
    pub auto_resize: Option<Anchor>,
    pub use_strand: bool,
    pub force_upper: bool,
}

impl Default for StringSequenceConfig {
    fn default() -> Self {
        Self {
            table: IntervalTableConfig::default(),
            required_seq_len: None,
            auto_resize: None,
            use_strand: false,
            force_upper: true,
        }
    }
}

impl StringSequenceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, SeqDataError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(filepath: impl AsRef<Path>) -> Result<Self, SeqDataError> {
        read_toml(filepath)
    }
}

/// Options for an [`EncodedSequenceDataset`].
///
/// # Fields
/// * `sequence`: the [`StringSequenceConfig`] (flattened in TOML).
/// * `alphabet`: the one-hot alphabet; its order defines the encoding.
/// * `alphabet_axis`: the output axis the alphabet runs along.
/// * `dummy_axis`: if set, a size-1 axis is inserted here before the alphabet axis is
///   moved.
///
/// [`EncodedSequenceDataset`]: crate::datasets::EncodedSequenceDataset
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncodedSequenceConfig {
    #[serde(flatten)]
    pub sequence: StringSequenceConfig,
    pub alphabet: Alphabet,
    pub alphabet_axis: usize,
    pub dummy_axis: Option<usize>,
}

impl Default for EncodedSequenceConfig {
    fn default() -> Self {
        Self {
            sequence: StringSequenceConfig::default(),
            alphabet: Alphabet::Dna,
            alphabet_axis: 1,
            dummy_axis: None,
        }
    }
}

impl EncodedSequenceConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, SeqDataError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(filepath: impl AsRef<Path>) -> Result<Self, SeqDataError> {
        read_toml(filepath)
    }
}
