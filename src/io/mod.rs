//! Types and methods for reading and parsing input and writing output.

pub mod file;
pub mod tsv;

pub use file::{InputFile, OutputFile};
pub use tsv::{build_tsv_reader, BED_TSV};
