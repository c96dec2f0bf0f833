//! Test cases and test utility functions.
//!

use flate2::write::GzEncoder;
use flate2::Compression;
use rand::{thread_rng, Rng};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

use crate::{ranges::Interval, Position};

// Stochastic test ranges defaults
//
// range length
pub const MIN_LEN: Position = 1;
pub const MAX_LEN: Position = 10000;

// number of chromosome sequences
pub const NCHROM: usize = 22;

// chromosome sizes
pub const MIN_CHROM_LEN: Position = 50_000_000;
pub const MAX_CHROM_LEN: Position = 250_000_000;

/// A small two-sequence reference genome, in FASTA format.
pub const TEST_FASTA: &str = "\
>chr1
TTCACTACTATTAGTACTCACGGCGCAATA
>chr2
acgtNNacgtACGTACGTAC
";

/// Build a random range start/end on a sequence of `max_len`.
/// 0-indexed, right exclusive
pub fn random_range(chrom_len: Position) -> (Position, Position) {
    let mut rng = thread_rng();
    let len = rng.gen_range(MIN_LEN..MAX_LEN);
    let start = rng.gen_range(0..chrom_len - len + 1);
    (start, start + len)
}

/// Build random sequence lengths
pub fn random_seqlen() -> Position {
    let mut rng = thread_rng();
    rng.gen_range(MIN_CHROM_LEN..=MAX_CHROM_LEN)
}

/// Sample a random chromosome
pub fn random_chrom() -> String {
    let mut rng = thread_rng();
    format!("chr{}", rng.gen_range(1..NCHROM + 1))
}

/// Build a random [`Interval`] on a random chromosome.
pub fn random_interval() -> Interval {
    let (start, stop) = random_range(random_seqlen());
    Interval::new(random_chrom(), start, stop)
}

/// Write `contents` to a new temporary file.
pub fn temp_file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("could not create temporary file");
    file.write_all(contents.as_bytes())
        .expect("could not write temporary file");
    file.flush().expect("could not flush temporary file");
    file
}

/// Write `contents` gzip-compressed to a new temporary `.gz` file.
pub fn temp_gz_file_with(contents: &str) -> NamedTempFile {
    let file = Builder::new()
        .suffix(".gz")
        .tempfile()
        .expect("could not create temporary file");
    let mut encoder = GzEncoder::new(
        file.reopen().expect("could not reopen temporary file"),
        Compression::default(),
    );
    encoder
        .write_all(contents.as_bytes())
        .expect("could not write temporary file");
    encoder.finish().expect("could not finish gzip stream");
    file
}

/// Write [`TEST_FASTA`] to a new temporary `.fa` file, along with its `.fai` index.
pub fn temp_indexed_fasta() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("could not create temporary directory");
    std::fs::write(dir.path().join("ref.fa"), TEST_FASTA).expect("could not write FASTA");
    // name, length, offset, line bases, line width
    let index = "chr1\t30\t6\t30\t31\nchr2\t20\t43\t20\t21\n";
    std::fs::write(dir.path().join("ref.fa.fai"), index).expect("could not write index");
    dir
}
