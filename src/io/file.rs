//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Check if a file is a gzipped by looking for the magic numbers
pub fn is_gzipped_file(file_path: impl AsRef<Path>) -> io::Result<bool> {
    let mut file = File::open(file_path)?;
    let mut buffer = [0; 2];
    // files shorter than the magic number are not gzipped
    match file.read_exact(&mut buffer) {
        Ok(()) => Ok(buffer == [0x1f, 0x8b]),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

/// Represents an input file.
///
/// This abstracts how data is read in, allowing for both plaintext and gzip-compressed input
/// to be read through a common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - The path to the file. Gzip-compressed files are detected by their
    ///   magic number and uncompressed automatically.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a buffered reader, decompressing gzip input.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let file = File::open(&self.filepath)?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This abstracts writing both plaintext and gzip-compressed files, or standard output.
pub struct OutputFile {
    destination: OutputDestination,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - The path of the file to write. If the file extension is
    ///   `.gz`, `OutputFile` will automatically write gzip-compressed output.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout() -> Self {
        Self {
            destination: OutputDestination::Stdout,
        }
    }

    /// Opens the file and returns a writer.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => {
                let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
                if is_gzip {
                    Box::new(BufWriter::new(GzEncoder::new(
                        File::create(path)?,
                        Compression::default(),
                    )))
                } else {
                    Box::new(BufWriter::new(File::create(path)?))
                }
            }
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_gzip_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv.gz");
        {
            let output = OutputFile::new(&path);
            let mut writer = output.writer().unwrap();
            writeln!(writer, "chr1\t1\t2").unwrap();
        }
        assert!(is_gzipped_file(&path).unwrap());
        let lines: Vec<String> = InputFile::new(&path)
            .reader()
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["chr1\t1\t2"]);
    }

    #[test]
    fn test_short_file_not_gzipped() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(!is_gzipped_file(file.path()).unwrap());
    }
}
