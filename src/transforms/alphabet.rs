//! One-hot alphabets: named presets or explicit ordered symbol lists.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::SeqDataError;

pub const DNA: &[u8] = b"ACGT";
pub const RNA: &[u8] = b"ACGU";
pub const AMINO_ACIDS: &[u8] = b"ARNDBCEQZGHILKMFPSTWYV";

/// An ordered alphabet. The position of a symbol in the alphabet is the index of its
/// one-hot basis vector, and the alphabet size is the size of the alphabet axis.
///
/// In configuration files an alphabet is either a preset name (`"DNA"`, `"RNA"`,
/// `"AMINO_ACIDS"`), a string of symbols (`"ACGTN"`), or a list of single-character
/// symbols (`["A", "C", "G", "T", "N"]`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "AlphabetInput")]
pub enum Alphabet {
    Dna,
    Rna,
    AminoAcids,
    Explicit(Vec<u8>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AlphabetInput {
    Name(String),
    Symbols(Vec<String>),
}

impl TryFrom<AlphabetInput> for Alphabet {
    type Error = SeqDataError;

    fn try_from(input: AlphabetInput) -> Result<Self, Self::Error> {
        match input {
            AlphabetInput::Name(name) => name.parse(),
            AlphabetInput::Symbols(symbols) => Alphabet::from_symbols(&symbols),
        }
    }
}

impl Alphabet {
    /// Build an explicit alphabet from a list of single-character symbols.
    pub fn from_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Self, SeqDataError> {
        let bytes = symbols
            .iter()
            .map(|symbol| match symbol.as_ref().as_bytes() {
                [byte] if byte.is_ascii_graphic() => Ok(*byte),
                _ => Err(SeqDataError::UnknownAlphabet(symbol.as_ref().to_string())),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        let alphabet = Alphabet::Explicit(bytes);
        alphabet.symbols()?;
        Ok(alphabet)
    }

    /// The ordered symbols of this alphabet.
    ///
    /// Fails with [`SeqDataError::EmptyAlphabet`] or
    /// [`SeqDataError::DuplicateAlphabetSymbol`] for an invalid explicit alphabet.
    pub fn symbols(&self) -> Result<Vec<u8>, SeqDataError> {
        let symbols = match self {
            Alphabet::Dna => DNA,
            Alphabet::Rna => RNA,
            Alphabet::AminoAcids => AMINO_ACIDS,
            Alphabet::Explicit(symbols) => symbols.as_slice(),
        };
        if symbols.is_empty() {
            return Err(SeqDataError::EmptyAlphabet);
        }
        let mut seen = HashSet::new();
        for &symbol in symbols {
            if !seen.insert(symbol) {
                return Err(SeqDataError::DuplicateAlphabetSymbol(symbol as char));
            }
        }
        Ok(symbols.to_vec())
    }
}

impl FromStr for Alphabet {
    type Err = SeqDataError;

    /// Parse a preset name (case-insensitive), or else a string of symbols.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DNA" => return Ok(Alphabet::Dna),
            "RNA" => return Ok(Alphabet::Rna),
            "AMINO_ACIDS" => return Ok(Alphabet::AminoAcids),
            _ => {}
        }
        if !s.bytes().all(|byte| byte.is_ascii_graphic()) {
            return Err(SeqDataError::UnknownAlphabet(s.to_string()));
        }
        let alphabet = Alphabet::Explicit(s.as_bytes().to_vec());
        alphabet.symbols()?;
        Ok(alphabet)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "DNA"),
            Alphabet::Rna => write!(f, "RNA"),
            Alphabet::AminoAcids => write!(f, "AMINO_ACIDS"),
            Alphabet::Explicit(symbols) => write!(f, "{}", String::from_utf8_lossy(symbols)),
        }
    }
}
