//! One-hot encoding and the axis transform pipeline.

use ndarray::{Array2, ArrayD, Axis};

use super::alphabet::Alphabet;
use crate::{config::EncodedSequenceConfig, error::SeqDataError};

/// Maps sequence strings to `(length, alphabet size)` one-hot matrices.
///
/// A symbol that is not in the alphabet gets an all-zero row; the encoder never fails
/// on sequence content. Matching is exact, so lower-case bases only match a lower-case
/// alphabet.
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    symbols: Vec<u8>,
    // byte -> basis index
    lookup: [Option<usize>; 256],
}

impl OneHotEncoder {
    pub fn new(alphabet: &Alphabet) -> Result<Self, SeqDataError> {
        let symbols = alphabet.symbols()?;
        let mut lookup = [None; 256];
        for (index, &symbol) in symbols.iter().enumerate() {
            lookup[symbol as usize] = Some(index);
        }
        Ok(Self { symbols, lookup })
    }

    /// The alphabet size.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Encode `sequence`: axis 0 is the sequence position, axis 1 the symbol.
    pub fn encode(&self, sequence: &[u8]) -> Array2<f32> {
        let mut encoded = Array2::zeros((sequence.len(), self.symbols.len()));
        for (position, &base) in sequence.iter().enumerate() {
            if let Some(index) = self.lookup[base as usize] {
                encoded[[position, index]] = 1.0;
            }
        }
        encoded
    }
}

/// One-hot encode `sequence` with `alphabet`; see [`OneHotEncoder::encode()`].
pub fn one_hot(sequence: &str, alphabet: &Alphabet) -> Result<Array2<f32>, SeqDataError> {
    Ok(OneHotEncoder::new(alphabet)?.encode(sequence.as_bytes()))
}

/// One-hot encoding, optional dummy axis insertion, and an alphabet axis swap.
///
/// # Example
///
/// ```
/// use seqdata::prelude::*;
///
/// // (length, 4) -> (length, 4, 1) -> (length, 4, 1)
/// let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 1, Some(2)).unwrap();
/// let tensor = pipeline.apply("ACGTN");
/// assert_eq!(tensor.shape(), &[5, 4, 1]);
/// assert_eq!(pipeline.output_shape(5), vec![5, 4, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct AxisTransformPipeline {
    encoder: OneHotEncoder,
    alphabet_axis: usize,
    dummy_axis: Option<usize>,
}

impl AxisTransformPipeline {
    /// Build a pipeline, checking that both axes exist in the tensors it will produce.
    ///
    /// # Arguments
    /// * `alphabet`: the one-hot alphabet.
    /// * `alphabet_axis`: where the alphabet axis ends up.
    /// * `dummy_axis`: where to insert a size-1 axis, if anywhere.
    pub fn new(
        alphabet: &Alphabet,
        alphabet_axis: usize,
        dummy_axis: Option<usize>,
    ) -> Result<Self, SeqDataError> {
        let encoder = OneHotEncoder::new(alphabet)?;
        if let Some(axis) = dummy_axis {
            // inserted into the 2-axis one-hot matrix
            if axis > 2 {
                return Err(SeqDataError::InvalidAxis { axis, ndim: 2 });
            }
        }
        let ndim = 2 + usize::from(dummy_axis.is_some());
        if alphabet_axis >= ndim {
            return Err(SeqDataError::InvalidAxis {
                axis: alphabet_axis,
                ndim,
            });
        }
        Ok(Self {
            encoder,
            alphabet_axis,
            dummy_axis,
        })
    }

    pub fn from_config(config: &EncodedSequenceConfig) -> Result<Self, SeqDataError> {
        Self::new(&config.alphabet, config.alphabet_axis, config.dummy_axis)
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// The number of axes of the output tensors.
    pub fn ndim(&self) -> usize {
        2 + usize::from(self.dummy_axis.is_some())
    }

    /// Transform `sequence` into a (standard layout) tensor.
    pub fn apply(&self, sequence: &str) -> ArrayD<f32> {
        let mut tensor = self.encoder.encode(sequence.as_bytes()).into_dyn();
        if let Some(axis) = self.dummy_axis {
            tensor = tensor.insert_axis(Axis(axis));
        }
        tensor.swap_axes(1, self.alphabet_axis);
        tensor.as_standard_layout().into_owned()
    }

    /// The shape [`AxisTransformPipeline::apply()`] produces for a sequence of length
    /// `seq_len`.
    pub fn output_shape(&self, seq_len: usize) -> Vec<usize> {
        let mut shape = vec![seq_len, self.encoder.len()];
        if let Some(axis) = self.dummy_axis {
            shape.insert(axis, 1);
        }
        shape.swap(1, self.alphabet_axis);
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    /// Arg-max decode a `(length, alphabet)` matrix; all-zero rows decode to `'?'`.
    fn decode(encoded: &Array2<f32>, symbols: &[u8]) -> String {
        encoded
            .rows()
            .into_iter()
            .map(|row| {
                if row.sum() == 0.0 {
                    return '?';
                }
                let (index, _) = row
                    .iter()
                    .enumerate()
                    .fold((0, f32::MIN), |best, (i, &x)| if x > best.1 { (i, x) } else { best });
                symbols[index] as char
            })
            .collect()
    }

    #[test]
    fn test_one_hot_basic() {
        let encoded = one_hot("ACGT", &Alphabet::Dna).unwrap();
        let expected: Array2<f32> = array![
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ];
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_one_hot_unknown_symbols() {
        let encoded = one_hot("ANa", &Alphabet::Dna).unwrap();
        let sums: Array1<f32> = encoded.sum_axis(Axis(1));
        let expected: Array1<f32> = array![1.0, 0.0, 0.0];
        assert_eq!(sums, expected);
    }

    #[test]
    fn test_one_hot_roundtrip() {
        let sequence = "TTCACTACTATTAGTACTCACGGCGCAATA";
        let encoded = one_hot(sequence, &Alphabet::Dna).unwrap();
        assert_eq!(encoded.shape(), &[30, 4]);
        assert_eq!(decode(&encoded, b"ACGT"), sequence);

        let alphabet: Alphabet = "TGCA".parse().unwrap();
        let encoded = one_hot("GATTACAN", &alphabet).unwrap();
        assert_eq!(decode(&encoded, b"TGCA"), "GATTACA?");
    }

    #[test]
    fn test_empty_sequence() {
        let encoded = one_hot("", &Alphabet::Dna).unwrap();
        assert_eq!(encoded.shape(), &[0, 4]);
    }

    #[test]
    fn test_pipeline_no_dummy() {
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 1, None).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.ndim(), 2);
        assert_eq!(tensor.shape(), &[5, 4]);

        // alphabet first
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 0, None).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.shape(), &[4, 5]);
        assert_eq!(tensor[[2, 2]], 1.0);
        assert_eq!(tensor[[0, 4]], 1.0);
        assert_eq!(tensor[[0, 1]], 0.0);
        assert_eq!(pipeline.output_shape(5), vec![4, 5]);
    }

    #[test]
    fn test_pipeline_dummy_axis() {
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 1, Some(2)).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.ndim(), 3);
        assert_eq!(tensor.shape()[1], 4);
        assert_eq!(tensor.shape(), &[5, 4, 1]);

        // dummy axis first, then alphabet moved to the end:
        // (5, 4) -> (1, 5, 4) -> (1, 4, 5)
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 2, Some(0)).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.shape(), &[1, 4, 5]);
        assert_eq!(pipeline.output_shape(5), vec![1, 4, 5]);

        // (5, 4) -> (1, 5, 4), swap 1 and 1
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 1, Some(0)).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.shape(), &[1, 5, 4]);
        assert_eq!(tensor[[0, 3, 3]], 1.0);

        // (5, 4) -> (5, 1, 4) -> (5, 4, 1)
        let pipeline = AxisTransformPipeline::new(&Alphabet::Dna, 2, Some(1)).unwrap();
        let tensor = pipeline.apply("ACGTA");
        assert_eq!(tensor.shape(), &[5, 4, 1]);
        assert_eq!(tensor[[1, 1, 0]], 1.0);
        assert_eq!(pipeline.output_shape(5), vec![5, 4, 1]);
    }

    #[test]
    fn test_output_shape_matches_apply() {
        for dummy_axis in [None, Some(0), Some(1), Some(2)] {
            let ndim = 2 + usize::from(dummy_axis.is_some());
            for alphabet_axis in 0..ndim {
                let pipeline =
                    AxisTransformPipeline::new(&Alphabet::Rna, alphabet_axis, dummy_axis).unwrap();
                let tensor = pipeline.apply("ACGUU");
                assert_eq!(tensor.shape(), pipeline.output_shape(5).as_slice());
                assert_eq!(tensor.sum(), 5.0);
                assert_eq!(tensor.ndim(), pipeline.ndim());
            }
        }
    }

    #[test]
    fn test_invalid_axes() {
        let err = AxisTransformPipeline::new(&Alphabet::Dna, 2, None).unwrap_err();
        assert!(matches!(err, SeqDataError::InvalidAxis { axis: 2, ndim: 2 }));
        assert!(err.is_configuration_error());
        assert!(AxisTransformPipeline::new(&Alphabet::Dna, 3, Some(2)).is_err());
        assert!(AxisTransformPipeline::new(&Alphabet::Dna, 0, Some(3)).is_err());
    }
}
