//! Numeric transforms of sequence strings.
//!
//! A sequence string goes through, in this order:
//!
//!  1. [`OneHotEncoder`]: a `(length, alphabet size)` matrix with one basis vector per
//!     position.
//!  2. An optional size-1 "dummy" axis, inserted at `dummy_axis`.
//!  3. A swap of axis 1 (the alphabet axis at this point) with `alphabet_axis`.
//!
//! [`AxisTransformPipeline`] runs all three. Since the dummy axis is inserted *before*
//! the swap, `alphabet_axis` always indexes into the final (possibly 3-axis) tensor.

pub mod alphabet;
pub mod onehot;

pub use alphabet::Alphabet;
pub use onehot::{one_hot, AxisTransformPipeline, OneHotEncoder};
