//! Range Operations.
//!
//! - [`resize_interval()`]: resize a range to a fixed width around an [`Anchor`].

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::{
    error::SeqDataError,
    ranges::try_range,
    traits::AdjustableGenericRange,
    Position, PositionOffset,
};

/// The fixed point preserved when a range is resized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Anchor {
    /// Keep the start position; the end moves.
    Start,
    /// Keep the end position; the start moves.
    End,
    /// Keep the midpoint (to within half a basepair).
    Center,
}

impl FromStr for Anchor {
    type Err = SeqDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Anchor::Start),
            "end" => Ok(Anchor::End),
            "center" => Ok(Anchor::Center),
            _ => Err(SeqDataError::UnknownAnchor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Anchor {
    type Error = SeqDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Anchor::Start => "start",
            Anchor::End => "end",
            Anchor::Center => "center",
        };
        write!(f, "{}", name)
    }
}

/// Resize a range so that its width is exactly `width`, keeping `anchor` fixed.
///
/// - [`Anchor::Start`]: `end = start + width`.
/// - [`Anchor::End`]: `start = end - width`.
/// - [`Anchor::Center`]: `start = floor(midpoint - width / 2)` and `end = start + width`,
///   so on odd remainders the new range leans towards the lower coordinate.
///
/// A range that already has the requested width is returned unchanged. Returns
/// [`SeqDataError::InvalidGenomicRange`] if the resized range would start before 0.
pub fn resize_interval<R: AdjustableGenericRange>(
    range: &R,
    anchor: Anchor,
    width: Position,
) -> Result<R, SeqDataError> {
    if range.width() == width {
        return Ok(range.clone());
    }

    let start = PositionOffset::from(range.start());
    let end = PositionOffset::from(range.end());
    let width = PositionOffset::from(width);

    let new_start = match anchor {
        Anchor::Start => start,
        Anchor::End => end - width,
        // floor((start + end) / 2 - width / 2) without going through floats
        Anchor::Center => (start + end - width).div_euclid(2),
    };
    let (new_start, new_end) = try_range(new_start, new_start + width)?;

    let mut resized = range.clone();
    resized.set_start(new_start);
    resized.set_end(new_end);
    Ok(resized)
}
