//! Task label values and their data types.
//!
//! Label columns are parsed into [`Scalar`] values according to a [`LabelDtype`] chosen
//! when the table is built. [`LabelDtype::Inferred`] leaves each column with whatever
//! type fits all of its values.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    error::SeqDataError,
    io::tsv::{record_line, TsvConfig},
    traits::TsvSerialize,
};

/// A single table value: a task label, or one of the optional BED columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A missing value (`'.'` in an optional BED column).
    Missing,
}

impl Scalar {
    /// Parse a string into the narrowest [`Scalar`] that represents it: integer, then
    /// float, then boolean, then string.
    pub fn infer(value: &str) -> Self {
        if let Ok(x) = value.parse::<i64>() {
            Scalar::Int(x)
        } else if let Ok(x) = value.parse::<f64>() {
            Scalar::Float(x)
        } else if let Some(x) = parse_bool_word(value) {
            Scalar::Bool(x)
        } else {
            Scalar::Str(value.to_string())
        }
    }

    /// The numeric value of this scalar, if it has one. Booleans are 0 or 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Bool(x) => Some(if *x { 1.0 } else { 0.0 }),
            Scalar::Int(x) => Some(*x as f64),
            Scalar::Float(x) => Some(*x),
            Scalar::Str(_) | Scalar::Missing => None,
        }
    }

    /// The integer value of this scalar, if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Value equality across numeric types: `Int(1)`, `Float(1.0)` and `Bool(true)` all
    /// match each other. Strings only match identical strings.
    pub fn matches(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Missing, Scalar::Missing) => true,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Bool(x) => write!(f, "{}", x),
            Scalar::Int(x) => write!(f, "{}", x),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(x) => write!(f, "{}", x),
            Scalar::Missing => write!(f, "."),
        }
    }
}

impl TsvSerialize for Scalar {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        match self {
            Scalar::Missing => config.no_value_string.to_string(),
            other => other.to_string(),
        }
    }
}

impl TsvSerialize for Vec<Scalar> {
    fn to_tsv(&self, config: &TsvConfig) -> String {
        self.iter()
            .map(|x| x.to_tsv(config))
            .collect::<Vec<_>>()
            .join("\t")
    }
}

fn parse_bool_word(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// The data type task label columns are cast to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LabelDtype {
    String,
    Int,
    Float,
    Bool,
    /// No cast: each column keeps the narrowest type that fits all its values.
    #[default]
    Inferred,
}

impl FromStr for LabelDtype {
    type Err = SeqDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(LabelDtype::String),
            "int" => Ok(LabelDtype::Int),
            "float" => Ok(LabelDtype::Float),
            "bool" => Ok(LabelDtype::Bool),
            "none" => Ok(LabelDtype::Inferred),
            _ => Err(SeqDataError::UnknownLabelDtype(s.to_string())),
        }
    }
}

impl TryFrom<String> for LabelDtype {
    type Error = SeqDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl LabelDtype {
    /// Parse one label column entry of `record` into a [`Scalar`] of this type.
    ///
    /// [`LabelDtype::Inferred`] values are kept as strings here; use [`infer_column()`]
    /// once the whole column has been read.
    pub fn parse(&self, value: &str, record: &StringRecord) -> Result<Scalar, SeqDataError> {
        let invalid = |expected: &str| SeqDataError::InvalidColumnType {
            expected_type: expected.to_string(),
            found_value: value.to_string(),
            line: record_line(record),
        };
        match self {
            LabelDtype::String | LabelDtype::Inferred => Ok(Scalar::Str(value.to_string())),
            LabelDtype::Int => value
                .parse::<i64>()
                .map(Scalar::Int)
                .map_err(|_| invalid("int")),
            LabelDtype::Float => value
                .parse::<f64>()
                .map(Scalar::Float)
                .map_err(|_| invalid("float")),
            LabelDtype::Bool => match value {
                "1" => Ok(Scalar::Bool(true)),
                "0" => Ok(Scalar::Bool(false)),
                _ => parse_bool_word(value)
                    .map(Scalar::Bool)
                    .ok_or_else(|| invalid("bool")),
            },
        }
    }

    /// Parse a user-supplied value (e.g. an ambiguous-label mask) the way a label of this
    /// type would be parsed.
    pub fn parse_value(&self, value: &str) -> Result<Scalar, SeqDataError> {
        match self {
            LabelDtype::Inferred => Ok(Scalar::infer(value)),
            _ => self.parse(value, &StringRecord::from(vec![value])),
        }
    }

    /// Cast an already-typed value (e.g. an ambiguous-label mask read from a config
    /// file) to this type, through its text form.
    pub fn coerce(&self, value: &Scalar) -> Result<Scalar, SeqDataError> {
        self.parse_value(&value.to_string())
    }
}

/// Give a column of raw strings the narrowest type that fits every value: all integers,
/// then all floats, then all booleans, and strings otherwise.
pub fn infer_column(values: Vec<String>) -> Vec<Scalar> {
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        values
            .iter()
            .filter_map(|v| v.parse().ok())
            .map(Scalar::Int)
            .collect()
    } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
        values
            .iter()
            .filter_map(|v| v.parse().ok())
            .map(Scalar::Float)
            .collect()
    } else if values.iter().all(|v| parse_bool_word(v).is_some()) {
        values
            .iter()
            .filter_map(|v| parse_bool_word(v))
            .map(Scalar::Bool)
            .collect()
    } else {
        values.into_iter().map(Scalar::Str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_names() {
        assert_eq!("int".parse::<LabelDtype>().unwrap(), LabelDtype::Int);
        assert_eq!("string".parse::<LabelDtype>().unwrap(), LabelDtype::String);
        assert_eq!("none".parse::<LabelDtype>().unwrap(), LabelDtype::Inferred);
        let err = "int64".parse::<LabelDtype>().unwrap_err();
        assert!(matches!(err, SeqDataError::UnknownLabelDtype(_)));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_parse_typed() {
        assert_eq!(LabelDtype::Int.parse_value("3").unwrap(), Scalar::Int(3));
        assert_eq!(
            LabelDtype::Float.parse_value("3").unwrap(),
            Scalar::Float(3.0)
        );
        assert_eq!(
            LabelDtype::Bool.parse_value("1").unwrap(),
            Scalar::Bool(true)
        );
        assert_eq!(
            LabelDtype::Bool.parse_value("False").unwrap(),
            Scalar::Bool(false)
        );
        assert_eq!(
            LabelDtype::String.parse_value("1").unwrap(),
            Scalar::Str("1".to_string())
        );
        let record = StringRecord::from(vec!["chr1", "1", "2", "0.5"]);
        assert!(matches!(
            LabelDtype::Int.parse(&record[3], &record),
            Err(SeqDataError::InvalidColumnType { line, .. }) if line == "chr1\t1\t2\t0.5"
        ));
    }

    #[test]
    fn test_infer_column() {
        let ints = infer_column(vec!["1".into(), "-1".into()]);
        assert_eq!(ints, vec![Scalar::Int(1), Scalar::Int(-1)]);
        let floats = infer_column(vec!["1".into(), "0.5".into()]);
        assert_eq!(floats, vec![Scalar::Float(1.0), Scalar::Float(0.5)]);
        let bools = infer_column(vec!["True".into(), "false".into()]);
        assert_eq!(bools, vec![Scalar::Bool(true), Scalar::Bool(false)]);
        let strings = infer_column(vec!["1".into(), "b".into()]);
        assert_eq!(
            strings,
            vec![Scalar::Str("1".to_string()), Scalar::Str("b".to_string())]
        );
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            LabelDtype::String.coerce(&Scalar::Int(-1)).unwrap(),
            Scalar::Str("-1".to_string())
        );
        assert_eq!(
            LabelDtype::Int.coerce(&Scalar::Float(-1.0)).unwrap(),
            Scalar::Int(-1)
        );
        assert_eq!(
            LabelDtype::Inferred.coerce(&Scalar::Str("0".to_string())).unwrap(),
            Scalar::Int(0)
        );
        assert!(matches!(
            LabelDtype::Int.coerce(&Scalar::Float(0.5)),
            Err(SeqDataError::InvalidColumnType { .. })
        ));
    }

    #[test]
    fn test_matches() {
        assert!(Scalar::Int(-1).matches(&Scalar::Float(-1.0)));
        assert!(Scalar::Bool(true).matches(&Scalar::Int(1)));
        assert!(!Scalar::Int(0).matches(&Scalar::Int(1)));
        assert!(!Scalar::Str("1".to_string()).matches(&Scalar::Int(1)));
        assert!(Scalar::Str("NA".to_string()).matches(&Scalar::Str("NA".to_string())));
    }
}
