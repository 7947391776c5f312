//! Operation identifiers, argument values and uniform evaluation

use super::ops::{self, Orientation};
use crate::grid::{Image, MAX_COLOR};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a forward grid operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FilterColor,
    Recolor,
    Orthogonal,
    Origin,
    Identity,
    Compose,
    Compress,
}

/// Kind of value a parameter position holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Image,
    Color,
    Orientation,
}

/// A concrete argument or result of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Image(Image),
    Color(u8),
    Orientation(Orientation),
}

/// Errors from evaluating an operation on concrete arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("{op} takes {expected} argument(s), got {found}")]
    Arity { op: Operation, expected: usize, found: usize },

    #[error("{op} argument {position} must be {expected:?}, got {found:?}")]
    ArgumentType { op: Operation, position: usize, expected: ValueKind, found: ValueKind },

    #[error("color {0} is outside 0..=9")]
    ColorOutOfRange(u8),

    #[error("unsupported orientation mode {0}")]
    UnsupportedOrientation(i32),

    #[error("{op} is undefined on an all-zero image")]
    EmptyImage { op: Operation },
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::FilterColor,
        Operation::Recolor,
        Operation::Orthogonal,
        Operation::Origin,
        Operation::Identity,
        Operation::Compose,
        Operation::Compress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::FilterColor => "FilterColor",
            Operation::Recolor => "Recolor",
            Operation::Orthogonal => "Orthogonal",
            Operation::Origin => "Origin",
            Operation::Identity => "Identity",
            Operation::Compose => "Compose",
            Operation::Compress => "Compress",
        }
    }

    /// Kinds of the parameters, in position order
    pub fn params(self) -> &'static [ValueKind] {
        match self {
            Operation::FilterColor | Operation::Recolor => &[ValueKind::Image, ValueKind::Color],
            Operation::Orthogonal => &[ValueKind::Image, ValueKind::Orientation],
            Operation::Origin | Operation::Identity | Operation::Compress => &[ValueKind::Image],
            Operation::Compose => &[ValueKind::Image, ValueKind::Image],
        }
    }

    pub fn arity(self) -> usize {
        self.params().len()
    }

    /// Evaluate the operation on concrete arguments
    pub fn apply(self, args: &[Value]) -> Result<Value, EvalError> {
        self.check_args(args)?;

        let result = match (self, args) {
            (Operation::FilterColor, [Value::Image(image), Value::Color(color)]) => {
                ops::filter_color(image, *color)
            }
            (Operation::Recolor, [Value::Image(image), Value::Color(color)]) => {
                ops::recolor(image, *color)
            }
            (Operation::Orthogonal, [Value::Image(image), Value::Orientation(mode)]) => {
                ops::orthogonal(image, *mode)
            }
            (Operation::Origin, [Value::Image(image)]) => ops::origin(image),
            (Operation::Identity, [Value::Image(image)]) => ops::identity(image).clone(),
            (Operation::Compose, [Value::Image(a), Value::Image(b)]) => ops::compose(a, b),
            (Operation::Compress, [Value::Image(image)]) => {
                ops::compress(image).ok_or(EvalError::EmptyImage { op: self })?
            }
            // check_args has matched every kind already
            _ => unreachable!("argument kinds verified for {}", self),
        };
        Ok(Value::Image(result))
    }

    fn check_args(self, args: &[Value]) -> Result<(), EvalError> {
        let params = self.params();
        if args.len() != params.len() {
            return Err(EvalError::Arity { op: self, expected: params.len(), found: args.len() });
        }
        for (position, (arg, &expected)) in args.iter().zip(params).enumerate() {
            if arg.kind() != expected {
                return Err(EvalError::ArgumentType { op: self, position, expected, found: arg.kind() });
            }
            if let Value::Color(color) = arg {
                if *color > MAX_COLOR {
                    return Err(EvalError::ColorOutOfRange(*color));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Image(_) => ValueKind::Image,
            Value::Color(_) => ValueKind::Color,
            Value::Orientation(_) => ValueKind::Orientation,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Value::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<u8> {
        match self {
            Value::Color(color) => Some(*color),
            _ => None,
        }
    }

    pub fn as_orientation(&self) -> Option<Orientation> {
        match self {
            Value::Orientation(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Orientation from an integer mode, rejecting unsupported codes
    pub fn orientation_code(code: i32) -> Result<Self, EvalError> {
        Orientation::from_code(code)
            .map(Value::Orientation)
            .ok_or(EvalError::UnsupportedOrientation(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(rows: Vec<Vec<u8>>) -> Value {
        Value::Image(Image::from_rows(rows).unwrap())
    }

    #[test]
    fn test_apply_recolor() {
        let result = Operation::Recolor
            .apply(&[image(vec![vec![0, 5], vec![3, 0]]), Value::Color(2)])
            .unwrap();
        assert_eq!(result, image(vec![vec![0, 2], vec![2, 0]]));
    }

    #[test]
    fn test_apply_checks_arity_and_types() {
        let err = Operation::Compose.apply(&[image(vec![vec![1]])]).unwrap_err();
        assert_eq!(err, EvalError::Arity { op: Operation::Compose, expected: 2, found: 1 });

        let err = Operation::FilterColor
            .apply(&[Value::Color(1), Value::Color(1)])
            .unwrap_err();
        assert!(matches!(err, EvalError::ArgumentType { position: 0, expected: ValueKind::Image, .. }));

        let err = Operation::Recolor
            .apply(&[image(vec![vec![1]]), Value::Color(10)])
            .unwrap_err();
        assert_eq!(err, EvalError::ColorOutOfRange(10));
    }

    #[test]
    fn test_apply_compress_empty() {
        let err = Operation::Compress.apply(&[image(vec![vec![0, 0]])]).unwrap_err();
        assert_eq!(err, EvalError::EmptyImage { op: Operation::Compress });
    }

    #[test]
    fn test_orientation_code() {
        assert_eq!(
            Value::orientation_code(1).unwrap(),
            Value::Orientation(Orientation::MirrorHorizontal)
        );
        assert_eq!(Value::orientation_code(7).unwrap_err(), EvalError::UnsupportedOrientation(7));
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operation::Identity.arity(), 1);
        assert_eq!(Operation::Compose.arity(), 2);
        assert_eq!(Operation::Orthogonal.params()[1], ValueKind::Orientation);
    }
}
