//! Per-cell constraints for partial images

use super::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest color a concrete cell may hold
pub const MAX_COLOR: u8 = 9;

/// Legacy integer code for "any nonzero color"
pub const ANY_NONZERO_CODE: i32 = 10;

/// Constraint on a single cell of a partial image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Cell {
    /// The cell must hold exactly this value (0 is background)
    Exact(u8),
    /// Any color in 1..=9
    AnyNonzero,
    /// Any value other than this color; zero is not excluded
    AnyExcept(u8),
}

impl Cell {
    /// Decode a legacy integer code (0..=9 exact, 10 any nonzero, -k not k)
    pub fn from_code(code: i32) -> Result<Self, GridError> {
        match code {
            0..=9 => Ok(Cell::Exact(code as u8)),
            ANY_NONZERO_CODE => Ok(Cell::AnyNonzero),
            -9..=-1 => Ok(Cell::AnyExcept((-code) as u8)),
            _ => Err(GridError::InvalidCode(code)),
        }
    }

    /// Encode as the legacy integer code
    pub fn code(self) -> i32 {
        match self {
            Cell::Exact(v) => v as i32,
            Cell::AnyNonzero => ANY_NONZERO_CODE,
            Cell::AnyExcept(k) => -(k as i32),
        }
    }

    /// Check whether a concrete cell value satisfies this constraint
    pub fn accepts(self, value: u8) -> bool {
        match self {
            Cell::Exact(v) => v == value,
            Cell::AnyNonzero => (1..=MAX_COLOR).contains(&value),
            Cell::AnyExcept(k) => value <= MAX_COLOR && value != k,
        }
    }

    /// The exact value, if this constraint pins one
    pub fn exact(self) -> Option<u8> {
        match self {
            Cell::Exact(v) => Some(v),
            _ => None,
        }
    }

    /// True for any constraint that can never be satisfied by 0
    pub fn is_nonzero(self) -> bool {
        match self {
            Cell::Exact(v) => v != 0,
            Cell::AnyNonzero => true,
            Cell::AnyExcept(_) => false,
        }
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Cell::Exact(value)
    }
}

impl TryFrom<i32> for Cell {
    type Error = GridError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Cell::from_code(code)
    }
}

impl From<Cell> for i32 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Exact(v) => write!(f, "{}", v),
            Cell::AnyNonzero => write!(f, "*"),
            Cell::AnyExcept(k) => write!(f, "!{}", k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_decoding() {
        assert_eq!(Cell::from_code(0).unwrap(), Cell::Exact(0));
        assert_eq!(Cell::from_code(7).unwrap(), Cell::Exact(7));
        assert_eq!(Cell::from_code(10).unwrap(), Cell::AnyNonzero);
        assert_eq!(Cell::from_code(-3).unwrap(), Cell::AnyExcept(3));

        assert!(Cell::from_code(11).is_err());
        assert!(Cell::from_code(-10).is_err());
    }

    #[test]
    fn test_accepts() {
        assert!(Cell::Exact(0).accepts(0));
        assert!(!Cell::Exact(0).accepts(4));

        assert!((1..=9).all(|v| Cell::AnyNonzero.accepts(v)));
        assert!(!Cell::AnyNonzero.accepts(0));

        // "not 5" leaves zero and every other color
        assert!(Cell::AnyExcept(5).accepts(0));
        assert!(Cell::AnyExcept(5).accepts(4));
        assert!(!Cell::AnyExcept(5).accepts(5));
        assert!(!Cell::AnyExcept(5).accepts(10));
    }

    #[test]
    fn test_serde_uses_legacy_codes() {
        let cells = vec![Cell::Exact(2), Cell::AnyNonzero, Cell::AnyExcept(6)];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, "[2,10,-6]");

        let bad: Result<Vec<Cell>, _> = serde_json::from_str("[2,12]");
        assert!(bad.is_err());
    }
}
