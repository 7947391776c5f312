//! Witness outcomes other than success

use super::StateId;
use crate::semantics::{Operation, ValueKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an output constraint cannot be produced by an operation
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    #[error("output has no nonzero cell to read a color from")]
    NoColorSignal,

    #[error("output holds two distinct colors {first} and {second}")]
    ConflictingColors { first: u8, second: u8 },

    #[error("output excludes every color")]
    ExhaustedColors,

    #[error("cell ({row}, {col}) excludes color {color}, the only nonzero value the operation produces")]
    ExcludedColor { row: usize, col: usize, color: u8 },

    #[error("cell ({row}, {col}) requires {found}, but the operation only produces {expected}")]
    UnexpectedColor { row: usize, col: usize, found: u8, expected: u8 },

    #[error("no orientation maps the {input:?} input onto the {output:?} output")]
    NoOrientation { input: (usize, usize), output: (usize, usize) },
}

/// Failure of a witness invocation
///
/// `Unsatisfiable` and `Unsupported` prune the candidate branch; the other
/// variants are caller contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WitnessError {
    #[error("unsatisfiable in {state}: {conflict}")]
    Unsatisfiable { state: StateId, conflict: Conflict },

    #[error("{op} cannot invert {detail}")]
    Unsupported { op: Operation, detail: String },

    #[error("parameter {param} is not resolved for {state}")]
    MissingDependency { param: usize, state: StateId },

    #[error("parameter {param} for {state} must be {expected:?}, got {found:?}")]
    DependencyType { param: usize, state: StateId, expected: ValueKind, found: ValueKind },

    #[error("parameter {param} for {state} holds color {color}, expected 1..=9")]
    InvalidColor { param: usize, state: StateId, color: u8 },
}

impl WitnessError {
    pub(crate) fn unsat(state: StateId, conflict: Conflict) -> Self {
        WitnessError::Unsatisfiable { state, conflict }
    }

    /// Whether the engine should treat this as a pruned branch
    pub fn prunes(&self) -> bool {
        matches!(self, WitnessError::Unsatisfiable { .. } | WitnessError::Unsupported { .. })
    }

    /// The structured diagnostic of an unsatisfiable result
    pub fn conflict(&self) -> Option<&Conflict> {
        match self {
            WitnessError::Unsatisfiable { conflict, .. } => Some(conflict),
            _ => None,
        }
    }
}
