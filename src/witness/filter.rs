//! Inverse procedures for FilterColor(image, color)

use super::{Conflict, Spec, StateId, StateMap, WitnessError, WitnessRequest};
use crate::grid::{Cell, PartialImage};
use crate::semantics::Operation;

pub use super::color::color_spec;

/// Position of the image parameter
pub const IMAGE: usize = 0;
/// Position of the color parameter
pub const COLOR: usize = 1;

/// Constraint on the input image given the output and the filtered color
///
/// A kept cell must have held `color`; a cleared cell held anything else,
/// zero included.
pub fn preimage(state: StateId, output: &PartialImage, color: u8) -> Result<PartialImage, WitnessError> {
    output.try_map(|row, col, cell| match cell {
        Cell::Exact(0) => Ok(Cell::AnyExcept(color)),
        Cell::Exact(value) if value == color => Ok(Cell::Exact(color)),
        Cell::AnyNonzero => Ok(Cell::Exact(color)),
        Cell::Exact(found) => Err(WitnessError::unsat(
            state,
            Conflict::UnexpectedColor { row, col, found, expected: color },
        )),
        Cell::AnyExcept(k) if k == color => Ok(Cell::AnyExcept(color)),
        Cell::AnyExcept(k) => Err(WitnessError::Unsupported {
            op: Operation::FilterColor,
            detail: format!("cell ({}, {}) excluding {} while filtering {}", row, col, k, color),
        }),
    })
}

/// Preimage constraint for every state, using the resolved color of each state
pub fn witness_image(request: &WitnessRequest) -> Result<StateMap<PartialImage>, WitnessError> {
    let mut result = StateMap::new();
    for (&state, output) in &request.outputs {
        let color = request.color(COLOR, state)?;
        result.insert(state, preimage(state, output, color)?);
    }
    Ok(result)
}

pub fn image_spec(request: &WitnessRequest) -> Result<Spec, WitnessError> {
    witness_image(request).map(Spec::Partial)
}
