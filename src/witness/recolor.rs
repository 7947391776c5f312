//! Inverse procedures for Recolor(image, color)

use super::{Conflict, Spec, StateId, StateMap, WitnessError, WitnessRequest};
use crate::grid::{Cell, PartialImage};

pub use super::color::color_spec;

/// Position of the image parameter
pub const IMAGE: usize = 0;
/// Position of the color parameter
pub const COLOR: usize = 1;

/// Constraint on the input image given the output and the recolor color
///
/// Zero stays zero; any cell recolor could have painted only needed to be nonzero.
pub fn preimage(state: StateId, output: &PartialImage, color: u8) -> Result<PartialImage, WitnessError> {
    output.try_map(|row, col, cell| match cell {
        Cell::Exact(0) => Ok(Cell::Exact(0)),
        Cell::Exact(value) if value == color => Ok(Cell::AnyNonzero),
        Cell::AnyNonzero => Ok(Cell::AnyNonzero),
        Cell::Exact(found) => Err(WitnessError::unsat(
            state,
            Conflict::UnexpectedColor { row, col, found, expected: color },
        )),
        Cell::AnyExcept(k) if k == color => Err(WitnessError::unsat(
            state,
            Conflict::ExcludedColor { row, col, color },
        )),
        Cell::AnyExcept(_) => Ok(Cell::AnyNonzero),
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
