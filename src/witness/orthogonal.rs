//! Inverse procedure for the mode of Orthogonal(image, mode)
//!
//! The input image is resolved by the engine before the mode is inferred, so
//! this witness declares a dependency on the image parameter. Outputs may be
//! partial: a mode is admissible when the output constraint accepts the
//! oriented input cell-for-cell. Offsets are ignored because the forward
//! operation always places its result at the origin.

use super::{Conflict, Spec, StateId, StateMap, WitnessError, WitnessRequest};
use crate::grid::{Image, PartialImage};
use crate::semantics::{orthogonal, Orientation, Value};

/// Position of the image parameter
pub const IMAGE: usize = 0;
/// Position of the mode parameter
pub const MODE: usize = 1;

/// Orientations that map `input` onto `output`
pub fn admissible_modes(state: StateId, input: &Image, output: &PartialImage) -> Result<Vec<Orientation>, WitnessError> {
    let (width, height) = input.dims();

    let modes: Vec<Orientation> = if output.dims() == (width, height) {
        let mut candidates = vec![Orientation::MirrorVertical, Orientation::MirrorHorizontal];
        if width == height {
            candidates.push(Orientation::Rotate90);
        }
        candidates
            .into_iter()
            .filter(|&mode| consistent(input, output, mode))
            .collect()
    } else if output.dims() == (height, width) {
        // Only a quarter turn swaps the dimensions
        let rotated = orthogonal(input, Orientation::Rotate90);
        if output.accepts_cells(&rotated) {
            vec![Orientation::Rotate90]
        } else {
            Vec::new()
        }
    } else {
        Vec::new()
    };

    if modes.is_empty() {
        return Err(WitnessError::unsat(
            state,
            Conflict::NoOrientation { input: input.dims(), output: output.dims() },
        ));
    }
    Ok(modes)
}

/// Same-shape check without building the oriented image
fn consistent(input: &Image, output: &PartialImage, mode: Orientation) -> bool {
    let (width, height) = input.dims();
    output.positions().all(|(row, col)| {
        let (src_row, src_col) = mode.source(row, col, width, height);
        output.cell(row, col).accepts(input.cell(src_row, src_col))
    })
}

/// Admissible modes for every state
pub fn witness_modes(request: &WitnessRequest) -> Result<StateMap<Vec<Orientation>>, WitnessError> {
    let mut result = StateMap::new();
    for (&state, output) in &request.outputs {
        let input = request.image(IMAGE, state)?;
        result.insert(state, admissible_modes(state, input, output)?);
    }
    Ok(result)
}

pub fn mode_spec(request: &WitnessRequest) -> Result<Spec, WitnessError> {
    let modes = witness_modes(request)?;
    Ok(Spec::Disjunctive(
        modes
            .into_iter()
            .map(|(state, modes)| (state, modes.into_iter().map(Value::Orientation).collect()))
            .collect(),
    ))
}
