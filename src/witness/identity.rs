//! Inverse procedure for Identity(image)
//!
//! The preimage of identity is the output constraint itself, wildcards
//! included, so outputs handed down by the Recolor and FilterColor preimage
//! witnesses pass through unchanged.

use super::{Spec, StateMap, WitnessError, WitnessRequest};
use crate::grid::PartialImage;

/// Position of the image parameter
pub const IMAGE: usize = 0;

/// Every state's output, unchanged
pub fn witness_image(request: &WitnessRequest) -> StateMap<PartialImage> {
    request.outputs.clone()
}

pub fn image_spec(request: &WitnessRequest) -> Result<Spec, WitnessError> {
    Ok(Spec::Partial(witness_image(request)))
}
