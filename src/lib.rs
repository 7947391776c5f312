//! Inverse semantics for example-based synthesis of grid transformations
//!
//! A top-down search engine proposes an operation and a constraint on its
//! output; the witness procedures in this crate answer which parameter values
//! and which input grids are consistent with that output. Constraints are
//! expressed as partial images whose cells may be wildcards, so no concrete
//! grids are ever enumerated.

pub mod config;
pub mod grid;
pub mod semantics;
pub mod verify;
pub mod witness;

pub use config::Settings;
pub use grid::{Cell, Grid, GridError, Image, PartialImage};
pub use semantics::{Operation, Orientation, Value};
pub use witness::{Registry, Spec, StateId, StateMap, WitnessError, WitnessRequest};

use anyhow::Result;
use verify::{SoundnessChecker, SoundnessReport};

/// Check every enabled witness against the grids described by `settings`
pub fn check_soundness(settings: &Settings) -> Result<SoundnessReport> {
    let checker = SoundnessChecker::from_settings(settings)?;
    Ok(checker.sweep()?)
}
