//! Inverse (witness) procedures
//!
//! Given a constraint on an operation's output, each witness computes the
//! admissible values of one parameter, per input state. A contradiction in
//! any state fails the whole invocation with [`WitnessError::Unsatisfiable`],
//! which the search engine treats as a pruned branch.

pub mod color;
pub mod error;
pub mod filter;
pub mod identity;
pub mod orthogonal;
pub mod recolor;
pub mod registry;
pub mod spec;

pub use error::{Conflict, WitnessError};
pub use registry::{Registry, RegistryBuilder, RegistryError, WitnessEntry, WitnessFn};
pub use spec::{Spec, StateId, StateMap, WitnessRequest};
