//! Forward semantics of the grid operations

pub mod operation;
pub mod ops;

pub use operation::{EvalError, Operation, Value, ValueKind};
pub use ops::{compose, compress, filter_color, identity, orthogonal, orthogonal_code, origin, recolor, Orientation};
