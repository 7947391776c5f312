//! Grid model: concrete images and wildcard-aware partial images

pub mod cell;
#[allow(clippy::module_inception)]
pub mod grid;
pub mod image;

pub use cell::{Cell, ANY_NONZERO_CODE, MAX_COLOR};
pub use grid::{CellValue, Grid, GridError};
pub use image::{Image, PartialImage};
