//! Concrete images and partial (constraint) images

use super::{Cell, Grid, GridError, ANY_NONZERO_CODE, MAX_COLOR};

/// Concrete grid: every cell is 0 (background) or a color in 1..=9
pub type Image = Grid<u8>;

/// Constraint grid: every cell is a [`Cell`] describing admissible values
pub type PartialImage = Grid<Cell>;

impl Grid<u8> {
    /// All-zero image
    pub fn blank(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self::from_fn(x, y, width, height, |_, _| 0)
    }

    /// Build a ground-truth image from integer codes
    ///
    /// Wildcard codes (10 and negatives) are malformed here and rejected.
    pub fn from_codes(x: i32, y: i32, width: usize, height: usize, codes: &[i32]) -> Result<Self, GridError> {
        let cells = codes
            .iter()
            .enumerate()
            .map(|(index, &code)| match code {
                0..=9 => Ok(code as u8),
                c if c == ANY_NONZERO_CODE || (-(MAX_COLOR as i32)..0).contains(&c) => {
                    Err(GridError::WildcardInConcrete { index, code })
                }
                _ => Err(GridError::InvalidCode(code)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(x, y, width, height, cells)
    }

    /// Whether every cell is background
    pub fn is_empty(&self) -> bool {
        self.cells().iter().all(|&cell| cell == 0)
    }

    /// Number of colored cells
    pub fn nonzero_count(&self) -> usize {
        self.cells().iter().filter(|&&cell| cell != 0).count()
    }

    /// Exact constraint matching only this image
    pub fn to_partial(&self) -> PartialImage {
        self.map(Cell::Exact)
    }
}

impl From<&Image> for PartialImage {
    fn from(image: &Image) -> Self {
        image.to_partial()
    }
}

impl Grid<Cell> {
    /// Build a constraint grid from legacy integer codes
    pub fn from_codes(x: i32, y: i32, width: usize, height: usize, codes: &[i32]) -> Result<Self, GridError> {
        let cells = codes
            .iter()
            .map(|&code| Cell::from_code(code))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(x, y, width, height, cells)
    }

    /// Legacy integer codes in row-major order
    pub fn codes(&self) -> Vec<i32> {
        self.cells().iter().map(|cell| cell.code()).collect()
    }

    /// The single concrete image this constraint describes, if it has no wildcards
    pub fn to_concrete(&self) -> Option<Image> {
        let cells = self.cells().iter().map(|cell| cell.exact()).collect::<Option<Vec<_>>>()?;
        Image::new(self.x(), self.y(), self.width(), self.height(), cells).ok()
    }

    /// Whether `image` matches this constraint, offset included
    pub fn accepts(&self, image: &Image) -> bool {
        self.x() == image.x() && self.y() == image.y() && self.accepts_cells(image)
    }

    /// Whether `image` matches this constraint cell-for-cell, ignoring offsets
    pub fn accepts_cells(&self, image: &Image) -> bool {
        self.same_shape(image)
            && self
                .cells()
                .iter()
                .zip(image.cells())
                .all(|(constraint, &value)| constraint.accepts(value))
    }
}
