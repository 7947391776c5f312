//! Offset grid representation shared by concrete and partial images

use super::{Cell, MAX_COLOR};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when building a grid from caller-supplied data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("{width}x{height} grid does not fit {len} cells")]
    DimensionMismatch { width: usize, height: usize, len: usize },

    #[error("grid must have at least one row and one column")]
    Empty,

    #[error("row {row} has length {len}, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("wildcard code {code} at index {index} in a concrete grid")]
    WildcardInConcrete { index: usize, code: i32 },

    #[error("cell value {value} at index {index} is not a color in 0..=9")]
    ValueOutOfRange { index: usize, value: u8 },

    #[error("invalid cell code {0}")]
    InvalidCode(i32),
}

/// Cell types a grid may hold, with their domain check
pub trait CellValue: Copy + PartialEq {
    /// Whether the value belongs to the cell domain
    fn is_valid(&self) -> bool;

    /// Error describing this value at `index` when it is out of domain
    fn domain_error(&self, index: usize) -> GridError;
}

impl CellValue for u8 {
    fn is_valid(&self) -> bool {
        *self <= MAX_COLOR
    }

    fn domain_error(&self, index: usize) -> GridError {
        GridError::ValueOutOfRange { index, value: *self }
    }
}

impl CellValue for Cell {
    fn is_valid(&self) -> bool {
        match *self {
            Cell::Exact(v) => v <= MAX_COLOR,
            Cell::AnyNonzero => true,
            Cell::AnyExcept(k) => (1..=MAX_COLOR).contains(&k),
        }
    }

    fn domain_error(&self, _index: usize) -> GridError {
        GridError::InvalidCode(self.code())
    }
}

/// Immutable rectangular grid placed at an offset
///
/// Cells are stored row-major; every access goes through [`Grid::index`].
/// Two grids are equal when offset, dimensions and cells all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grid<T> {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    cells: Vec<T>,
}

#[derive(Deserialize)]
struct GridData<T> {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: CellValue> Grid<T> {
    /// Create a grid at an offset, validating the cell count and domain
    pub fn new(x: i32, y: i32, width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        if width.checked_mul(height) != Some(cells.len()) {
            return Err(GridError::DimensionMismatch { width, height, len: cells.len() });
        }
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if let Some((index, cell)) = cells.iter().enumerate().find(|(_, cell)| !cell.is_valid()) {
            return Err(cell.domain_error(index));
        }
        Ok(Self { x, y, width, height, cells })
    }

    /// Create a grid at the origin from a 2D array
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);

        // Verify all rows have the same length
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(GridError::RaggedRow { row, len: cells.len(), expected: width });
            }
        }

        Self::new(0, 0, width, height, rows.into_iter().flatten().collect())
    }
}

impl<T: Copy> Grid<T> {
    /// Build a grid from a per-position function; callers guarantee valid cells
    pub(crate) fn from_fn<F>(x: i32, y: i32, width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let cells = (0..height)
            .cartesian_product(0..width)
            .map(|(row, col)| f(row, col))
            .collect();
        Self { x, y, width, height, cells }
    }

    /// Cell-wise fallible map preserving offset and shape
    pub(crate) fn try_map<U, E, F>(&self, mut f: F) -> Result<Grid<U>, E>
    where
        F: FnMut(usize, usize, T) -> Result<U, E>,
    {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (row, col) in self.positions() {
            cells.push(f(row, col, self.cell(row, col))?);
        }
        Ok(Grid { x: self.x, y: self.y, width: self.width, height: self.height, cells })
    }

    /// Cell-wise map preserving offset and shape
    pub(crate) fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(T) -> U,
    {
        Grid {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|&cell| f(cell)).collect(),
        }
    }

    /// Horizontal offset of the top-left cell
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Vertical offset of the top-left cell
    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major cell storage
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Convert 2D coordinates to the row-major index
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Cell at local coordinates, panicking when out of bounds
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> T {
        assert!(row < self.height && col < self.width, "({}, {}) outside {}x{} grid", row, col, self.width, self.height);
        self.cells[self.index(row, col)]
    }

    /// Cell at local coordinates
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.height && col < self.width {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    /// Cell at absolute coordinates
    pub fn get_abs(&self, x: i32, y: i32) -> Option<T> {
        self.to_local(x, y).map(|(row, col)| self.cell(row, col))
    }

    /// Absolute (x, y) of a local position
    pub fn to_absolute(&self, row: usize, col: usize) -> (i32, i32) {
        (self.x + col as i32, self.y + row as i32)
    }

    /// Local (row, col) of an absolute position, if it falls inside the grid
    pub fn to_local(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let col = x.checked_sub(self.x)?;
        let row = y.checked_sub(self.y)?;
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.height && col < self.width).then_some((row, col))
    }

    /// Every local position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.height).cartesian_product(0..self.width)
    }

    /// Rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width)
    }

    /// Copy of the grid moved to a new offset
    pub fn with_offset(&self, x: i32, y: i32) -> Self
    where
        T: Clone,
    {
        Self { x, y, width: self.width, height: self.height, cells: self.cells.clone() }
    }

    /// Whether two grids have the same width and height
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<'de, T> Deserialize<'de> for Grid<T>
where
    T: CellValue + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = GridData::<T>::deserialize(deserializer)?;
        Grid::new(data.x, data.y, data.width, data.height, data.cells)
            .map_err(serde::de::Error::custom)
    }
}

impl<T: Copy + fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@({}, {}) {}x{}", self.x, self.y, self.width, self.height)?;
        for row in self.rows() {
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(2, -1, 3, 2, vec![0u8, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid.dims(), (3, 2));
        assert_eq!((grid.x(), grid.y()), (2, -1));
        assert_eq!(grid.cell(1, 2), 5);
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_dimension_validation() {
        let err = Grid::new(0, 0, 2, 2, vec![0u8; 3]).unwrap_err();
        assert_eq!(err, GridError::DimensionMismatch { width: 2, height: 2, len: 3 });

        assert_eq!(Grid::<u8>::new(0, 0, 0, 0, vec![]).unwrap_err(), GridError::Empty);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(vec![vec![1u8, 2], vec![3, 4]]).unwrap();
        assert_eq!(grid.cells(), &[1, 2, 3, 4]);

        let ragged = Grid::from_rows(vec![vec![1u8, 2], vec![3]]);
        assert_eq!(ragged.unwrap_err(), GridError::RaggedRow { row: 1, len: 1, expected: 2 });
    }

    #[test]
    fn test_domain_validation() {
        assert!(Grid::from_rows(vec![vec![1u8, 10]]).is_err());
        assert!(Grid::from_rows(vec![vec![Cell::AnyExcept(0)]]).is_err());
        assert!(Grid::from_rows(vec![vec![Cell::AnyExcept(4), Cell::AnyNonzero]]).is_ok());
    }

    #[test]
    fn test_absolute_coordinates() {
        let grid = Grid::new(3, 5, 2, 2, vec![1u8, 2, 3, 4]).unwrap();
        assert_eq!(grid.to_absolute(1, 0), (3, 6));
        assert_eq!(grid.to_local(4, 5), Some((0, 1)));
        assert_eq!(grid.to_local(2, 5), None);
        assert_eq!(grid.get_abs(4, 6), Some(4));
        assert_eq!(grid.get_abs(5, 6), None);
    }

    #[test]
    fn test_equality_includes_offset() {
        let a = Grid::from_rows(vec![vec![1u8]]).unwrap();
        let b = a.with_offset(1, 0);
        assert_ne!(a, b);
        assert_eq!(a, b.with_offset(0, 0));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Grid<u8> = serde_json::from_str(r#"{"x":0,"y":0,"width":1,"height":2,"cells":[1,2]}"#).unwrap();
        assert_eq!(ok.dims(), (1, 2));

        let bad: Result<Grid<u8>, _> = serde_json::from_str(r#"{"x":0,"y":0,"width":2,"height":2,"cells":[1,2]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let huge = 1usize << (usize::BITS / 2);
        let err = Grid::<u8>::new(0, 0, huge, huge, vec![]).unwrap_err();
        assert_eq!(err, GridError::DimensionMismatch { width: huge, height: huge, len: 0 });
        assert!(err.to_string().contains("does not fit 0 cells"));

        let json = format!(r#"{{"x":0,"y":0,"width":{huge},"height":{huge},"cells":[]}}"#);
        assert!(serde_json::from_str::<Grid<u8>>(&json).is_err());
    }
}
