//! Forward grid operations
//!
//! Every operation is pure: inputs are borrowed and never mutated.

use crate::grid::{Image, MAX_COLOR};
use serde::{Deserialize, Serialize};

/// Orthogonal transformations understood by [`orthogonal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Reverse the columns (mirror across the vertical axis)
    MirrorVertical,
    /// Reverse the rows (mirror across the horizontal axis)
    MirrorHorizontal,
    /// Clockwise quarter turn: transpose, then reverse each row
    Rotate90,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::MirrorVertical,
        Orientation::MirrorHorizontal,
        Orientation::Rotate90,
    ];

    /// Decode the integer mode used by grammars (0, 1, 2)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Orientation::MirrorVertical),
            1 => Some(Orientation::MirrorHorizontal),
            2 => Some(Orientation::Rotate90),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Orientation::MirrorVertical => 0,
            Orientation::MirrorHorizontal => 1,
            Orientation::Rotate90 => 2,
        }
    }

    /// Output (width, height) for an input of the given size
    pub fn output_dims(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            Orientation::MirrorVertical | Orientation::MirrorHorizontal => (width, height),
            Orientation::Rotate90 => (height, width),
        }
    }

    /// Input position that lands on output position (row, col)
    ///
    /// `width` and `height` are the input's dimensions.
    #[inline]
    pub fn source(self, row: usize, col: usize, width: usize, height: usize) -> (usize, usize) {
        match self {
            Orientation::MirrorVertical => (row, width - 1 - col),
            Orientation::MirrorHorizontal => (height - 1 - row, col),
            Orientation::Rotate90 => (height - 1 - col, row),
        }
    }
}

/// Keep cells equal to `color`, clear everything else
pub fn filter_color(image: &Image, color: u8) -> Image {
    image.map(|value| if value == color { color } else { 0 })
}

/// Paint every nonzero cell with `color`
///
/// # Panics
///
/// Panics if `color` is not in 0..=9.
pub fn recolor(image: &Image, color: u8) -> Image {
    assert!(color <= MAX_COLOR, "recolor color {} out of range", color);
    image.map(|value| if value != 0 { color } else { 0 })
}

/// Mirror or rotate an image; the result is placed at the origin
pub fn orthogonal(image: &Image, mode: Orientation) -> Image {
    let (width, height) = image.dims();
    let (out_width, out_height) = mode.output_dims(width, height);
    Image::from_fn(0, 0, out_width, out_height, |row, col| {
        let (src_row, src_col) = mode.source(row, col, width, height);
        image.cell(src_row, src_col)
    })
}

/// [`orthogonal`] driven by an integer mode; unsupported modes yield `None`
pub fn orthogonal_code(image: &Image, mode: i32) -> Option<Image> {
    Orientation::from_code(mode).map(|mode| orthogonal(image, mode))
}

/// Copy of the image moved to offset (0, 0)
pub fn origin(image: &Image) -> Image {
    image.with_offset(0, 0)
}

/// The image itself
pub fn identity(image: &Image) -> &Image {
    image
}

/// Paint `a` then `b` on the smallest canvas covering both; `b` wins overlaps
pub fn compose(a: &Image, b: &Image) -> Image {
    // Far edges may lie past i32::MAX
    let left = a.x().min(b.x());
    let top = a.y().min(b.y());
    let right = extent(a.x(), a.width()).max(extent(b.x(), b.width()));
    let bottom = extent(a.y(), a.height()).max(extent(b.y(), b.height()));
    let width = (right - i64::from(left)) as usize;
    let height = (bottom - i64::from(top)) as usize;

    let mut canvas = vec![0u8; width * height];
    for layer in [a, b] {
        let dx = (i64::from(layer.x()) - i64::from(left)) as usize;
        let dy = (i64::from(layer.y()) - i64::from(top)) as usize;
        for (row, col) in layer.positions() {
            canvas[(dy + row) * width + dx + col] = layer.cell(row, col);
        }
    }

    Image::from_fn(left, top, width, height, |row, col| canvas[row * width + col])
}

/// One past the last coordinate covered along an axis
fn extent(start: i32, len: usize) -> i64 {
    i64::from(start) + len as i64
}

/// Crop to the bounding box of the nonzero cells, keeping its absolute position
///
/// Returns `None` for an all-zero image.
pub fn compress(image: &Image) -> Option<Image> {
    let (min_row, max_row, min_col, max_col) = image
        .positions()
        .filter(|&(row, col)| image.cell(row, col) != 0)
        .fold(None, |bounds, (row, col)| match bounds {
            None => Some((row, row, col, col)),
            Some((r0, r1, c0, c1)) => Some((r0.min(row), r1.max(row), c0.min(col), c1.max(col))),
        })?;

    let (x, y) = image.to_absolute(min_row, min_col);
    Some(Image::from_fn(x, y, max_col - min_col + 1, max_row - min_row + 1, |row, col| {
        image.cell(min_row + row, min_col + col)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(rows: Vec<Vec<u8>>) -> Image {
        Image::from_rows(rows).unwrap()
    }

    #[test]
    fn test_filter_color() {
        let input = image(vec![vec![1, 2], vec![2, 0]]);
        assert_eq!(filter_color(&input, 2), image(vec![vec![0, 2], vec![2, 0]]));
    }

    #[test]
    fn test_recolor_keeps_offset() {
        let input = image(vec![vec![1, 0], vec![3, 4]]).with_offset(2, 3);
        let output = recolor(&input, 7);
        assert_eq!(output, image(vec![vec![7, 0], vec![7, 7]]).with_offset(2, 3));
    }

    #[test]
    fn test_mirrors() {
        let input = image(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(
            orthogonal(&input, Orientation::MirrorVertical),
            image(vec![vec![3, 2, 1], vec![6, 5, 4]])
        );
        assert_eq!(
            orthogonal(&input, Orientation::MirrorHorizontal),
            image(vec![vec![4, 5, 6], vec![1, 2, 3]])
        );
    }

    #[test]
    fn test_rotate_clockwise() {
        let input = image(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let rotated = orthogonal(&input, Orientation::Rotate90);
        assert_eq!(rotated, image(vec![vec![4, 1], vec![5, 2], vec![6, 3]]));
    }

    #[test]
    fn test_rotate_four_times_is_identity() {
        let input = image(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let turned = (0..4).fold(input.clone(), |acc, _| orthogonal(&acc, Orientation::Rotate90));
        assert_eq!(turned, input);
    }

    #[test]
    fn test_unsupported_mode() {
        let input = image(vec![vec![1]]);
        assert!(orthogonal_code(&input, 3).is_none());
        assert!(orthogonal_code(&input, -1).is_none());
        assert_eq!(orthogonal_code(&input, 2), Some(input));
    }

    #[test]
    fn test_origin_and_identity() {
        let input = image(vec![vec![1, 2]]).with_offset(4, -2);
        let moved = origin(&input);
        assert_eq!((moved.x(), moved.y()), (0, 0));
        assert_eq!(moved.cells(), input.cells());
        assert!(std::ptr::eq(identity(&input), &input));
    }

    #[test]
    fn test_compose_overlap() {
        let a = image(vec![vec![1, 1], vec![1, 1]]);
        let b = image(vec![vec![9]]).with_offset(1, 1);
        assert_eq!(compose(&a, &b), image(vec![vec![1, 1], vec![1, 9]]));
    }

    #[test]
    fn test_compose_disjoint_fills_gap_with_zero() {
        let a = image(vec![vec![2]]).with_offset(-1, 0);
        let b = image(vec![vec![3]]).with_offset(1, 1);
        let canvas = compose(&a, &b);
        assert_eq!((canvas.x(), canvas.y()), (-1, 0));
        assert_eq!(canvas.dims(), (3, 2));
        assert_eq!(canvas.cells(), &[2, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_compose_near_coordinate_limits() {
        let a = image(vec![vec![1, 2]]).with_offset(i32::MAX - 1, i32::MAX);
        let b = image(vec![vec![7]]).with_offset(i32::MAX, i32::MAX);
        let canvas = compose(&a, &b);
        assert_eq!((canvas.x(), canvas.y()), (i32::MAX - 1, i32::MAX));
        assert_eq!(canvas.cells(), &[1, 7]);

        let low = image(vec![vec![4]]).with_offset(i32::MIN, i32::MIN);
        let below = image(vec![vec![5], vec![6]]).with_offset(i32::MIN, i32::MIN + 1);
        let stacked = compose(&low, &below);
        assert_eq!(stacked.dims(), (1, 3));
        assert_eq!(stacked.cells(), &[4, 5, 6]);
    }

    #[test]
    fn test_compress() {
        let input = image(vec![
            vec![0, 0, 0, 0],
            vec![0, 0, 5, 0],
            vec![0, 6, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .with_offset(10, 20);
        let cropped = compress(&input).unwrap();
        assert_eq!((cropped.x(), cropped.y()), (11, 21));
        assert_eq!(cropped.dims(), (2, 2));
        assert_eq!(cropped.cells(), &[0, 5, 6, 0]);
    }

    #[test]
    fn test_compress_empty() {
        assert!(compress(&Image::blank(0, 0, 3, 3)).is_none());
    }
}
