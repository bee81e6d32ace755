//! Per-pixel coordinate maps (ST maps).
//!
//! A [`CoordinateField`] answers, for every output pixel, which fractional
//! source position should be sampled to produce it.

use crate::{Error, Result};

/// Source coordinates for an `height x width` output grid.
///
/// `map_x` and `map_y` are row-major. Values are expected to be clamped to
/// `[0, width - 1]` / `[0, height - 1]` by whoever builds the field.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateField {
    width: usize,
    height: usize,
    map_x: Vec<f32>,
    map_y: Vec<f32>,
}

impl CoordinateField {
    /// Builds a field by evaluating `coord_fn(row, col) -> (x, y)` for every position.
    pub fn from_fn<F>(width: usize, height: usize, coord_fn: F) -> Self
    where
        F: Fn(usize, usize) -> (f32, f32),
    {
        let len = width * height;
        let mut map_x = Vec::with_capacity(len);
        let mut map_y = Vec::with_capacity(len);
        for row in 0..height {
            for col in 0..width {
                let (x, y) = coord_fn(row, col);
                map_x.push(x);
                map_y.push(y);
            }
        }
        Self {
            width,
            height,
            map_x,
            map_y,
        }
    }

    /// Wraps precomputed maps. Both must hold `width * height` entries.
    pub fn from_maps(width: usize, height: usize, map_x: Vec<f32>, map_y: Vec<f32>) -> Result<Self> {
        let expected = width * height;
        for (name, map) in [("map_x", &map_x), ("map_y", &map_y)] {
            if map.len() != expected {
                return Err(Error::dimension_mismatch(
                    format!("{name} of {expected} entries ({width}x{height})"),
                    format!("{} entries", map.len()),
                ));
            }
        }
        Ok(Self {
            width,
            height,
            map_x,
            map_y,
        })
    }

    /// Identity mapping: every pixel samples itself.
    pub fn identity(width: usize, height: usize) -> Self {
        Self::from_fn(width, height, |row, col| (col as f32, row as f32))
    }

    /// Grid width.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(x, y)` source position for output `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> (f32, f32) {
        let idx = row * self.width + col;
        (self.map_x[idx], self.map_y[idx])
    }

    /// Horizontal source coordinates, row-major.
    pub fn map_x(&self) -> &[f32] {
        &self.map_x
    }

    /// Vertical source coordinates, row-major.
    pub fn map_y(&self) -> &[f32] {
        &self.map_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let field = CoordinateField::identity(3, 2);
        assert_eq!(field.get(0, 0), (0.0, 0.0));
        assert_eq!(field.get(1, 2), (2.0, 1.0));
        assert_eq!(field.map_x().len(), 6);
    }

    #[test]
    fn test_from_fn_order() {
        let field = CoordinateField::from_fn(2, 2, |row, col| (col as f32 * 10.0, row as f32 + 0.5));
        assert_eq!(field.map_x(), &[0.0, 10.0, 0.0, 10.0]);
        assert_eq!(field.map_y(), &[0.5, 0.5, 1.5, 1.5]);
    }

    #[test]
    fn test_from_maps_checks_length() {
        assert!(CoordinateField::from_maps(2, 2, vec![0.0; 4], vec![0.0; 4]).is_ok());

        let err = CoordinateField::from_maps(2, 2, vec![0.0; 4], vec![0.0; 3]).unwrap_err();
        assert!(err.is_dimension_mismatch());
        assert!(err.to_string().contains("map_y"));
    }
}
