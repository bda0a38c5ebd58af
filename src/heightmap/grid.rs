//! Dense square height grid

use std::ops::Index;

/// `resolution x resolution` heights stored row-major.
///
/// Rows advance along Z and columns along X, so `grid[(z, x)]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    resolution: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    /// Zero-filled grid
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            heights: vec![0.0; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.resolution && col < self.resolution {
            Some(self.heights[row * self.resolution + col])
        } else {
            None
        }
    }

    /// Panics if out of range
    pub fn set(&mut self, row: usize, col: usize, height: f32) {
        assert!(row < self.resolution && col < self.resolution, "cell ({}, {}) out of range", row, col);
        self.heights[row * self.resolution + col] = height;
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.resolution;
        &self.heights[start..start + self.resolution]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.heights.chunks_exact(self.resolution.max(1))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.heights
    }

    /// Copy out as nested rows, `[z][x]`
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Lowest and highest stored value, `(0, 0)` for an empty grid
    pub fn min_max(&self) -> (f32, f32) {
        if self.heights.is_empty() {
            return (0.0, 0.0);
        }
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}

impl Index<(usize, usize)> for HeightGrid {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(row < self.resolution && col < self.resolution, "cell ({}, {}) out of range", row, col);
        &self.heights[row * self.resolution + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let grid = HeightGrid::new(3);
        assert_eq!(grid.len(), 9);
        assert!(grid.as_slice().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = HeightGrid::new(3);
        grid.set(1, 2, 0.75);
        assert_eq!(grid[(1, 2)], 0.75);
        assert_eq!(grid.as_slice()[5], 0.75);
        assert_eq!(grid.row(1), &[0.0, 0.0, 0.75]);
        assert_eq!(grid.get(2, 1), Some(0.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_to_rows_and_min_max() {
        let mut grid = HeightGrid::new(2);
        grid.set(0, 0, 0.25);
        grid.set(1, 1, 1.5);
        assert_eq!(grid.to_rows(), vec![vec![0.25, 0.0], vec![0.0, 1.5]]);
        assert_eq!(grid.min_max(), (0.0, 1.5));
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let grid = HeightGrid::new(2);
        let _ = grid[(0, 2)];
    }
}
