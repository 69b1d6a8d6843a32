//! Dense 2D buffer.
//!
//! [`Grid`] is the row-major scratch arena the compositor materializes once per frame so that
//! the top and bottom pixel of every character cell can be addressed by direct index.

use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::{Index, IndexMut};

/// A dense, fixed-size 2D grid.
///
/// # Example
///
/// ```rust
/// use pixterm::rendering::grid::Grid;
///
/// let mut grid: Grid<Option<[u8; 3]>> = Grid::new(4, 2, None);
/// grid.set(3, 1, Some([255, 0, 0]));
/// grid.set(4, 1, Some([0, 0, 255]));
/// assert_eq!(grid[(3, 1)], Some([255, 0, 0]));
/// assert_eq!(grid[(0, 1)], None);
/// ```
#[derive(Clone)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    default: T,
    cells: Vec<T>,
}

impl<T: Debug> Debug for Grid<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Grid {{ width: {}, height: {}, cells: {:?} }}",
            self.width, self.height, self.cells
        )
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a new `Grid` with every cell set to `default`.
    pub fn new(width: usize, height: usize, default: T) -> Self {
        Self {
            width,
            height,
            default: default.clone(),
            cells: vec![default; width * height],
        }
    }

    /// Resets every cell to the default value.
    pub fn clear(&mut self) {
        self.cells.fill(self.default.clone());
    }

    /// Resizes the grid and resets every cell to the default value.
    ///
    /// The backing allocation is reused when it is large enough.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.cells.clear();
        self.cells.resize(width * height, self.default.clone());
        self.width = width;
        self.height = height;
    }
}

impl<T> Grid<T> {
    #[inline]
    fn get_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Gets the height of the grid (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Gets the width of the grid (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sets the cell at `(x, y)` if the coordinates are in bounds.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(idx) = self.get_index(x, y) {
            self.cells[idx] = value;
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        let idx = y * self.width + x;
        &mut self.cells[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_discards_contents() {
        let mut grid = Grid::new(2, 2, 0u8);
        grid[(1, 1)] = 7;
        grid.reset(3, 1);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid[(0, 0)], 0);
        assert_eq!(grid[(2, 0)], 0);
    }

    #[test]
    fn test_out_of_bounds_set_is_ignored() {
        let mut grid = Grid::new(2, 2, 0u8);
        grid.set(2, 0, 1);
        grid.set(0, 2, 1);
        assert_eq!([grid[(0, 0)], grid[(1, 0)], grid[(0, 1)], grid[(1, 1)]], [0; 4]);
    }
}
