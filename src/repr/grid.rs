use std::ops::{Index, IndexMut};

use crate::{Error, Result};

/// Position `(row, col)` in a [`Grid`]
pub type Cell = (usize, usize);

/// Dense `rows x cols` grid stored in row-major order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid where every cell holds `value`
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid from its rows.
    /// ** Panics if the rows have different lengths **
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        assert!(rows.iter().all(|r| r.len() == cols), "grid rows must have equal length");
        Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns *true* if the cell lies inside the grid
    pub fn contains(&self, (r, c): Cell) -> bool {
        r < self.rows && c < self.cols
    }

    /// Returns the cell or an [`Error::CellOutOfRange`] if it lies outside of the grid
    pub fn check_cell(&self, cell: Cell) -> Result<Cell> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(Error::CellOutOfRange {
                row: cell.0,
                col: cell.1,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.contains(cell).then(|| &self.cells[cell.0 * self.cols + cell.1])
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut T> {
        if self.contains(cell) {
            Some(&mut self.cells[cell.0 * self.cols + cell.1])
        } else {
            None
        }
    }

    /// Returns the up to four orthogonal neighbours (up, down, left, right) inside the grid
    pub fn neighbors4(&self, (r, c): Cell) -> impl Iterator<Item = Cell> + '_ {
        const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        DIRECTIONS.into_iter().filter_map(move |(dr, dc)| {
            let cell = (r.checked_add_signed(dr)?, c.checked_add_signed(dc)?);
            self.contains(cell).then_some(cell)
        })
    }

    /// Iterates over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, &T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, x)| ((i / cols, i % cols), x))
    }

    /// Returns row `r`
    /// ** Panics if `r >= rows` **
    pub fn row(&self, r: usize) -> &[T] {
        &self.cells[r * self.cols..(r + 1) * self.cols]
    }
}

impl<T> Index<Cell> for Grid<T> {
    type Output = T;

    fn index(&self, (r, c): Cell) -> &T {
        assert!(r < self.rows && c < self.cols);
        &self.cells[r * self.cols + c]
    }
}

impl<T> IndexMut<Cell> for Grid<T> {
    fn index_mut(&mut self, (r, c): Cell) -> &mut T {
        assert!(r < self.rows && c < self.cols);
        &mut self.cells[r * self.cols + c]
    }
}
