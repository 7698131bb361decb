use std::collections::VecDeque;

use crate::{
    Result,
    repr::{Cell, Grid},
};

/// Result of a [`flood_fill`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloodFill {
    /// Flooded cells in the order they were reached, together with their wave (BFS depth)
    pub order: Vec<(Cell, u32)>,
    /// Wave in which each cell was flooded, `None` if it stayed dry
    pub waves: Grid<Option<u32>>,
}

impl FloodFill {
    /// Number of flooded cells
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns *true* if the cell was flooded
    pub fn is_flooded(&self, cell: Cell) -> bool {
        self.waves.get(cell).is_some_and(|w| w.is_some())
    }

    /// Number of waves needed to flood all reachable cells
    pub fn number_of_waves(&self) -> u32 {
        self.order.last().map_or(0, |&(_, w)| w + 1)
    }
}

/// Breadth-first flood from `start` over the 4-neighbourhood.
///
/// The start cell is always flooded (wave `0`); the water then spreads to every orthogonally adjacent
/// cell for which `passable` holds. Returns [`crate::Error::CellOutOfRange`] if `start` lies outside
/// of the grid.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let area = Grid::from_rows(vec![
///     vec![0, 0, 1],
///     vec![0, 1, 0],
///     vec![1, 0, 0],
/// ]);
/// let flood = flood_fill(&area, (0, 0), |&h| h == 0).unwrap();
/// assert_eq!(flood.len(), 3);
/// assert!(!flood.is_flooded((2, 2)));
/// ```
pub fn flood_fill<T, F>(grid: &Grid<T>, start: Cell, mut passable: F) -> Result<FloodFill>
where
    F: FnMut(&T) -> bool,
{
    grid.check_cell(start)?;

    let mut waves = Grid::new(grid.rows(), grid.cols(), None);
    let mut order = Vec::new();
    let mut queue = VecDeque::from([start]);
    waves[start] = Some(0);

    while let Some(cell) = queue.pop_front() {
        let Some(wave) = waves[cell] else {
            continue;
        };
        order.push((cell, wave));

        for next in grid.neighbors4(cell) {
            if waves[next].is_none() && passable(&grid[next]) {
                waves[next] = Some(wave + 1);
                queue.push_back(next);
            }
        }
    }

    Ok(FloodFill { order, waves })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::Error;

    #[test]
    fn flood_from_center() {
        let area = Grid::from_rows(vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]);
        let flood = flood_fill(&area, (1, 1), |&x| x == 0).unwrap();

        assert_eq!(flood.len(), 9);
        assert_eq!(flood.number_of_waves(), 3);
        assert_eq!(
            flood.order.iter().filter(|(_, w)| *w == 1).map(|(c, _)| *c).collect_vec(),
            vec![(0, 1), (2, 1), (1, 0), (1, 2)]
        );
        assert_eq!(flood.waves[(0, 0)], Some(2));
    }

    #[test]
    fn walls_stop_water() {
        let area = Grid::from_rows(vec![
            vec!['.', '#', '.'],
            vec!['.', '#', '.'],
            vec!['.', '.', '#'],
        ]);
        let flood = flood_fill(&area, (0, 0), |&c| c == '.').unwrap();

        assert_eq!(flood.len(), 4);
        assert!(flood.is_flooded((2, 1)));
        assert!(!flood.is_flooded((0, 2)));
        assert_eq!(flood.waves[(2, 1)], Some(3));
    }

    #[test]
    fn start_outside() {
        let area = Grid::new(2, 2, 0);
        assert!(matches!(
            flood_fill(&area, (2, 0), |_| true),
            Err(Error::CellOutOfRange { row: 2, col: 0, .. })
        ));
    }
}
