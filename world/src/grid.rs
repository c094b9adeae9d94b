//! Fixed rectangular topology shared by the world and the pathfinder.

use tron_grid_core::{CellCoord, Direction};

/// Rectangular grid of cells with four-directional adjacency.
///
/// The topology never changes after construction; only the world's occupancy
/// arena, which is indexed by [`Grid::index`], varies between turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    columns: u32,
}

impl Grid {
    /// Creates a grid with the provided dimensions.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.rows) * u64::from(self.columns);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Row-major slot of the cell in dense per-cell storage.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Cell stored at a row-major slot, the inverse of [`Grid::index`].
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        let width = usize::try_from(self.columns).ok().filter(|width| *width > 0)?;
        let row = u32::try_from(index / width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let cell = CellCoord::new(row, column);
        self.contains(cell).then_some(cell)
    }

    /// Neighbouring cell in the given direction, `None` at the boundary.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(cell) {
            return None;
        }

        let neighbor = match direction {
            Direction::Up => CellCoord::new(cell.row().checked_sub(1)?, cell.column()),
            Direction::Down => CellCoord::new(cell.row().checked_add(1)?, cell.column()),
            Direction::Left => CellCoord::new(cell.row(), cell.column().checked_sub(1)?),
            Direction::Right => CellCoord::new(cell.row(), cell.column().checked_add(1)?),
        };

        self.contains(neighbor).then_some(neighbor)
    }

    /// Neighbours of the cell in up, down, left, right order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = (Direction, CellCoord)> + '_ {
        Direction::ALL.into_iter().filter_map(move |direction| {
            self.neighbor(cell, direction)
                .map(|neighbor| (direction, neighbor))
        })
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(row, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn neighbor_is_none_at_edges() {
        let grid = Grid::new(2, 3);
        let corner = CellCoord::new(0, 0);
        assert_eq!(grid.neighbor(corner, Direction::Up), None);
        assert_eq!(grid.neighbor(corner, Direction::Left), None);
        assert_eq!(
            grid.neighbor(corner, Direction::Down),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            grid.neighbor(CellCoord::new(1, 2), Direction::Right),
            None
        );
        assert_eq!(
            grid.neighbor(CellCoord::new(1, 2), Direction::Down),
            None
        );
    }

    #[test]
    fn neighbors_follow_search_order() {
        let grid = Grid::new(3, 3);
        let order: Vec<_> = grid
            .neighbors(CellCoord::new(1, 1))
            .map(|(direction, _)| direction)
            .collect();
        assert_eq!(order, Direction::ALL.to_vec());
    }

    #[test]
    fn index_is_row_major() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.index(CellCoord::new(0, 0)), Some(0));
        assert_eq!(grid.index(CellCoord::new(1, 2)), Some(6));
        assert_eq!(grid.index(CellCoord::new(3, 0)), None);
        assert_eq!(grid.cell_count(), 12);
        let cells: Vec<_> = grid.cells().collect();
        for (index, cell) in cells.iter().enumerate() {
            assert_eq!(grid.index(*cell), Some(index));
            assert_eq!(grid.cell_at(index), Some(*cell));
        }
        assert_eq!(grid.cell_at(12), None);
    }

    #[test]
    fn cells_outside_grid_have_no_neighbors() {
        let grid = Grid::new(2, 2);
        assert_eq!(grid.neighbors(CellCoord::new(5, 5)).count(), 0);
    }

    proptest! {
        #[test]
        fn neighbor_relation_is_symmetric(rows in 1u32..8, columns in 1u32..8) {
            let grid = Grid::new(rows, columns);
            for cell in grid.cells() {
                for direction in Direction::ALL {
                    if let Some(neighbor) = grid.neighbor(cell, direction) {
                        prop_assert_eq!(grid.neighbor(neighbor, direction.opposite()), Some(cell));
                    }
                }
            }
        }
    }
}
