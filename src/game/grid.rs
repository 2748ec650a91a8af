use serde::{Deserialize, Serialize};

use super::action::Direction;
use crate::error::{Result, SnakeError};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move position by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }
}

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Item {
    #[default]
    Empty,
    Wall,
    Body,
    Apple,
}

/// A coordinate together with its occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub item: Item,
}

impl Cell {
    pub fn new(position: Position, item: Item) -> Self {
        Self { position, item }
    }

    pub fn is_empty(&self) -> bool {
        self.item == Item::Empty
    }
}

/// Rectangular occupancy map, stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    height: usize,
    width: usize,
    items: Vec<Item>,
}

impl Grid {
    /// An all-empty grid of the given shape
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            items: vec![Item::Empty; height * width],
        }
    }

    /// An empty grid whose outer ring is already walled
    pub fn with_wall_borders(height: usize, width: usize) -> Self {
        let mut grid = Self::new(height, width);
        grid.add_wall_borders();
        grid
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.row < self.height as i32
            && pos.col >= 0
            && pos.col < self.width as i32
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if !self.contains(pos) {
            return Err(SnakeError::OutOfBounds {
                position: pos,
                height: self.height,
                width: self.width,
            });
        }
        Ok(pos.row as usize * self.width + pos.col as usize)
    }

    /// Occupant at a position
    pub fn get(&self, pos: Position) -> Result<Item> {
        self.index(pos).map(|idx| self.items[idx])
    }

    pub fn is_empty(&self, pos: Position) -> Result<bool> {
        Ok(self.get(pos)? == Item::Empty)
    }

    /// Write each cell's item at its position, overwriting the previous tag.
    /// All positions are checked before any write happens.
    pub fn set_cell(&mut self, cells: &[Cell]) -> Result<()> {
        let indices = cells
            .iter()
            .map(|cell| self.index(cell.position))
            .collect::<Result<Vec<_>>>()?;
        for (idx, cell) in indices.into_iter().zip(cells) {
            self.items[idx] = cell.item;
        }
        Ok(())
    }

    pub fn set_empty(&mut self, pos: Position) -> Result<()> {
        let idx = self.index(pos)?;
        self.items[idx] = Item::Empty;
        Ok(())
    }

    /// Tag the outermost ring as wall
    pub fn add_wall_borders(&mut self) {
        let (height, width) = (self.height, self.width);
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row == height - 1 || col == width - 1 {
                    self.items[row * width + col] = Item::Wall;
                }
            }
        }
    }

    /// Reset every non-wall cell to empty
    pub fn clear_interior(&mut self) {
        for item in self.items.iter_mut().filter(|item| **item != Item::Wall) {
            *item = Item::Empty;
        }
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.items.iter().enumerate().map(move |(idx, &item)| {
            let position = Position::new((idx / self.width) as i32, (idx % self.width) as i32);
            Cell::new(position, item)
        })
    }

    /// Positions of all empty cells in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells()
            .filter(Cell::is_empty)
            .map(|cell| cell.position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_positions(grid: &Grid) -> Vec<Position> {
        grid.cells().map(|cell| cell.position).collect()
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Right), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(5, 4));
    }

    #[test]
    fn test_set_and_clear_every_cell() {
        let mut grid = Grid::new(4, 6);
        for pos in all_positions(&grid) {
            assert!(grid.is_empty(pos).unwrap());
            grid.set_cell(&[Cell::new(pos, Item::Body)]).unwrap();
            assert!(!grid.is_empty(pos).unwrap());
            grid.set_empty(pos).unwrap();
            assert!(grid.is_empty(pos).unwrap());
        }
    }

    #[test]
    fn test_set_cell_overwrites() {
        let mut grid = Grid::new(3, 3);
        let pos = Position::new(1, 1);
        grid.set_cell(&[Cell::new(pos, Item::Apple)]).unwrap();
        grid.set_cell(&[Cell::new(pos, Item::Body)]).unwrap();
        assert_eq!(grid.get(pos).unwrap(), Item::Body);
    }

    #[test]
    fn test_wall_borders() {
        let grid = Grid::with_wall_borders(5, 7);
        for cell in grid.cells() {
            let Position { row, col } = cell.position;
            let on_ring = row == 0 || col == 0 || row == 4 || col == 6;
            if on_ring {
                assert_eq!(cell.item, Item::Wall);
            } else {
                assert!(cell.is_empty());
            }
        }
        assert_eq!(grid.empty_positions().len(), 3 * 5);
    }

    #[test]
    fn test_out_of_bounds_lookup() {
        let mut grid = Grid::new(3, 3);
        let outside = Position::new(3, 0);
        assert!(matches!(
            grid.get(outside),
            Err(SnakeError::OutOfBounds { .. })
        ));
        assert!(grid.set_empty(Position::new(0, -1)).is_err());
    }

    #[test]
    fn test_set_cell_rejects_without_partial_write() {
        let mut grid = Grid::new(3, 3);
        let inside = Position::new(1, 1);
        let result = grid.set_cell(&[
            Cell::new(inside, Item::Body),
            Cell::new(Position::new(9, 9), Item::Body),
        ]);
        assert!(result.is_err());
        assert!(grid.is_empty(inside).unwrap());
    }

    #[test]
    fn test_clear_interior_keeps_walls() {
        let mut grid = Grid::with_wall_borders(5, 5);
        grid.set_cell(&[
            Cell::new(Position::new(2, 2), Item::Apple),
            Cell::new(Position::new(1, 3), Item::Body),
        ])
        .unwrap();
        grid.clear_interior();
        assert_eq!(grid, Grid::with_wall_borders(5, 5));
    }
}
