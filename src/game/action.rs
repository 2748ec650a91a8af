use serde::{Deserialize, Serialize};

/// Heading of a snake. The discriminant order is the network's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, in output-index order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Index of this direction in the network output
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Direction for a network output index (wraps modulo 4)
    pub fn from_index(idx: usize) -> Self {
        Self::ALL[idx % 4]
    }

    /// The 180-degree reversal of this direction
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Returns the delta (d_row, d_col) for moving in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Unit direction matching a (d_row, d_col) step, if it is orthogonal
    pub fn from_delta(d_row: i32, d_col: i32) -> Option<Self> {
        match (d_row.signum(), d_col.signum()) {
            (-1, 0) => Some(Direction::Up),
            (0, 1) => Some(Direction::Right),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            _ => None,
        }
    }
}
