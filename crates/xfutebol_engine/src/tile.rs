//! Board coordinates and straight-line geometry.

use serde::{Deserialize, Serialize};

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// A tile on the 8x8 board.
///
/// Row 0 is White's goal line, row 7 is Black's. Tiles can only be built
/// through [`BoardTile::from_coords`], so every value is on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardTile {
    row: u8,
    col: u8,
}

impl BoardTile {
    /// Creates a tile from row/col indices, or `None` when off the board.
    pub fn from_coords(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE as usize && col < BOARD_SIZE as usize {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns `(row, col)` indices.
    pub fn to_index(self) -> (usize, usize) {
        (self.row as usize, self.col as usize)
    }

    /// Row index (0-7).
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index (0-7).
    pub fn col(self) -> u8 {
        self.col
    }

    /// Algebraic notation: column letter then 1-based row, e.g. `d1`.
    pub fn notation(self) -> String {
        format!("{}{}", (b'a' + self.col) as char, self.row + 1)
    }

    /// Returns the neighbouring tile in `direction`, if still on the board.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row < 0 || col < 0 {
            return None;
        }
        Self::from_coords(row as usize, col as usize)
    }

    /// King-move distance between two tiles.
    pub fn distance(self, other: Self) -> u8 {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Whether the two tiles touch (including diagonally).
    pub fn is_adjacent(self, other: Self) -> bool {
        self.distance(other) == 1
    }

    /// Direction from `self` to an adjacent `other`.
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == Some(other))
    }

    /// Tiles walked from `self` (exclusive) in `direction`, at most `max_len` of them.
    pub fn ray(self, direction: Direction, max_len: u8) -> Vec<Self> {
        let mut tiles = Vec::with_capacity(max_len as usize);
        let mut current = self;
        for _ in 0..max_len {
            match current.step(direction) {
                Some(next) => {
                    tiles.push(next);
                    current = next;
                }
                None => break,
            }
        }
        tiles
    }
}

impl std::fmt::Display for BoardTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 7.
    North,
    /// Towards row 7 and column 7.
    NorthEast,
    /// Towards column 7.
    East,
    /// Towards row 0 and column 7.
    SouthEast,
    /// Towards row 0.
    South,
    /// Towards row 0 and column 0.
    SouthWest,
    /// Towards column 0.
    West,
    /// Towards row 7 and column 0.
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// `(row, col)` delta of one step.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }
}
