//! Position and direction value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single game-world cell: a map id plus local coordinates.
///
/// Positions are opaque to the rest of the crate — nothing here assumes that
/// two positions on the same map are physically adjacent. Adjacency is only
/// ever learned by observing movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Map (room/overworld region) identifier.
    pub map: u16,
    /// Local x coordinate within the map.
    pub x: u8,
    /// Local y coordinate within the map.
    pub y: u8,
}

impl Position {
    pub const fn new(map: u16, x: u8, y: u8) -> Self {
        Self { map, x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{},{}", self.map, self.x, self.y)
    }
}

/// One of the four cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a fixed order. This order is load-bearing: edge
    /// storage, routing tie-breaks, and the wire format all index by it.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Index into [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Inverse lookup of [`Direction::index`].
    pub const fn from_index(index: usize) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()), Some(dir));
        }
        assert_eq!(Direction::from_index(4), None);
    }

    #[test]
    fn test_opposite() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_position_ordering() {
        // Map id dominates, then x, then y. Sorted frontier lists rely on this.
        let a = Position::new(0, 5, 5);
        let b = Position::new(1, 0, 0);
        let c = Position::new(1, 0, 3);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(3, 10, 7).to_string(), "3:10,7");
        assert_eq!(Direction::Left.to_string(), "Left");
    }
}
