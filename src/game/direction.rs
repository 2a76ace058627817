//! The eight straight-line directions a word can run in.

use serde::{Deserialize, Serialize};

/// A unit step through the grid. Each component is -1, 0 or 1 and the
/// components are never both zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub d_row: i8,
    pub d_col: i8,
}

impl Direction {
    pub const RIGHT: Direction = Direction::new(0, 1);
    pub const DOWN: Direction = Direction::new(1, 0);
    pub const DOWN_RIGHT: Direction = Direction::new(1, 1);
    pub const UP_RIGHT: Direction = Direction::new(-1, 1);
    pub const LEFT: Direction = Direction::new(0, -1);
    pub const UP: Direction = Direction::new(-1, 0);
    pub const UP_LEFT: Direction = Direction::new(-1, -1);
    pub const DOWN_LEFT: Direction = Direction::new(1, -1);

    /// All directions, in the order placement draws from.
    pub const ALL: [Direction; 8] = [
        Direction::RIGHT,
        Direction::DOWN,
        Direction::DOWN_RIGHT,
        Direction::UP_RIGHT,
        Direction::LEFT,
        Direction::UP,
        Direction::UP_LEFT,
        Direction::DOWN_LEFT,
    ];

    const fn new(d_row: i8, d_col: i8) -> Self {
        Direction { d_row, d_col }
    }

    /// The unit direction from one cell towards another, if the two cells
    /// lie on a horizontal, vertical or 45° line. `None` for the same cell
    /// or any other angle.
    pub fn between(d_row: isize, d_col: isize) -> Option<Self> {
        if d_row == 0 && d_col == 0 {
            return None;
        }
        if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
            return None;
        }
        Some(Direction::new(d_row.signum() as i8, d_col.signum() as i8))
    }

    /// The direction pointing the other way.
    pub fn reversed(self) -> Self {
        Direction::new(-self.d_row, -self.d_col)
    }

    pub fn is_diagonal(self) -> bool {
        self.d_row != 0 && self.d_col != 0
    }
}
