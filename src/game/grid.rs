//! The square letter grid and grid coordinates.
//!
//! Coordinates follow the presentation layer's convention: `x` is the
//! column and `y` is the row, with `(0, 0)` in the top left corner.

use super::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
}

impl Coordinate {
    pub fn new(x: usize, y: usize) -> Self {
        Coordinate { x, y }
    }

    /// The cell `steps` moves away in `direction`, or `None` if that would
    /// leave a grid of side `size`.
    pub fn offset(self, direction: Direction, steps: usize, size: usize) -> Option<Coordinate> {
        let steps = steps as isize;
        let x = self.x as isize + direction.d_col as isize * steps;
        let y = self.y as isize + direction.d_row as isize * steps;
        let in_bounds = |v: isize| v >= 0 && (v as usize) < size;
        (in_bounds(x) && in_bounds(y)).then(|| Coordinate::new(x as usize, y as usize))
    }
}

/// An N×N grid of uppercase letters, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

impl Grid {
    /// Wrap fully populated row-major cells. The caller guarantees
    /// `cells.len() == size * size`.
    pub(crate) fn from_cells(size: usize, cells: Vec<char>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Grid { size, cells }
    }

    /// Build a grid from rows of letters, e.g. for puzzles authored by hand.
    ///
    /// Returns `None` unless the rows form a non-empty square of ASCII
    /// letters. Lowercase letters are uppercased.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let size = rows.len();
        if size == 0 {
            return None;
        }
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            let row = row.as_ref();
            if row.chars().count() != size || !row.chars().all(|c| c.is_ascii_alphabetic()) {
                return None;
            }
            cells.extend(row.chars().map(|c| c.to_ascii_uppercase()));
        }
        Some(Grid { size, cells })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Letter at a coordinate, or `None` if it is outside the grid.
    pub fn get(&self, at: Coordinate) -> Option<char> {
        (at.x < self.size && at.y < self.size).then(|| self.cells[at.y * self.size + at.x])
    }

    pub fn contains(&self, at: Coordinate) -> bool {
        at.x < self.size && at.y < self.size
    }

    /// Iterate over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.size)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Read `len` letters starting at `start` in `direction`.
    ///
    /// Returns `None` if the run would leave the grid.
    pub fn read(&self, start: Coordinate, direction: Direction, len: usize) -> Option<String> {
        (0..len)
            .map(|i| {
                start
                    .offset(direction, i, self.size)
                    .and_then(|at| self.get(at))
            })
            .collect()
    }

    /// Scan every cell and direction for `word` written forwards.
    ///
    /// This is deliberately independent of the placement engine so tests
    /// can use it to check placements.
    pub fn locate(&self, word: &str) -> Option<(Coordinate, Direction)> {
        let word = word.to_uppercase();
        let len = word.chars().count();
        if len == 0 {
            return None;
        }
        for y in 0..self.size {
            for x in 0..self.size {
                let start = Coordinate::new(x, y);
                for direction in Direction::ALL {
                    if self.read(start, direction, len).as_deref() == Some(word.as_str()) {
                        return Some((start, direction));
                    }
                }
            }
        }
        None
    }

    /// Whether `word` appears in a straight line, forwards or backwards.
    ///
    /// Every direction is scanned, so a backwards word is also a forwards
    /// word in the opposite direction.
    pub fn contains_word(&self, word: &str) -> bool {
        self.locate(word).is_some()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid {
        Grid::from_rows(&["CATX", "XOXX", "XXWX", "DOGX"]).unwrap()
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert!(Grid::from_rows::<&str>(&[]).is_none());
        assert!(Grid::from_rows(&["AB", "C"]).is_none());
        assert!(Grid::from_rows(&["AB", "C1"]).is_none());
        assert_eq!(Grid::from_rows(&["ab", "cd"]).unwrap().cells(), &['A', 'B', 'C', 'D']);
    }

    #[test]
    fn test_get_and_bounds() {
        let grid = sample();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.get(Coordinate::new(0, 0)), Some('C'));
        assert_eq!(grid.get(Coordinate::new(2, 0)), Some('T'));
        assert_eq!(grid.get(Coordinate::new(0, 3)), Some('D'));
        assert_eq!(grid.get(Coordinate::new(4, 0)), None);
        assert!(!grid.contains(Coordinate::new(0, 4)));
    }

    #[test]
    fn test_offset_stays_in_bounds() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.offset(Direction::RIGHT, 3, 4), Some(Coordinate::new(3, 0)));
        assert_eq!(origin.offset(Direction::RIGHT, 4, 4), None);
        assert_eq!(origin.offset(Direction::UP, 1, 4), None);
        assert_eq!(
            Coordinate::new(3, 0).offset(Direction::DOWN_LEFT, 3, 4),
            Some(Coordinate::new(0, 3))
        );
    }

    #[test]
    fn test_locate_finds_all_orientations() {
        let grid = sample();
        assert_eq!(
            grid.locate("CAT"),
            Some((Coordinate::new(0, 0), Direction::RIGHT))
        );
        assert_eq!(
            grid.locate("COW"),
            Some((Coordinate::new(0, 0), Direction::DOWN_RIGHT))
        );
        // Backwards words are found in the opposite direction
        assert_eq!(
            grid.locate("GOD"),
            Some((Coordinate::new(2, 3), Direction::LEFT))
        );
        assert!(grid.contains_word("tac"));
        assert!(!grid.contains_word("BIRD"));
        assert!(!grid.contains_word(""));
    }

    #[test]
    fn test_display_renders_rows() {
        let grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        assert_eq!(grid.to_string(), "A B\nC D");
    }
}
