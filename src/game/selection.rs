//! Selection validation
//!
//! Turns the cells a player dragged across into a word and checks it
//! against the round's word list:
//! - At least 2 cells, all inside the grid
//! - A straight line at 0, 45 or 90 degrees with unit steps
//! - At least 3 letters
//! - Listed, read forwards or backwards (case-insensitive)

use super::direction::Direction;
use super::grid::{Coordinate, Grid};

/// Minimum word length for a valid selection
pub const MIN_WORD_LENGTH: usize = 3;

/// Outcome of checking a selection, with the reason it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    /// Selection spells a listed word; holds the listed spelling
    Match(String),
    /// Fewer than two cells were selected
    TooFewCells,
    /// A cell lies outside the grid
    OutOfBounds { at: Coordinate },
    /// Cells do not form a straight 0/45/90 degree line
    NotStraight,
    /// Line is shorter than the minimum word length
    TooShort { length: usize },
    /// Letters spell no listed word in either direction
    NoMatch { letters: String },
}

impl SelectionResult {
    /// Returns true if the selection matched a word
    pub fn is_match(&self) -> bool {
        matches!(self, SelectionResult::Match(_))
    }

    /// The matched word, if any
    pub fn into_word(self) -> Option<String> {
        match self {
            SelectionResult::Match(word) => Some(word),
            _ => None,
        }
    }

    /// Returns a user-friendly message
    pub fn message(&self) -> String {
        match self {
            SelectionResult::Match(word) => format!("Found {}!", word),
            SelectionResult::TooFewCells => "Drag across at least two letters".to_string(),
            SelectionResult::OutOfBounds { at } => {
                format!("Cell ({}, {}) is off the grid", at.x, at.y)
            }
            SelectionResult::NotStraight => "Words run in straight lines".to_string(),
            SelectionResult::TooShort { length } => {
                format!("Too short ({} letters, need {}+)", length, MIN_WORD_LENGTH)
            }
            SelectionResult::NoMatch { letters } => format!("{} is not in the list", letters),
        }
    }
}

/// Expand a selection into the full straight line it describes.
///
/// The line runs from the first cell to the last. A two-cell selection is
/// filled in; a longer one must already be exactly that line. Returns
/// `None` for a single cell or any path that is not a straight line at
/// 0/45/90 degrees.
pub fn selection_path(selection: &[Coordinate]) -> Option<Vec<Coordinate>> {
    let (&first, &last) = (selection.first()?, selection.last()?);
    if selection.len() < 2 {
        return None;
    }

    let (d_col, d_row) = (first.x.abs_diff(last.x), first.y.abs_diff(last.y));
    if d_col != 0 && d_row != 0 && d_col != d_row {
        return None;
    }
    let direction = Direction::between(
        last.y.cmp(&first.y) as isize,
        last.x.cmp(&first.x) as isize,
    )?;
    let length = d_col.max(d_row) + 1;

    let path: Vec<Coordinate> = (0..length)
        .map(|i| {
            Coordinate::new(
                step(first.x, direction.d_col, i),
                step(first.y, direction.d_row, i),
            )
        })
        .collect();

    if selection.len() > 2 && selection != path.as_slice() {
        return None;
    }
    Some(path)
}

/// `from` moved `steps` cells along one axis. Never passes the line's end.
fn step(from: usize, delta: i8, steps: usize) -> usize {
    match delta {
        1 => from + steps,
        -1 => from - steps,
        _ => from,
    }
}

/// Check a selection against the grid and word list, reporting why it
/// failed if it did.
pub fn check_selection<S: AsRef<str>>(
    grid: &Grid,
    selection: &[Coordinate],
    words: &[S],
) -> SelectionResult {
    if selection.len() < 2 {
        return SelectionResult::TooFewCells;
    }
    if let Some(&at) = selection.iter().find(|&&at| !grid.contains(at)) {
        return SelectionResult::OutOfBounds { at };
    }

    let path = match selection_path(selection) {
        Some(path) => path,
        None => return SelectionResult::NotStraight,
    };
    if path.len() < MIN_WORD_LENGTH {
        return SelectionResult::TooShort { length: path.len() };
    }

    let letters: String = path.iter().filter_map(|&at| grid.get(at)).collect();
    let reversed: String = letters.chars().rev().collect();

    let lookup = |candidate: &str| {
        words
            .iter()
            .map(AsRef::as_ref)
            .find(|w| w.eq_ignore_ascii_case(candidate))
    };

    match lookup(&letters).or_else(|| lookup(&reversed)) {
        Some(word) => SelectionResult::Match(word.to_string()),
        None => SelectionResult::NoMatch { letters },
    }
}

/// Validate a selection, returning the listed word it spells.
pub fn validate_selection<S: AsRef<str>>(
    grid: &Grid,
    selection: &[Coordinate],
    words: &[S],
) -> Option<String> {
    check_selection(grid, selection, words).into_word()
}

/// Snap a drag endpoint onto the nearest legal line from `start`.
///
/// Perfect diagonals are kept; otherwise the dominant axis wins and the
/// other axis is pinned to the start cell. An endpoint that would fall
/// outside a `size` grid collapses to `start`.
pub fn snap_endpoint(start: Coordinate, current: Coordinate, size: usize) -> Coordinate {
    let d_col = current.x.abs_diff(start.x);
    let d_row = current.y.abs_diff(start.y);

    let snapped = if d_col == d_row {
        current
    } else if d_col > d_row {
        Coordinate::new(current.x, start.y)
    } else {
        Coordinate::new(start.x, current.y)
    };

    if snapped.x < size && snapped.y < size {
        snapped
    } else {
        start
    }
}

/// Tracks the one drag gesture in flight.
///
/// The highlighted cells always form a legal line, because the endpoint is
/// snapped as the pointer moves. A new drag cannot begin until the current
/// one is finished or cancelled.
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    grid_size: usize,
    start: Option<Coordinate>,
    cells: Vec<Coordinate>,
}

impl DragSelection {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Whether a drag is in progress
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Cells currently highlighted
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Start a drag. Ignored (returns false) while another drag is in
    /// flight or if the cell is off the grid.
    pub fn begin(&mut self, at: Coordinate) -> bool {
        if self.is_active() || at.x >= self.grid_size || at.y >= self.grid_size {
            return false;
        }
        self.start = Some(at);
        self.cells = vec![at];
        true
    }

    /// Move the pointer to `at`, re-snapping the highlighted line.
    pub fn extend(&mut self, at: Coordinate) {
        let Some(start) = self.start else {
            return;
        };
        let end = snap_endpoint(start, at, self.grid_size);
        self.cells = selection_path(&[start, end]).unwrap_or_else(|| vec![start]);
    }

    /// End the drag and hand back the selected cells.
    pub fn finish(&mut self) -> Vec<Coordinate> {
        self.start = None;
        std::mem::take(&mut self.cells)
    }

    /// Abandon the drag without producing a selection.
    pub fn cancel(&mut self) {
        self.start = None;
        self.cells.clear();
    }

    /// Cancel any drag and adopt a new grid size (for a new round).
    pub fn reset(&mut self, grid_size: usize) {
        self.cancel();
        self.grid_size = grid_size;
    }
}
