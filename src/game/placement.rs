//! Word placement: fits a word list into a fresh grid.
//!
//! Placement is greedy and randomized. Words are tried longest first; each
//! gets a fixed budget of random (start, direction) trials, and a word that
//! exhausts its budget may be swapped for a similar word from the same
//! category. Words are allowed to cross where their letters agree. Failing
//! to place a word is not an error: the caller gets the reduced list and
//! plays on with it.

use super::direction::Direction;
use super::grid::{Coordinate, Grid};
use crate::config::PlacementConfig;
use crate::error::GameError;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Where a word ended up in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPlacement {
    /// The word as written into the grid
    pub word: String,
    /// Cell holding the first letter
    pub start: Coordinate,
    pub direction: Direction,
    /// The requested word this one stands in for, if it is a substitute
    pub replaces: Option<String>,
}

impl WordPlacement {
    /// Cells covered by the word, first letter first.
    pub fn cells(&self) -> Vec<Coordinate> {
        let len = self.word.chars().count();
        (0..len)
            .map(|i| {
                let x = self.start.x as isize + self.direction.d_col as isize * i as isize;
                let y = self.start.y as isize + self.direction.d_row as isize * i as isize;
                Coordinate::new(x as usize, y as usize)
            })
            .collect()
    }

    /// Cell holding the last letter.
    pub fn end(&self) -> Coordinate {
        self.cells().last().copied().unwrap_or(self.start)
    }
}

/// Result of a placement run.
#[derive(Debug, Clone)]
pub struct Placement {
    /// The finished grid, every cell filled
    pub grid: Grid,
    /// Successfully placed words, in the order of the requested slots
    pub placed: Vec<WordPlacement>,
    /// Requested words whose slot could not be filled
    pub failed: Vec<String>,
}

impl Placement {
    /// The words actually on the grid, in slot order. This is the list a
    /// round must be played with.
    pub fn words(&self) -> Vec<String> {
        self.placed.iter().map(|p| p.word.clone()).collect()
    }

    /// Placements of substitute words.
    pub fn substitutions(&self) -> impl Iterator<Item = &WordPlacement> {
        self.placed.iter().filter(|p| p.replaces.is_some())
    }

    /// Look up where a word was placed.
    pub fn find(&self, word: &str) -> Option<&WordPlacement> {
        self.placed.iter().find(|p| p.word.eq_ignore_ascii_case(word))
    }
}

/// Places words into grids of a fixed size.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    grid_size: usize,
    config: PlacementConfig,
}

/// Cells of a grid under construction; `None` is an unset cell.
struct Draft {
    size: usize,
    cells: Vec<Option<char>>,
}

impl Draft {
    fn new(size: usize) -> Self {
        Draft {
            size,
            cells: vec![None; size * size],
        }
    }

    fn index(&self, at: Coordinate) -> usize {
        at.y * self.size + at.x
    }

    fn can_place(&self, letters: &[char], start: Coordinate, direction: Direction) -> bool {
        letters.iter().enumerate().all(|(i, &letter)| {
            match start.offset(direction, i, self.size) {
                Some(at) => match self.cells[self.index(at)] {
                    None => true,
                    Some(existing) => existing == letter,
                },
                None => false,
            }
        })
    }

    fn write(&mut self, letters: &[char], start: Coordinate, direction: Direction) {
        for (i, &letter) in letters.iter().enumerate() {
            if let Some(at) = start.offset(direction, i, self.size) {
                let idx = self.index(at);
                self.cells[idx] = Some(letter);
            }
        }
    }

    fn fill<R: Rng + ?Sized>(self, fill: super::FillStrategy, rng: &mut R) -> Grid {
        let cells = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| fill.random_letter(rng)))
            .collect();
        Grid::from_cells(self.size, cells)
    }
}

impl PlacementEngine {
    /// Create an engine for grids of side `grid_size`.
    pub fn new(grid_size: usize, config: PlacementConfig) -> Result<Self, GameError> {
        if grid_size == 0 {
            return Err(GameError::InvalidGridSize { size: grid_size });
        }
        Ok(Self { grid_size, config })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Longest word a substitute may have on this grid.
    pub fn max_substitute_length(&self) -> usize {
        (self.grid_size as f64 * self.config.max_length_ratio).floor() as usize
    }

    /// Place `words` into a new grid.
    ///
    /// `pool` is the full category the words came from; substitutes are
    /// drawn from it. Pass an empty pool to disable substitution.
    ///
    /// Every requested word yields exactly one outcome: a placement (of the
    /// word or a substitute) or an entry in `failed`, so
    /// `placed.len() + failed.len() == words.len()`.
    pub fn place_words<R: Rng + ?Sized>(
        &self,
        words: &[String],
        pool: &[String],
        rng: &mut R,
    ) -> Placement {
        let mut draft = Draft::new(self.grid_size);

        // Longest first: long words are hardest to fit once the grid fills.
        let mut order: Vec<usize> = (0..words.len()).collect();
        order.sort_by_key(|&i| Reverse(words[i].chars().count()));

        let mut used: HashSet<String> = words.iter().map(|w| w.to_uppercase()).collect();
        let mut outcomes: Vec<Option<WordPlacement>> = vec![None; words.len()];
        let max_variants = self.config.max_word_variants.max(1);

        for slot in order {
            let original = words[slot].to_uppercase();
            let mut candidate = original.clone();

            for variant in 1..=max_variants {
                if let Some((start, direction)) = self.try_place(&mut draft, &candidate, rng) {
                    debug!(word = %candidate, ?start, ?direction, "placed word");
                    outcomes[slot] = Some(WordPlacement {
                        word: candidate.clone(),
                        start,
                        direction,
                        replaces: (candidate != original).then(|| original.clone()),
                    });
                    break;
                }

                if variant == max_variants {
                    break;
                }
                match self.alternative(&candidate, pool, &used, rng) {
                    Some(alternative) => {
                        debug!(word = %candidate, substitute = %alternative, "substituting word");
                        used.insert(alternative.clone());
                        candidate = alternative;
                    }
                    None => break,
                }
            }

            if outcomes[slot].is_none() {
                warn!(word = %original, grid_size = self.grid_size, "could not place word");
            }
        }

        let mut placed = Vec::new();
        let mut failed = Vec::new();
        for (slot, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some(placement) => placed.push(placement),
                None => failed.push(words[slot].to_uppercase()),
            }
        }

        Placement {
            grid: draft.fill(self.config.fill, rng),
            placed,
            failed,
        }
    }

    /// Up to `max_attempts` random trials for one word. Writes the word on
    /// the first fit.
    fn try_place<R: Rng + ?Sized>(
        &self,
        draft: &mut Draft,
        word: &str,
        rng: &mut R,
    ) -> Option<(Coordinate, Direction)> {
        let letters: Vec<char> = word.chars().collect();
        if letters.is_empty() || letters.len() > self.grid_size {
            // Cannot fit in any direction; spare the attempt budget.
            return None;
        }

        for _ in 0..self.config.max_attempts {
            let start = Coordinate::new(
                rng.random_range(0..self.grid_size),
                rng.random_range(0..self.grid_size),
            );
            let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];

            if draft.can_place(&letters, start, direction) {
                draft.write(&letters, start, direction);
                return Some((start, direction));
            }
        }
        None
    }

    /// Pick a replacement for `word` from the category pool.
    ///
    /// Candidates must be unused and fit the substitute length limits;
    /// words within the similar-length window are preferred.
    fn alternative<R: Rng + ?Sized>(
        &self,
        word: &str,
        pool: &[String],
        used: &HashSet<String>,
        rng: &mut R,
    ) -> Option<String> {
        let max_len = self.max_substitute_length();
        let word_len = word.chars().count();

        let available: Vec<String> = pool
            .iter()
            .map(|w| w.to_uppercase())
            .filter(|w| {
                let len = w.chars().count();
                !used.contains(w) && len >= self.config.min_word_length && len <= max_len
            })
            .collect();

        let similar: Vec<&String> = available
            .iter()
            .filter(|w| w.chars().count().abs_diff(word_len) <= self.config.similar_length_window)
            .collect();

        if similar.is_empty() {
            available.choose(rng).cloned()
        } else {
            similar.choose(rng).map(|w| (*w).clone())
        }
    }
}

/// Place `words` into a new `grid_size` grid with the default limits.
pub fn place_words<R: Rng + ?Sized>(
    words: &[String],
    grid_size: usize,
    pool: &[String],
    rng: &mut R,
) -> Result<Placement, GameError> {
    let engine = PlacementEngine::new(grid_size, PlacementConfig::default())?;
    Ok(engine.place_words(words, pool, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::categories::{BuiltinCategories, CategorySource};
    use crate::game::Difficulty;
    use strum::IntoEnumIterator;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_zero_grid_size_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = place_words(&words(&["CAT"]), 0, &[], &mut rng);
        assert!(matches!(result, Err(GameError::InvalidGridSize { size: 0 })));
    }

    #[test]
    fn test_grids_are_fully_lettered_for_every_difficulty() {
        let categories = BuiltinCategories::new();
        for difficulty in Difficulty::iter() {
            for seed in 0..20 {
                let mut rng = StdRng::seed_from_u64(seed);
                let requested =
                    categories.random_words("animals", difficulty.word_count(), &mut rng);
                let pool = categories.category_words("animals");
                let placement =
                    place_words(&requested, difficulty.grid_size(), &pool, &mut rng).unwrap();

                let grid = &placement.grid;
                assert_eq!(grid.size(), difficulty.grid_size());
                assert_eq!(grid.rows().count(), difficulty.grid_size());
                assert_eq!(grid.cells().len(), difficulty.grid_size().pow(2));
                assert!(grid.cells().iter().all(|c| c.is_ascii_uppercase()));
            }
        }
    }

    #[test]
    fn test_placed_words_are_findable_by_scanning() {
        let categories = BuiltinCategories::new();
        for name in categories.names() {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let requested = categories.random_words(&name, 12, &mut rng);
                let pool = categories.category_words(&name);
                let placement = place_words(&requested, 12, &pool, &mut rng).unwrap();

                for placed in &placement.placed {
                    assert!(
                        placement.grid.contains_word(&placed.word),
                        "{} missing from grid\n{}",
                        placed.word,
                        placement.grid
                    );
                    let recorded = placement
                        .grid
                        .read(placed.start, placed.direction, placed.word.len());
                    assert_eq!(recorded.as_deref(), Some(placed.word.as_str()));
                }
            }
        }
    }

    #[test]
    fn test_accounting_without_substitution() {
        let mut rng = StdRng::seed_from_u64(3);
        let requested = words(&["CAT", "DOG", "HIPPOPOTAMUS", "OWL"]);
        let placement = place_words(&requested, 6, &[], &mut rng).unwrap();

        assert_eq!(placement.placed.len() + placement.failed.len(), requested.len());
        assert_eq!(placement.failed, vec!["HIPPOPOTAMUS".to_string()]);
        assert_eq!(placement.words(), words(&["CAT", "DOG", "OWL"]));
        assert_eq!(placement.substitutions().count(), 0);
    }

    #[test]
    fn test_accounting_with_substitution() {
        let mut rng = StdRng::seed_from_u64(11);
        let requested = words(&["CROCODILES", "EEL"]);
        let pool = words(&["CROCODILES", "EEL", "YAK", "GNU"]);
        let placement = place_words(&requested, 5, &pool, &mut rng).unwrap();

        assert_eq!(placement.placed.len() + placement.failed.len(), requested.len());
        assert!(placement.failed.is_empty());

        // The first slot is filled by a substitute that keeps its position
        let substitute = &placement.placed[0];
        assert_eq!(substitute.replaces.as_deref(), Some("CROCODILES"));
        assert!(["YAK", "GNU"].contains(&substitute.word.as_str()));
        assert_eq!(placement.placed[1].word, "EEL");
        assert!(placement.grid.contains_word(&substitute.word));
    }

    #[test]
    fn test_word_longer_than_grid_always_fails() {
        // Only over-long substitutes are available, so nothing can stand in.
        let pool = words(&["ELEPHANTS", "ANTELOPES"]);
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = place_words(&words(&["GIRAFFES"]), 7, &pool, &mut rng).unwrap();
            assert!(placement.placed.is_empty());
            assert_eq!(placement.failed, words(&["GIRAFFES"]));
        }
    }

    #[test]
    fn test_substitute_respects_length_limit() {
        let pool = words(&["ZEBRAS", "ELK", "YAK"]);
        let engine = PlacementEngine::new(5, PlacementConfig::default()).unwrap();
        assert_eq!(engine.max_substitute_length(), 4);
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = engine.place_words(&words(&["RHINOCEROS"]), &pool, &mut rng);
            let word = &placement.placed[0].word;
            assert!(word == "ELK" || word == "YAK", "unexpected substitute {}", word);
        }
    }

    #[test]
    fn test_substitution_prefers_similar_length() {
        let pool = words(&["ABCD", "ABCDEFGHIJK"]);
        let config = PlacementConfig {
            max_length_ratio: 1.0,
            ..PlacementConfig::default()
        };
        let engine = PlacementEngine::new(12, config).unwrap();
        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = engine.place_words(&words(&["ABCDEFGHIJKLM"]), &pool, &mut rng);
            assert_eq!(placement.placed[0].word, "ABCDEFGHIJK");
        }
    }

    #[test]
    fn test_no_variants_beyond_limit() {
        let config = PlacementConfig {
            max_word_variants: 1,
            ..PlacementConfig::default()
        };
        let engine = PlacementEngine::new(4, config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let placement = engine.place_words(&words(&["MONKEYS"]), &words(&["APE"]), &mut rng);
        assert!(placement.placed.is_empty());
        assert_eq!(placement.failed, words(&["MONKEYS"]));
    }

    #[test]
    fn test_duplicate_words_are_placed_independently() {
        let mut rng = StdRng::seed_from_u64(9);
        let placement = place_words(&words(&["CAT", "CAT"]), 6, &[], &mut rng).unwrap();
        assert_eq!(placement.placed.len(), 2);
        assert!(placement.placed.iter().all(|p| p.word == "CAT"));
    }

    #[test]
    fn test_lowercase_input_is_uppercased() {
        let mut rng = StdRng::seed_from_u64(2);
        let placement = place_words(&words(&["lion"]), 6, &[], &mut rng).unwrap();
        assert_eq!(placement.words(), words(&["LION"]));
        assert!(placement.find("Lion").is_some());
    }

    #[test]
    fn test_crossing_requires_matching_letters() {
        let mut draft = Draft::new(3);
        let cat: Vec<char> = "CAT".chars().collect();
        draft.write(&cat, Coordinate::new(0, 0), Direction::RIGHT);

        let top: Vec<char> = "TOP".chars().collect();
        let dog: Vec<char> = "DOG".chars().collect();
        assert!(draft.can_place(&top, Coordinate::new(2, 0), Direction::DOWN));
        assert!(!draft.can_place(&dog, Coordinate::new(2, 0), Direction::DOWN));
        assert!(!draft.can_place(&top, Coordinate::new(2, 1), Direction::DOWN));
    }

    #[test]
    fn test_seeded_placement_is_deterministic() {
        let requested = words(&["TIGER", "ZEBRA", "WOLF", "FOX", "SHARK"]);
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let a = place_words(&requested, 8, &[], &mut rng1).unwrap();
        let b = place_words(&requested, 8, &[], &mut rng2).unwrap();

        assert_eq!(a.grid, b.grid);
        assert_eq!(a.placed, b.placed);
    }

    #[test]
    fn test_placement_cells_and_end() {
        let placement = WordPlacement {
            word: "OWL".to_string(),
            start: Coordinate::new(2, 2),
            direction: Direction::UP_LEFT,
            replaces: None,
        };
        assert_eq!(
            placement.cells(),
            vec![
                Coordinate::new(2, 2),
                Coordinate::new(1, 1),
                Coordinate::new(0, 0)
            ]
        );
        assert_eq!(placement.end(), Coordinate::new(0, 0));
    }
}
