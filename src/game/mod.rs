//! Game logic: difficulty tables, grid construction, selection, scoring

pub mod cards;
pub mod categories;
pub mod direction;
pub mod grid;
pub mod placement;
pub mod scoring;
pub mod selection;

use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// English letter frequencies (percentages * 100 for integer weights).
/// Based on standard English text frequency analysis.
const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('A', 820),
    ('B', 150),
    ('C', 280),
    ('D', 430),
    ('E', 1270),
    ('F', 220),
    ('G', 200),
    ('H', 610),
    ('I', 700),
    ('J', 15),
    ('K', 80),
    ('L', 400),
    ('M', 240),
    ('N', 670),
    ('O', 750),
    ('P', 190),
    ('Q', 10),
    ('R', 600),
    ('S', 630),
    ('T', 910),
    ('U', 280),
    ('V', 100),
    ('W', 240),
    ('X', 15),
    ('Y', 200),
    ('Z', 7),
];

static LETTER_DISTRIBUTION: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(LETTER_WEIGHTS.iter().map(|(_, w)| *w)).expect("valid weights")
});

/// How the placement engine fills cells no word occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Every letter equally likely
    #[default]
    Uniform,
    /// Letters weighted by English text frequency
    Frequency,
}

impl FillStrategy {
    /// Draw one filler letter.
    pub fn random_letter<R: Rng + ?Sized>(self, rng: &mut R) -> char {
        match self {
            FillStrategy::Uniform => char::from(b'A' + rng.random_range(0..26u8)),
            FillStrategy::Frequency => LETTER_WEIGHTS[LETTER_DISTRIBUTION.sample(rng)].0,
        }
    }
}

/// Round difficulty. Drives grid size, word count, scoring and the
/// challenge target.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    Baby,
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty name, falling back to medium for unknown names.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Side length of the square grid.
    pub fn grid_size(self) -> usize {
        match self {
            Difficulty::Baby => 8,
            Difficulty::Easy => 8,
            Difficulty::Medium => 10,
            Difficulty::Hard => 12,
        }
    }

    /// Number of words requested from the category per round.
    pub fn word_count(self) -> usize {
        match self {
            Difficulty::Baby => 1,
            Difficulty::Easy => 5,
            Difficulty::Medium => 8,
            Difficulty::Hard => 12,
        }
    }

    /// Cumulative score needed to win a ten-round challenge.
    pub fn target_score(self) -> u32 {
        match self {
            Difficulty::Baby => 3000,
            Difficulty::Easy => 5000,
            Difficulty::Medium => 10000,
            Difficulty::Hard => 15000,
        }
    }

    /// Multiplier applied to every found word.
    pub fn score_multiplier(self) -> f64 {
        match self {
            Difficulty::Baby => 0.5,
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }
}
