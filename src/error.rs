//! Crate-level error type
//!
//! Only structural problems surface here. Expected gameplay outcomes
//! (a drag that spells nothing, a word found twice, a word that could not
//! be placed) are reported through ordinary return values instead.

use crate::game::cards::CardError;

/// Errors raised by round setup and the card deck.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The grid must have at least one row and one column.
    #[error("invalid grid size {size}, must be greater than zero")]
    InvalidGridSize { size: usize },
    /// The category produced no words, so a round could never complete.
    #[error("category \"{category}\" has no words")]
    EmptyWordSource { category: String },
    /// Every word slot failed to place, leaving nothing to find.
    #[error("no word from category \"{category}\" could be placed on a {grid_size}x{grid_size} grid")]
    NoWordsPlaced { category: String, grid_size: usize },
    /// The operation needs an active round.
    #[error("no round is active")]
    NoActiveRound,
    /// The operation needs a running challenge.
    #[error("no challenge is active")]
    NoActiveChallenge,
    /// Every challenge round has been played.
    #[error("the challenge is already finished")]
    ChallengeFinished,
    /// The current round must be completed before moving on.
    #[error("the current round is not complete")]
    RoundNotComplete,
    /// A card could not be drawn or played.
    #[error(transparent)]
    Card(#[from] CardError),
}
