//! Word search game core
//!
//! Builds letter grids with hidden words, validates the player's drag
//! selections against them, scores finds and tracks rounds, ten-round
//! challenges and lifetime stats. Rendering and input capture belong to
//! the host: it passes grid coordinates and elapsed time in and reads
//! grids, scores and progress back.
//!
//! ```no_run
//! use wordhunt::{BuiltinCategories, Difficulty, RoundStateMachine};
//!
//! let mut round = RoundStateMachine::in_memory(BuiltinCategories::new());
//! round.start_round("animals", Difficulty::Easy)?;
//! println!("{}", round.grid().unwrap());
//! # Ok::<(), wordhunt::GameError>(())
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod stats;
pub mod storage;

pub use app::{RoundEvent, RoundPhase, RoundStateMachine, WordOutcome};
pub use config::GameConfig;
pub use error::GameError;
pub use game::categories::{BuiltinCategories, CategorySource, CustomCategories};
pub use game::grid::{Coordinate, Grid};
pub use game::placement::{place_words, Placement, WordPlacement};
pub use game::scoring::{score, ScoreContext};
pub use game::selection::validate_selection;
pub use game::Difficulty;
