//! Ten-round challenge aggregation
//!
//! A challenge plays a fixed number of rounds in one category and
//! difficulty. Round scores accumulate towards a target that depends on
//! the difficulty; success is decided once, after the last round.

use crate::game::Difficulty;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Rounds in every challenge
pub const TOTAL_ROUNDS: u32 = 10;

/// Progress through a challenge. Serializable so a host can persist it
/// between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    pub active: bool,
    /// 1-based round number
    pub current_round: u32,
    pub total_rounds: u32,
    pub target_score: u32,
    pub cumulative_score: u32,
    pub round_scores: Vec<u32>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Unix seconds when the challenge began
    pub started_at: Option<u64>,
    pub completed: bool,
    pub success: bool,
}

impl Default for ChallengeState {
    fn default() -> Self {
        Self {
            active: false,
            current_round: 1,
            total_rounds: TOTAL_ROUNDS,
            target_score: Difficulty::default().target_score(),
            cumulative_score: 0,
            round_scores: Vec::new(),
            category: None,
            difficulty: None,
            started_at: None,
            completed: false,
            success: false,
        }
    }
}

impl ChallengeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh challenge, discarding any previous one.
    pub fn init(&mut self, category: &str, difficulty: Difficulty) {
        *self = Self {
            active: true,
            target_score: difficulty.target_score(),
            category: Some(category.to_string()),
            difficulty: Some(difficulty),
            started_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_secs()),
            ..Self::default()
        };
        info!(category, %difficulty, target = self.target_score, "challenge started");
    }

    /// Record the score of the round just played. After the final round
    /// the challenge is completed and success decided.
    ///
    /// Ignored (returns false) when no challenge is running or it has
    /// already completed.
    pub fn complete_round(&mut self, round_score: u32) -> bool {
        if !self.active || self.completed {
            return false;
        }
        self.round_scores.push(round_score);
        self.cumulative_score = self.cumulative_score.saturating_add(round_score);

        if self.current_round >= self.total_rounds {
            self.completed = true;
            self.success = self.cumulative_score >= self.target_score;
            info!(
                score = self.cumulative_score,
                target = self.target_score,
                success = self.success,
                "challenge completed"
            );
        }
        true
    }

    /// Move to the next round unless the challenge is over.
    pub fn next_round(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.current_round += 1;
        true
    }

    /// Abandon the challenge. Scores are kept for display.
    pub fn exit(&mut self) {
        self.active = false;
    }

    /// Cumulative score as a percentage of the target (may exceed 100).
    pub fn progress(&self) -> f64 {
        if !self.active || self.target_score == 0 {
            return 0.0;
        }
        f64::from(self.cumulative_score) / f64::from(self.target_score) * 100.0
    }

    /// Rounds left including the current one
    pub fn rounds_remaining(&self) -> u32 {
        (self.total_rounds + 1).saturating_sub(self.current_round)
    }
}
