//! Player statistics and achievements
//!
//! This module provides:
//! - Lifetime totals (games, words, time played, wins)
//! - Per category/difficulty high scores and best times
//! - The first-win-of-the-day check used by scoring
//! - End-of-round achievements

use crate::game::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

/// Days since the Unix epoch (UTC) for the current time.
pub fn epoch_day_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / SECONDS_PER_DAY)
        .unwrap_or(0)
}

/// Key for per category/difficulty records, e.g. `animals-easy`
pub fn stats_key(category: &str, difficulty: Difficulty) -> String {
    format!("{}-{}", category, difficulty)
}

/// The quickest completed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastestWin {
    pub category: String,
    pub difficulty: Difficulty,
    pub seconds: u64,
}

/// One finished (or abandoned) round, as reported to [`UserStats`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub category: String,
    pub difficulty: Difficulty,
    pub score: u32,
    pub words_found: u32,
    pub seconds: u64,
    /// Every word was found
    pub won: bool,
    /// Epoch day the round ended
    pub day: u64,
}

/// What changed when a game was recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub new_high_score: bool,
    pub new_best_time: bool,
    pub first_win_today: bool,
}

/// Player lifetime statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub wins: u32,
    pub high_scores: BTreeMap<String, u32>,
    /// Fastest completion in seconds
    pub best_times: BTreeMap<String, u64>,
    pub games_played: u32,
    pub words_found: u32,
    /// Total seconds played
    pub time_played: u64,
    pub fastest_win: Option<FastestWin>,
    /// Epoch day of the most recent win
    pub last_win_day: Option<u64>,
}

impl UserStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn high_score(&self, category: &str, difficulty: Difficulty) -> u32 {
        self.high_scores
            .get(&stats_key(category, difficulty))
            .copied()
            .unwrap_or(0)
    }

    pub fn best_time(&self, category: &str, difficulty: Difficulty) -> Option<u64> {
        self.best_times.get(&stats_key(category, difficulty)).copied()
    }

    /// True until a win has been recorded on `day`.
    pub fn is_first_win_today(&self, day: u64) -> bool {
        self.last_win_day != Some(day)
    }

    /// Fold one game into the totals.
    pub fn record_game(&mut self, record: &GameRecord) -> RecordOutcome {
        let key = stats_key(&record.category, record.difficulty);
        let mut outcome = RecordOutcome::default();

        self.games_played += 1;
        self.words_found += record.words_found;
        self.time_played += record.seconds;

        let high = self.high_scores.entry(key.clone()).or_insert(0);
        if record.score > *high {
            *high = record.score;
            outcome.new_high_score = true;
        }

        if record.won {
            outcome.first_win_today = self.is_first_win_today(record.day);
            self.wins += 1;
            self.last_win_day = Some(record.day);

            let best = self.best_times.entry(key).or_insert(u64::MAX);
            if record.seconds < *best {
                *best = record.seconds;
                outcome.new_best_time = true;
            }

            let faster = self
                .fastest_win
                .as_ref()
                .map_or(true, |fastest| record.seconds < fastest.seconds);
            if faster {
                self.fastest_win = Some(FastestWin {
                    category: record.category.clone(),
                    difficulty: record.difficulty,
                    seconds: record.seconds,
                });
            }
        }

        outcome
    }

    /// Wins as a percentage of games played
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.games_played) * 100.0
    }

    /// Mean seconds per game, rounded down
    pub fn average_game_time(&self) -> u64 {
        if self.games_played == 0 {
            return 0;
        }
        self.time_played / u64::from(self.games_played)
    }

    /// Total time played, e.g. `1h 2m 5s`, `3m 0s` or `42s`
    pub fn formatted_total_time(&self) -> String {
        let hours = self.time_played / 3600;
        let minutes = (self.time_played % 3600) / 60;
        let seconds = self.time_played % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// A badge earned in a single round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Achievement {
    /// Completed in under a minute
    Speed,
    /// Every attempt hit, with more than five attempts
    Accuracy,
    /// Combo of five or more
    Combo,
    /// Over 10,000 points
    Score,
}

impl Achievement {
    pub fn title(self) -> &'static str {
        match self {
            Achievement::Speed => "Speed Demon",
            Achievement::Accuracy => "Perfect Aim",
            Achievement::Combo => "Combo Master",
            Achievement::Score => "High Roller",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Achievement::Speed => "Complete a game in under 1 minute",
            Achievement::Accuracy => "100% accuracy with more than 5 attempts",
            Achievement::Combo => "Get a 5x combo",
            Achievement::Score => "Score over 10,000 points",
        }
    }
}

/// Round figures the achievement check looks at
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RoundSummary {
    pub seconds: u64,
    pub completed: bool,
    pub found: u32,
    pub attempts: u32,
    pub combo: u32,
    pub score: u32,
}

/// Achievements earned by a round.
pub fn check_achievements(round: &RoundSummary) -> Vec<Achievement> {
    let mut earned = Vec::new();
    if round.completed && round.seconds < 60 {
        earned.push(Achievement::Speed);
    }
    if round.attempts > 5 && round.found == round.attempts {
        earned.push(Achievement::Accuracy);
    }
    if round.combo >= 5 {
        earned.push(Achievement::Combo);
    }
    if round.score > 10_000 {
        earned.push(Achievement::Score);
    }
    earned
}
