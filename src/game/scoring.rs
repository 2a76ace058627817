//! Per-word scoring
//!
//! A found word starts from a base value and runs through a fixed chain of
//! stages. Each stage rounds half away from zero before the next one runs,
//! so the order matters:
//!
//! 1. Time bonus for a quick find
//! 2. Combo multiplier while the player keeps finding words quickly
//! 3. Difficulty multiplier
//! 4. Flat bonus when no hints were used this round
//! 5. First-win-of-the-day multiplier
//!
//! Active card modifiers are folded over the result afterwards, and the
//! per-word floor is applied last.

use super::Difficulty;
use serde::{Deserialize, Serialize};

/// Finds faster than this many seconds keep the combo going
pub const COMBO_WINDOW_SECS: u64 = 5;

const COMBO_STEP: f64 = 0.1;
const NO_HINTS_BONUS: f64 = 100.0;
const FIRST_WIN_MULTIPLIER: f64 = 1.2;

/// Inputs to [`score`] for one found word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    /// Seconds since the previous find, or since the round started
    pub time_since_last_word: u64,
    pub difficulty: Difficulty,
    /// Combo count before this word
    pub combo: u32,
    pub hints_used: bool,
    pub first_win_today: bool,
}

/// Bonus points for finding a word quickly.
pub fn time_bonus(seconds: u64) -> u32 {
    match seconds {
        0..=1 => 100,
        2..=4 => 50,
        5..=9 => 25,
        _ => 0,
    }
}

/// Score one word. Pure; modifiers and the floor are applied by
/// [`word_points`].
pub fn score(base: u32, ctx: &ScoreContext) -> u32 {
    let mut points = f64::from(base) + f64::from(time_bonus(ctx.time_since_last_word));

    if ctx.time_since_last_word < COMBO_WINDOW_SECS {
        points = (points * (1.0 + f64::from(ctx.combo) * COMBO_STEP)).round();
    }

    points = (points * ctx.difficulty.score_multiplier()).round();

    if !ctx.hints_used {
        points += NO_HINTS_BONUS;
    }

    if ctx.first_win_today {
        points = (points * FIRST_WIN_MULTIPLIER).round();
    }

    points as u32
}

/// Full per-word value: [`score`], then every active score modifier, then
/// the `min_points` floor.
pub fn word_points(
    base: u32,
    ctx: &ScoreContext,
    modifiers: &[Modifier],
    now: u64,
    min_points: u32,
) -> u32 {
    let scored = score(base, ctx);
    let modified = apply_active_modifiers(u64::from(scored), modifiers, now, ModifierTarget::Score);
    u32::try_from(modified).unwrap_or(u32::MAX).max(min_points)
}

/// The combo count after a find that took `seconds`.
pub fn next_combo(combo: u32, seconds: u64) -> u32 {
    if seconds < COMBO_WINDOW_SECS {
        combo.saturating_add(1)
    } else {
        0
    }
}

/// A temporary effect on play. Timed variants expire at a round-elapsed
/// second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Modifier {
    #[default]
    None,
    /// Multiply word points by `factor`
    ScoreMultiplier { factor: f64, expires_at: u64 },
    /// Run the timer at `factor` speed (0.5 doubles the tick interval)
    TimeSlow { factor: f64, expires_at: u64 },
    /// Reveal one unfound word
    Hint,
    /// Mark one unfound word as found
    WildCard,
}

/// The value a modifier fold is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTarget {
    /// Points for a word
    Score,
    /// Timer tick interval in milliseconds
    TimerInterval,
}

impl Modifier {
    /// Round-elapsed second the effect ends, for timed modifiers.
    pub fn expires_at(&self) -> Option<u64> {
        match self {
            Modifier::ScoreMultiplier { expires_at, .. } | Modifier::TimeSlow { expires_at, .. } => {
                Some(*expires_at)
            }
            _ => None,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.expires_at().is_some()
    }

    /// Whether the modifier still has effect at `now`. Instant modifiers
    /// are never active.
    pub fn is_active(&self, now: u64) -> bool {
        self.expires_at().is_some_and(|end| now < end)
    }

    /// Apply to a single value if this modifier targets it.
    fn apply(&self, value: f64, target: ModifierTarget) -> f64 {
        match (self, target) {
            (Modifier::ScoreMultiplier { factor, .. }, ModifierTarget::Score) => value * factor,
            (Modifier::TimeSlow { factor, .. }, ModifierTarget::TimerInterval) if *factor > 0.0 => {
                value / factor
            }
            _ => value,
        }
    }
}

/// Fold every modifier active at `now` that applies to `target` over
/// `value`, rounding after each step.
pub fn apply_active_modifiers(
    value: u64,
    modifiers: &[Modifier],
    now: u64,
    target: ModifierTarget,
) -> u64 {
    modifiers
        .iter()
        .filter(|m| m.is_active(now))
        .fold(value as f64, |acc, m| m.apply(acc, target).round()) as u64
}
