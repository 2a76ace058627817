//! Round and challenge state machine
//!
//! A round moves `Idle -> Active -> Complete`. Starting a round draws words
//! from a category, places them and starts the clock. Selections are
//! validated against the grid, found words are scored, and finding the
//! last word completes the round: the clock stops, lifetime stats are
//! updated and, inside a challenge, the round score is reported.
//!
//! Collaborators (category source, timer, storage, RNG) are passed in, and
//! observers subscribe to this machine only.

use super::challenge::ChallengeState;
use super::timer::{ManualTimer, Timer, DEFAULT_INTERVAL};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::cards::{CardDeck, CardKind};
use crate::game::categories::CategorySource;
use crate::game::grid::{Coordinate, Grid};
use crate::game::placement::{Placement, PlacementEngine, WordPlacement};
use crate::game::scoring::{
    apply_active_modifiers, next_combo, word_points, Modifier, ModifierTarget, ScoreContext,
};
use crate::game::selection::{validate_selection, DragSelection};
use crate::game::Difficulty;
use crate::stats::{
    check_achievements, epoch_day_now, Achievement, GameRecord, RoundSummary, UserStats,
};
use crate::storage::{Persistence, KEY_CHALLENGE, KEY_USER_STATS};
use rand::prelude::*;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    Active,
    Complete,
}

/// Result of reporting a word as found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordOutcome {
    /// Newly found; `round_complete` is set by the last word
    Found { points: u32, round_complete: bool },
    /// Already found this round; nothing changed
    Duplicate,
    /// Not one of this round's words
    NotInList,
    /// No round is being played
    Inactive,
}

/// Notifications sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    RoundStarted {
        category: String,
        difficulty: Difficulty,
        words: Vec<String>,
        failed: Vec<String>,
    },
    WordFound {
        word: String,
        points: u32,
        score: u32,
    },
    RoundCompleted {
        score: u32,
        seconds: u64,
        achievements: Vec<Achievement>,
    },
    ChallengeRoundCompleted {
        round: u32,
        cumulative_score: u32,
    },
    ChallengeCompleted {
        success: bool,
        cumulative_score: u32,
    },
    HintRevealed {
        word: String,
    },
    CardDrawn(CardKind),
    CardPlayed(Modifier),
    ModifierExpired(Modifier),
    Paused,
    Resumed,
    RoundLeft,
}

/// Round progress for display
#[derive(Debug, Clone, PartialEq)]
pub struct RoundProgress {
    pub found: usize,
    pub total: usize,
    /// Found words as a rounded percentage
    pub percent: u32,
    /// Found words per attempt as a rounded percentage; 100 before any attempt
    pub accuracy: u32,
    /// Words still to find, in list order
    pub remaining: Vec<String>,
}

type Observer = Box<dyn FnMut(&RoundEvent)>;

/// Drives rounds and challenges.
pub struct RoundStateMachine<C: CategorySource, T: Timer = ManualTimer> {
    config: GameConfig,
    categories: C,
    timer: T,
    persistence: Persistence,
    rng: StdRng,
    phase: RoundPhase,
    category: String,
    difficulty: Difficulty,
    placement: Option<Placement>,
    /// Words on the grid, in slot order
    words: Vec<String>,
    /// Found words in the order they were found
    found: Vec<String>,
    score: u32,
    combo: u32,
    best_combo: u32,
    last_word_at: u64,
    attempts: u32,
    hints_used: bool,
    deck: CardDeck,
    drag: DragSelection,
    challenge: ChallengeState,
    stats: UserStats,
    /// Fixed epoch day, for reproducible first-win checks
    day: Option<u64>,
    observers: Vec<Observer>,
}

impl<C: CategorySource> RoundStateMachine<C, ManualTimer> {
    /// A machine with default config, a manual timer and no disk storage.
    pub fn in_memory(categories: C) -> Self {
        Self::new(
            GameConfig::default(),
            categories,
            ManualTimer::new(),
            Persistence::in_memory(),
        )
    }
}

impl<C: CategorySource, T: Timer> RoundStateMachine<C, T> {
    /// Create a machine. Saved stats and challenge progress are loaded
    /// from `persistence`.
    pub fn new(config: GameConfig, categories: C, timer: T, mut persistence: Persistence) -> Self {
        let stats = persistence.load(KEY_USER_STATS, UserStats::default());
        let challenge = persistence.load(KEY_CHALLENGE, ChallengeState::default());
        let deck = CardDeck::new(config.cards.clone());

        Self {
            config,
            categories,
            timer,
            persistence,
            rng: StdRng::from_rng(&mut rand::rng()),
            phase: RoundPhase::Idle,
            category: String::new(),
            difficulty: Difficulty::default(),
            placement: None,
            words: Vec::new(),
            found: Vec::new(),
            score: 0,
            combo: 0,
            best_combo: 0,
            last_word_at: 0,
            attempts: 0,
            hints_used: false,
            deck,
            drag: DragSelection::default(),
            challenge,
            stats,
            day: None,
            observers: Vec::new(),
        }
    }

    /// Use a seeded RNG so grids and cards are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Pin the calendar day used for first-win-of-the-day checks.
    pub fn with_day(mut self, day: u64) -> Self {
        self.day = Some(day);
        self
    }

    /// Register a callback for every [`RoundEvent`].
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&RoundEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    // === Round lifecycle ===

    /// Start (or restart) a round.
    ///
    /// On error the machine is left exactly as it was.
    #[instrument(skip(self))]
    pub fn start_round(&mut self, category: &str, difficulty: Difficulty) -> Result<(), GameError> {
        let requested =
            self.categories
                .random_words(category, difficulty.word_count(), &mut self.rng);
        if requested.is_empty() {
            return Err(GameError::EmptyWordSource {
                category: category.to_string(),
            });
        }

        let pool = self.categories.category_words(category);
        let engine = PlacementEngine::new(difficulty.grid_size(), self.config.placement.clone())?;
        let placement = engine.place_words(&requested, &pool, &mut self.rng);
        if placement.placed.is_empty() {
            return Err(GameError::NoWordsPlaced {
                category: category.to_string(),
                grid_size: engine.grid_size(),
            });
        }

        self.category = category.to_string();
        self.difficulty = difficulty;
        self.words = placement.words();
        self.found.clear();
        self.score = 0;
        self.combo = 0;
        self.best_combo = 0;
        self.last_word_at = 0;
        self.attempts = 0;
        self.hints_used = false;
        self.deck.deal(&mut self.rng);
        self.drag.reset(engine.grid_size());

        self.timer.reset();
        self.timer.set_interval(DEFAULT_INTERVAL);
        self.timer.start();
        self.phase = RoundPhase::Active;

        let failed = placement.failed.clone();
        self.placement = Some(placement);

        info!(words = self.words.len(), failed = failed.len(), "round started");
        self.emit(RoundEvent::RoundStarted {
            category: self.category.clone(),
            difficulty,
            words: self.words.clone(),
            failed,
        });
        Ok(())
    }

    /// Stop the clock without losing elapsed time.
    pub fn pause(&mut self) -> bool {
        if self.phase != RoundPhase::Active || !self.timer.is_running() {
            return false;
        }
        self.timer.stop();
        self.drag.cancel();
        self.emit(RoundEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != RoundPhase::Active || self.timer.is_running() {
            return false;
        }
        self.timer.start();
        self.emit(RoundEvent::Resumed);
        true
    }

    /// Abandon the round and return to idle. Nothing is recorded.
    pub fn leave_round(&mut self) {
        if self.phase == RoundPhase::Idle {
            return;
        }
        self.timer.stop();
        self.drag.cancel();
        self.deck.clear();
        self.phase = RoundPhase::Idle;
        info!(category = %self.category, "left round");
        self.emit(RoundEvent::RoundLeft);
    }

    /// Feed host time to the clock. Card cooldowns and modifier expiry
    /// advance with each whole game second. Returns the seconds counted.
    pub fn tick(&mut self, delta: Duration) -> u64 {
        if self.phase != RoundPhase::Active {
            return 0;
        }
        let seconds = self.timer.advance(delta);
        if seconds > 0 {
            let now = self.timer.elapsed_seconds();
            for modifier in self.deck.tick(seconds, now) {
                debug!(?modifier, "modifier expired");
                self.emit(RoundEvent::ModifierExpired(modifier));
            }
            self.refresh_timer_interval();
        }
        seconds
    }

    // === Finding words ===

    /// Report a word as found.
    pub fn word_found(&mut self, word: &str) -> WordOutcome {
        if self.phase != RoundPhase::Active {
            return WordOutcome::Inactive;
        }
        let Some(canonical) = self
            .words
            .iter()
            .find(|w| w.eq_ignore_ascii_case(word))
            .cloned()
        else {
            return WordOutcome::NotInList;
        };
        if self.found.contains(&canonical) {
            return WordOutcome::Duplicate;
        }

        let now = self.timer.elapsed_seconds();
        let since = now.saturating_sub(self.last_word_at);
        let context = ScoreContext {
            time_since_last_word: since,
            difficulty: self.difficulty,
            combo: self.combo,
            hints_used: self.hints_used,
            first_win_today: self.stats.is_first_win_today(self.today()),
        };
        let points = word_points(
            self.config.scoring.base_word_points,
            &context,
            self.deck.active(),
            now,
            self.config.scoring.min_word_points,
        );

        self.score = self.score.saturating_add(points);
        self.combo = next_combo(self.combo, since);
        self.best_combo = self.best_combo.max(self.combo);
        self.last_word_at = now;
        self.found.push(canonical.clone());

        debug!(word = %canonical, points, combo = self.combo, "word found");
        self.emit(RoundEvent::WordFound {
            word: canonical,
            points,
            score: self.score,
        });

        if let Some(card) = self.deck.on_word_found(&mut self.rng) {
            self.emit(RoundEvent::CardDrawn(card));
        }

        let round_complete = self.found.len() == self.words.len();
        if round_complete {
            self.complete_round();
        }
        WordOutcome::Found {
            points,
            round_complete,
        }
    }

    /// Check a finished selection and score it if it spells a listed word.
    /// Every selection made during an active round counts as an attempt.
    pub fn submit_selection(&mut self, selection: &[Coordinate]) -> WordOutcome {
        if self.phase != RoundPhase::Active {
            return WordOutcome::Inactive;
        }
        self.attempts += 1;

        let matched = self
            .placement
            .as_ref()
            .and_then(|p| validate_selection(&p.grid, selection, &self.words));
        match matched {
            Some(word) => self.word_found(&word),
            None => WordOutcome::NotInList,
        }
    }

    /// Start dragging at `at`. Ignored outside an active, running round or
    /// while another drag is in flight.
    pub fn begin_drag(&mut self, at: Coordinate) -> bool {
        if self.phase != RoundPhase::Active || !self.timer.is_running() {
            return false;
        }
        self.drag.begin(at)
    }

    pub fn drag_to(&mut self, at: Coordinate) {
        self.drag.extend(at);
    }

    /// Release the drag and submit the highlighted cells.
    pub fn end_drag(&mut self) -> WordOutcome {
        if !self.drag.is_active() {
            return WordOutcome::Inactive;
        }
        let selection = self.drag.finish();
        self.submit_selection(&selection)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Reveal where an unfound word is. Marks hints as used for the rest
    /// of the round.
    pub fn use_hint(&mut self) -> Option<WordPlacement> {
        if self.phase != RoundPhase::Active {
            return None;
        }
        let placement = self.random_unfound()?.clone();
        self.hints_used = true;
        info!(word = %placement.word, "hint revealed");
        self.emit(RoundEvent::HintRevealed {
            word: placement.word.clone(),
        });
        Some(placement)
    }

    // === Cards ===

    /// Draw a card into the hand.
    pub fn draw_card(&mut self) -> Result<CardKind, GameError> {
        if self.phase != RoundPhase::Active {
            return Err(GameError::NoActiveRound);
        }
        let card = self.deck.draw(&mut self.rng)?;
        self.emit(RoundEvent::CardDrawn(card));
        Ok(card)
    }

    /// Play the card at `index` in the hand. Hint and wild cards resolve
    /// immediately; timed cards stay in effect until they expire.
    pub fn play_card(&mut self, index: usize) -> Result<Modifier, GameError> {
        if self.phase != RoundPhase::Active {
            return Err(GameError::NoActiveRound);
        }
        let now = self.timer.elapsed_seconds();
        let modifier = self.deck.play(index, now)?;
        self.emit(RoundEvent::CardPlayed(modifier));

        match modifier {
            Modifier::Hint => {
                self.use_hint();
            }
            Modifier::WildCard => {
                if let Some(word) = self.random_unfound().map(|p| p.word.clone()) {
                    self.word_found(&word);
                }
            }
            Modifier::TimeSlow { .. } => self.refresh_timer_interval(),
            Modifier::ScoreMultiplier { .. } | Modifier::None => {}
        }
        Ok(modifier)
    }

    // === Challenges ===

    /// Start a ten-round challenge with its first round.
    #[instrument(skip(self))]
    pub fn start_challenge(&mut self, category: &str, difficulty: Difficulty) -> Result<(), GameError> {
        self.start_round(category, difficulty)?;
        self.challenge.init(category, difficulty);
        self.persistence.save(KEY_CHALLENGE, &self.challenge);
        Ok(())
    }

    /// Advance the challenge and start its next round. The current round
    /// must have been completed and scored first.
    #[instrument(skip(self))]
    pub fn next_challenge_round(&mut self) -> Result<(), GameError> {
        if !self.challenge.active {
            return Err(GameError::NoActiveChallenge);
        }
        if self.challenge.completed {
            return Err(GameError::ChallengeFinished);
        }
        if self.phase != RoundPhase::Complete {
            return Err(GameError::RoundNotComplete);
        }
        let category = self.challenge.category.clone().unwrap_or_default();
        let difficulty = self.challenge.difficulty.unwrap_or_default();

        self.start_round(&category, difficulty)?;
        self.challenge.next_round();
        self.persistence.save(KEY_CHALLENGE, &self.challenge);
        info!(round = self.challenge.current_round, "challenge round started");
        Ok(())
    }

    /// Abandon the challenge and any round in progress.
    pub fn exit_challenge(&mut self) {
        self.challenge.exit();
        self.persistence.save(KEY_CHALLENGE, &self.challenge);
        self.leave_round();
    }

    // === Accessors ===

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.placement.as_ref().map(|p| &p.grid)
    }

    /// Where each word sits in the grid
    pub fn placements(&self) -> &[WordPlacement] {
        self.placement
            .as_ref()
            .map(|p| p.placed.as_slice())
            .unwrap_or_default()
    }

    /// Requested words that could not be placed
    pub fn failed_words(&self) -> &[String] {
        self.placement
            .as_ref()
            .map(|p| p.failed.as_slice())
            .unwrap_or_default()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn found_words(&self) -> &[String] {
        &self.found
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|w| w.eq_ignore_ascii_case(word))
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn hints_used(&self) -> bool {
        self.hints_used
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.timer.elapsed_seconds()
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RoundPhase::Active && !self.timer.is_running()
    }

    /// Cells highlighted by the drag in flight
    pub fn drag_cells(&self) -> &[Coordinate] {
        self.drag.cells()
    }

    pub fn deck(&self) -> &CardDeck {
        &self.deck
    }

    pub fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn progress(&self) -> RoundProgress {
        let found = self.found.len();
        let total = self.words.len();
        let percent = if total == 0 {
            0
        } else {
            (found as f64 / total as f64 * 100.0).round() as u32
        };
        let accuracy = if self.attempts == 0 {
            100
        } else {
            (found as f64 / f64::from(self.attempts) * 100.0).round() as u32
        };
        RoundProgress {
            found,
            total,
            percent,
            accuracy,
            remaining: self
                .words
                .iter()
                .filter(|w| !self.found.contains(w))
                .cloned()
                .collect(),
        }
    }

    // === Internals ===

    fn complete_round(&mut self) {
        self.timer.stop();
        self.drag.cancel();
        self.phase = RoundPhase::Complete;

        let seconds = self.timer.elapsed_seconds();
        let record = GameRecord {
            category: self.category.clone(),
            difficulty: self.difficulty,
            score: self.score,
            words_found: self.found.len() as u32,
            seconds,
            won: true,
            day: self.today(),
        };
        let outcome = self.stats.record_game(&record);
        self.persistence.save(KEY_USER_STATS, &self.stats);

        let achievements = check_achievements(&RoundSummary {
            seconds,
            completed: true,
            found: self.found.len() as u32,
            attempts: self.attempts,
            combo: self.best_combo,
            score: self.score,
        });
        info!(
            score = self.score,
            seconds,
            new_high_score = outcome.new_high_score,
            "round complete"
        );
        self.emit(RoundEvent::RoundCompleted {
            score: self.score,
            seconds,
            achievements,
        });

        if self.challenge.complete_round(self.score) {
            self.persistence.save(KEY_CHALLENGE, &self.challenge);
            self.emit(RoundEvent::ChallengeRoundCompleted {
                round: self.challenge.current_round,
                cumulative_score: self.challenge.cumulative_score,
            });
            if self.challenge.completed {
                self.emit(RoundEvent::ChallengeCompleted {
                    success: self.challenge.success,
                    cumulative_score: self.challenge.cumulative_score,
                });
            }
        }
    }

    fn random_unfound(&mut self) -> Option<&WordPlacement> {
        let placement = self.placement.as_ref()?;
        let unfound: Vec<&WordPlacement> = placement
            .placed
            .iter()
            .filter(|p| !self.found.contains(&p.word))
            .collect();
        unfound.choose(&mut self.rng).copied()
    }

    /// Re-derive the tick interval from the time modifiers in play.
    fn refresh_timer_interval(&mut self) {
        let base = DEFAULT_INTERVAL.as_millis() as u64;
        let now = self.timer.elapsed_seconds();
        let millis = apply_active_modifiers(base, self.deck.active(), now, ModifierTarget::TimerInterval);
        self.timer.set_interval(Duration::from_millis(millis));
    }

    fn today(&self) -> u64 {
        self.day.unwrap_or_else(epoch_day_now)
    }

    fn emit(&mut self, event: RoundEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
    }
}

impl<C: CategorySource, T: Timer> fmt::Debug for RoundStateMachine<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundStateMachine")
            .field("phase", &self.phase)
            .field("category", &self.category)
            .field("difficulty", &self.difficulty)
            .field("words", &self.words)
            .field("found", &self.found)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::categories::{BuiltinCategories, CustomCategories};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn categories() -> CustomCategories {
        CustomCategories::new()
            .with("pets", ["CAT"])
            .with("birds", ["OWL", "HAWK", "WREN", "DOVE", "CROW"])
            .with("empty", [])
            .with("giants", ["ABCDEFGHIJ", "KLMNOPQRST"])
    }

    fn machine() -> RoundStateMachine<CustomCategories> {
        RoundStateMachine::in_memory(categories())
            .with_seed(7)
            .with_day(20_000)
    }

    /// Select a placed word from its first cell to its last.
    fn select(machine: &mut RoundStateMachine<CustomCategories>, word: &str) -> WordOutcome {
        let placement = machine
            .placements()
            .iter()
            .find(|p| p.word == word)
            .cloned()
            .unwrap();
        machine.submit_selection(&[placement.start, placement.end()])
    }

    #[test]
    fn test_baby_round_completes_with_one_word() {
        let mut machine = machine();
        assert_eq!(machine.phase(), RoundPhase::Idle);

        machine.start_round("birds", Difficulty::Baby).unwrap();
        assert_eq!(machine.phase(), RoundPhase::Active);
        assert_eq!(machine.words().len(), 1);
        assert!(machine.failed_words().is_empty());
        assert_eq!(machine.grid().unwrap().size(), 8);

        let word = machine.words()[0].clone();
        assert!(["OWL", "HAWK", "WREN", "DOVE", "CROW"].contains(&word.as_str()));
        assert!(machine.grid().unwrap().contains_word(&word));

        let outcome = select(&mut machine, &word);
        assert!(matches!(
            outcome,
            WordOutcome::Found {
                round_complete: true,
                ..
            }
        ));
        assert_eq!(machine.phase(), RoundPhase::Complete);
        assert!(machine.score() > 0);
        assert_eq!(machine.stats().games_played, 1);
        assert_eq!(machine.stats().wins, 1);
    }

    #[test]
    fn test_medium_round_uses_small_category_as_is() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Medium).unwrap();

        assert_eq!(machine.grid().unwrap().size(), 10);
        assert_eq!(machine.words().len() + machine.failed_words().len(), 5);
        assert_eq!(machine.words().len(), 5);
        for word in machine.words() {
            assert!(machine.grid().unwrap().contains_word(word), "{} missing", word);
        }
    }

    #[test]
    fn test_builtin_round_every_word_is_in_grid() {
        let mut machine = RoundStateMachine::in_memory(BuiltinCategories::new()).with_seed(11);
        machine.start_round("animals", Difficulty::Hard).unwrap();
        assert_eq!(machine.words().len() + machine.failed_words().len(), 12);
        let grid = machine.grid().unwrap();
        for word in machine.words() {
            assert!(grid.contains_word(word), "{} missing", word);
        }
    }

    #[test]
    fn test_empty_category_is_an_error() {
        let mut machine = machine();
        let result = machine.start_round("empty", Difficulty::Easy);
        assert!(matches!(result, Err(GameError::EmptyWordSource { .. })));
        let result = machine.start_round("unknown", Difficulty::Easy);
        assert!(matches!(result, Err(GameError::EmptyWordSource { .. })));
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_unplaceable_words_are_an_error() {
        let mut machine = machine();
        let result = machine.start_round("giants", Difficulty::Easy);
        assert!(matches!(
            result,
            Err(GameError::NoWordsPlaced { grid_size: 8, .. })
        ));
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_failed_start_keeps_current_round() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        assert!(machine.start_round("empty", Difficulty::Easy).is_err());
        assert_eq!(machine.phase(), RoundPhase::Active);
        assert_eq!(machine.category(), "birds");
    }

    #[test]
    fn test_duplicate_is_rejected_without_side_effects() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        let word = machine.words()[0].clone();

        assert!(matches!(machine.word_found(&word), WordOutcome::Found { .. }));
        let score = machine.score();

        for _ in 0..3 {
            assert_eq!(machine.word_found(&word), WordOutcome::Duplicate);
            assert_eq!(machine.word_found(&word.to_lowercase()), WordOutcome::Duplicate);
        }
        assert_eq!(machine.score(), score);
        assert_eq!(machine.found_words().len(), 1);
    }

    #[test]
    fn test_not_in_list_and_inactive() {
        let mut machine = machine();
        assert_eq!(machine.word_found("OWL"), WordOutcome::Inactive);

        machine.start_round("birds", Difficulty::Easy).unwrap();
        assert_eq!(machine.word_found("PARROT"), WordOutcome::NotInList);
        assert_eq!(machine.score(), 0);
    }

    #[test]
    fn test_scoring_uses_combo_before_the_word() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        machine.tick(Duration::from_secs(1));
        let words = machine.words().to_vec();

        // 1s: (100 + 100) x1.0 combo, +100 no hints, x1.2 first win today
        assert_eq!(
            machine.word_found(&words[0]),
            WordOutcome::Found {
                points: 360,
                round_complete: false
            }
        );
        assert_eq!(machine.combo(), 1);

        // 0s later: 200 x1.1 = 220, +100, x1.2
        assert_eq!(
            machine.word_found(&words[1]),
            WordOutcome::Found {
                points: 384,
                round_complete: false
            }
        );
        assert_eq!(machine.combo(), 2);

        // A slow find resets the combo
        machine.tick(Duration::from_secs(12));
        machine.word_found(&words[2]);
        assert_eq!(machine.combo(), 0);
    }

    #[test]
    fn test_hint_disables_no_hint_bonus() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        machine.tick(Duration::from_secs(30));

        let hint = machine.use_hint().unwrap();
        assert!(machine.hints_used());
        assert!(machine.words().contains(&hint.word));

        // 30s: 100, x1 easy, no bonus, x1.2
        assert_eq!(
            machine.word_found(&hint.word),
            WordOutcome::Found {
                points: 120,
                round_complete: false
            }
        );
    }

    #[test]
    fn test_submit_selection_counts_attempts() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        let word = machine.words()[0].clone();

        let miss = machine.submit_selection(&[Coordinate::new(0, 0), Coordinate::new(1, 2)]);
        assert_eq!(miss, WordOutcome::NotInList);
        assert!(matches!(select(&mut machine, &word), WordOutcome::Found { .. }));

        let progress = machine.progress();
        assert_eq!(machine.attempts(), 2);
        assert_eq!(progress.found, 1);
        assert_eq!(progress.total, 5);
        assert_eq!(progress.percent, 20);
        assert_eq!(progress.accuracy, 50);
        assert_eq!(progress.remaining.len(), 4);
        assert!(!progress.remaining.contains(&word));
    }

    #[test]
    fn test_drag_submits_selection() {
        let mut machine = machine();
        machine.start_round("pets", Difficulty::Baby).unwrap();
        let placement = machine.placements()[0].clone();

        assert!(machine.begin_drag(placement.start));
        machine.drag_to(placement.end());
        assert_eq!(machine.drag_cells(), placement.cells().as_slice());
        assert!(matches!(machine.end_drag(), WordOutcome::Found { .. }));
        assert_eq!(machine.end_drag(), WordOutcome::Inactive);
    }

    #[test]
    fn test_pause_and_resume_keep_elapsed_time() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        machine.tick(Duration::from_secs(3));

        assert!(machine.pause());
        assert!(machine.is_paused());
        assert!(!machine.pause());
        machine.tick(Duration::from_secs(5));
        assert_eq!(machine.elapsed_seconds(), 3);
        assert!(!machine.begin_drag(Coordinate::new(0, 0)));

        assert!(machine.resume());
        machine.tick(Duration::from_secs(1));
        assert_eq!(machine.elapsed_seconds(), 4);
    }

    #[test]
    fn test_leave_round_returns_to_idle() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        machine.begin_drag(Coordinate::new(0, 0));
        machine.leave_round();

        assert_eq!(machine.phase(), RoundPhase::Idle);
        assert!(machine.drag_cells().is_empty());
        assert_eq!(machine.word_found("OWL"), WordOutcome::Inactive);
        assert_eq!(machine.stats().games_played, 0);
    }

    #[test]
    fn test_restart_resets_round_state() {
        let mut machine = machine();
        machine.start_round("birds", Difficulty::Easy).unwrap();
        let word = machine.words()[0].clone();
        machine.word_found(&word);
        machine.tick(Duration::from_secs(4));

        machine.start_round("birds", Difficulty::Easy).unwrap();
        assert!(machine.found_words().is_empty());
        assert_eq!(machine.score(), 0);
        assert_eq!(machine.combo(), 0);
        assert_eq!(machine.elapsed_seconds(), 0);
        assert_eq!(machine.deck().hand().len(), 3);
    }

    #[test]
    fn test_completion_saves_stats() {
        let mut machine = machine();
        machine.start_round("pets", Difficulty::Baby).unwrap();
        machine.word_found("cat");

        let saved: UserStats = machine.persistence.load(KEY_USER_STATS, UserStats::default());
        assert_eq!(saved.games_played, 1);
        assert_eq!(saved.high_score("pets", Difficulty::Baby), machine.score());
    }

    #[test]
    fn test_challenge_rounds_accumulate() {
        let mut machine = machine();
        machine.start_challenge("pets", Difficulty::Baby).unwrap();
        assert!(machine.challenge().active);
        assert_eq!(machine.challenge().target_score, 3000);

        machine.word_found("CAT");
        let first = machine.score();
        assert_eq!(machine.challenge().round_scores, vec![first]);

        machine.next_challenge_round().unwrap();
        assert_eq!(machine.challenge().current_round, 2);
        assert_eq!(machine.phase(), RoundPhase::Active);

        machine.word_found("CAT");
        assert_eq!(machine.challenge().cumulative_score, first + machine.score());
    }

    #[test]
    fn test_full_challenge_reaches_a_verdict() {
        let mut machine = machine();
        machine.start_challenge("pets", Difficulty::Baby).unwrap();
        machine.word_found("CAT");
        for _ in 1..10 {
            machine.next_challenge_round().unwrap();
            machine.word_found("CAT");
        }
        let challenge = machine.challenge();
        assert!(challenge.completed);
        assert_eq!(challenge.round_scores.len(), 10);
        assert_eq!(
            challenge.success,
            challenge.cumulative_score >= challenge.target_score
        );
    }

    #[test]
    fn test_finished_challenge_does_not_start_another_round() {
        let mut machine = machine();
        machine.start_challenge("pets", Difficulty::Baby).unwrap();
        machine.word_found("CAT");
        for _ in 1..10 {
            machine.next_challenge_round().unwrap();
            machine.word_found("CAT");
        }
        assert!(machine.challenge().completed);

        assert!(matches!(
            machine.next_challenge_round(),
            Err(GameError::ChallengeFinished)
        ));
        assert_eq!(machine.phase(), RoundPhase::Complete);
        assert_eq!(machine.challenge().current_round, 10);
        assert_eq!(machine.challenge().round_scores.len(), 10);
    }

    #[test]
    fn test_unfinished_round_blocks_next_challenge_round() {
        let mut machine = machine();
        machine.start_challenge("pets", Difficulty::Baby).unwrap();

        for _ in 0..9 {
            assert!(matches!(
                machine.next_challenge_round(),
                Err(GameError::RoundNotComplete)
            ));
        }
        assert_eq!(machine.challenge().current_round, 1);
        assert_eq!(machine.phase(), RoundPhase::Active);

        machine.word_found("CAT");
        let challenge = machine.challenge();
        assert!(!challenge.completed);
        assert_eq!(challenge.round_scores.len(), 1);

        machine.next_challenge_round().unwrap();
        assert_eq!(machine.challenge().current_round, 2);
    }

    #[test]
    fn test_exit_challenge() {
        let mut machine = machine();
        assert!(matches!(
            machine.next_challenge_round(),
            Err(GameError::NoActiveChallenge)
        ));
        machine.start_challenge("birds", Difficulty::Easy).unwrap();
        machine.exit_challenge();
        assert!(!machine.challenge().active);
        assert_eq!(machine.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_observers_receive_events() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut machine = machine();
        machine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        machine.start_round("pets", Difficulty::Baby).unwrap();
        machine.word_found("CAT");

        let events = events.borrow();
        assert!(matches!(events[0], RoundEvent::RoundStarted { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, RoundEvent::WordFound { word, .. } if word == "CAT")));
        assert!(matches!(
            events.last(),
            Some(RoundEvent::RoundCompleted { .. })
        ));
    }

    #[test]
    fn test_cards_require_active_round() {
        let mut config = GameConfig::default();
        config.cards.refill_chance = 0.0;
        let mut machine = RoundStateMachine::new(
            config,
            categories(),
            ManualTimer::new(),
            Persistence::in_memory(),
        )
        .with_seed(7);
        assert!(matches!(machine.play_card(0), Err(GameError::NoActiveRound)));

        machine.start_round("birds", Difficulty::Easy).unwrap();
        assert_eq!(machine.deck().hand().len(), 3);
        assert!(matches!(
            machine.draw_card(),
            Err(GameError::Card(crate::game::cards::CardError::HandFull { .. }))
        ));
        machine.play_card(0).unwrap();
        assert_eq!(machine.deck().hand().len(), 2);
    }
}
