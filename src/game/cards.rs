//! Power-up card deck
//!
//! The player holds a small hand of cards dealt at round start. Playing a
//! card turns it into a [`Modifier`]; timed modifiers stay active until
//! they expire, instant ones (hint, wild card) are handed back to the
//! round to resolve. Drawing is rate limited by a cooldown, and finding a
//! word has a chance of adding a card to a short hand.

use super::scoring::Modifier;
use crate::config::CardConfig;
use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

/// Reasons a deck action is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("no card at position {index}")]
    NoSuchCard { index: usize },
    #[error("hand is full ({size} cards)")]
    HandFull { size: usize },
    #[error("draw is cooling down ({remaining}s left)")]
    Cooldown { remaining: u64 },
    #[error("already {max} timed cards in play")]
    TooManyActive { max: usize },
}

/// How often a card turns up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Rarity {
    /// Relative draw weight (higher = more common)
    pub fn weight(self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Uncommon => 5,
            Rarity::Rare => 2,
            Rarity::Epic => 1,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Double points for 30 seconds
    #[strum(to_string = "Double Points")]
    DoublePoints,
    /// Half-speed timer for 20 seconds
    #[strum(to_string = "Time Slow")]
    TimeSlow,
    /// Reveal one unfound word
    #[strum(to_string = "Hint")]
    Hint,
    /// Count one unfound word as found
    #[strum(to_string = "Wild Card")]
    WildCard,
    /// Boosted chain multiplier for 45 seconds
    #[strum(to_string = "Chain Bonus")]
    ChainBonus,
}

static CARD_DISTRIBUTION: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(CardKind::iter().map(|kind| kind.rarity().weight())).expect("valid weights")
});

impl CardKind {
    pub fn rarity(self) -> Rarity {
        match self {
            CardKind::DoublePoints => Rarity::Common,
            CardKind::TimeSlow => Rarity::Rare,
            CardKind::Hint => Rarity::Uncommon,
            CardKind::WildCard => Rarity::Epic,
            CardKind::ChainBonus => Rarity::Uncommon,
        }
    }

    /// Seconds the effect lasts; 0 for instant cards.
    pub fn duration(self) -> u64 {
        match self {
            CardKind::DoublePoints => 30,
            CardKind::TimeSlow => 20,
            CardKind::ChainBonus => 45,
            CardKind::Hint | CardKind::WildCard => 0,
        }
    }

    pub fn is_timed(self) -> bool {
        self.duration() > 0
    }

    /// The modifier this card produces when played at round second `now`.
    pub fn modifier(self, now: u64) -> Modifier {
        let expires_at = now + self.duration();
        match self {
            CardKind::DoublePoints | CardKind::ChainBonus => Modifier::ScoreMultiplier {
                factor: 2.0,
                expires_at,
            },
            CardKind::TimeSlow => Modifier::TimeSlow {
                factor: 0.5,
                expires_at,
            },
            CardKind::Hint => Modifier::Hint,
            CardKind::WildCard => Modifier::WildCard,
        }
    }

    /// Draw a card kind weighted by rarity.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let index = CARD_DISTRIBUTION.sample(rng);
        CardKind::iter().nth(index).unwrap_or(CardKind::DoublePoints)
    }
}

/// A hand of cards plus the timed modifiers currently in play
#[derive(Debug, Clone)]
pub struct CardDeck {
    config: CardConfig,
    hand: Vec<CardKind>,
    active: Vec<Modifier>,
    cooldown: u64,
}

impl CardDeck {
    pub fn new(config: CardConfig) -> Self {
        Self {
            config,
            hand: Vec::new(),
            active: Vec::new(),
            cooldown: 0,
        }
    }

    /// Cards in hand, in the order they were received
    pub fn hand(&self) -> &[CardKind] {
        &self.hand
    }

    /// Timed modifiers in play
    pub fn active(&self) -> &[Modifier] {
        &self.active
    }

    /// Seconds until the next draw is allowed
    pub fn cooldown(&self) -> u64 {
        self.cooldown
    }

    pub fn can_draw(&self) -> bool {
        self.cooldown == 0 && self.hand.len() < self.config.deck_size
    }

    /// Start of round: a fresh full hand, nothing in play, no cooldown.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.hand = (0..self.config.deck_size)
            .map(|_| CardKind::random(rng))
            .collect();
        self.active.clear();
        self.cooldown = 0;
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.hand.clear();
        self.active.clear();
        self.cooldown = 0;
    }

    /// Draw one card into the hand and start the cooldown.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<CardKind, CardError> {
        if self.cooldown > 0 {
            return Err(CardError::Cooldown {
                remaining: self.cooldown,
            });
        }
        if self.hand.len() >= self.config.deck_size {
            return Err(CardError::HandFull {
                size: self.config.deck_size,
            });
        }
        let card = CardKind::random(rng);
        self.hand.push(card);
        self.cooldown = self.config.draw_cooldown;
        tracing::debug!(%card, "drew card");
        Ok(card)
    }

    /// Play the card at `index` at round second `now`.
    ///
    /// Timed cards join the active list, subject to the cap on timed cards
    /// in play. Instant cards are returned for the caller to resolve. A
    /// refused play leaves the hand untouched.
    pub fn play(&mut self, index: usize, now: u64) -> Result<Modifier, CardError> {
        let card = *self.hand.get(index).ok_or(CardError::NoSuchCard { index })?;

        if card.is_timed() {
            self.expire(now);
            if self.active.len() >= self.config.max_active {
                return Err(CardError::TooManyActive {
                    max: self.config.max_active,
                });
            }
        }

        self.hand.remove(index);
        let modifier = card.modifier(now);
        if card.is_timed() {
            self.active.push(modifier);
        }
        tracing::debug!(%card, now, "played card");
        Ok(modifier)
    }

    /// Advance the draw cooldown by `delta` seconds and drop modifiers that
    /// have expired by round second `now`. Returns the expired modifiers.
    pub fn tick(&mut self, delta: u64, now: u64) -> Vec<Modifier> {
        self.cooldown = self.cooldown.saturating_sub(delta);
        self.expire(now)
    }

    /// Chance to top up a short hand after a find.
    pub fn on_word_found<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<CardKind> {
        if self.hand.len() >= self.config.deck_size {
            return None;
        }
        if !rng.random_bool(self.config.refill_chance.clamp(0.0, 1.0)) {
            return None;
        }
        let card = CardKind::random(rng);
        self.hand.push(card);
        Some(card)
    }

    fn expire(&mut self, now: u64) -> Vec<Modifier> {
        let (active, expired): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|m| m.is_active(now));
        self.active = active;
        expired
    }
}
