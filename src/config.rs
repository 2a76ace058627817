//! Tunable game parameters
//!
//! Every field has a default matching the stock game, so an empty TOML
//! document (or no file at all) yields the standard rules:
//!
//! ```toml
//! [placement]
//! max_attempts = 200
//! fill = "frequency"
//!
//! [scoring]
//! base_word_points = 100
//! ```

use crate::game::FillStrategy;
use serde::Deserialize;
use std::path::Path;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Word placement limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Random (position, direction) trials per word variant
    pub max_attempts: usize,
    /// Word variants tried per slot, the original included
    pub max_word_variants: usize,
    /// Preferred maximum length difference for a substitute
    pub similar_length_window: usize,
    /// Substitutes may use at most this fraction of the grid side
    pub max_length_ratio: f64,
    /// Shortest acceptable substitute
    pub min_word_length: usize,
    /// How empty cells are filled once every word is placed
    pub fill: FillStrategy,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            max_word_variants: 3,
            similar_length_window: 2,
            max_length_ratio: 0.8,
            min_word_length: 3,
            fill: FillStrategy::Uniform,
        }
    }
}

/// Per-word scoring parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_word_points: u32,
    /// Floor applied to the final value of every found word
    pub min_word_points: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_word_points: 100,
            min_word_points: 10,
        }
    }
}

/// Power-up card deck parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Maximum cards held in hand
    pub deck_size: usize,
    /// Maximum timed cards in effect at once
    pub max_active: usize,
    /// Seconds between draws
    pub draw_cooldown: u64,
    /// Chance of a free card after each found word
    pub refill_chance: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            deck_size: 3,
            max_active: 2,
            draw_cooldown: 30,
            refill_chance: 0.2,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub placement: PlacementConfig,
    pub scoring: ScoringConfig,
    pub cards: CardConfig,
}

impl GameConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Load configuration from a file if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.placement.max_attempts, 200);
        assert_eq!(config.placement.max_word_variants, 3);
        assert_eq!(config.scoring.min_word_points, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = GameConfig::from_toml_str(
            r#"
            [placement]
            max_attempts = 50
            fill = "frequency"

            [cards]
            deck_size = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.placement.max_attempts, 50);
        assert_eq!(config.placement.fill, FillStrategy::Frequency);
        // Untouched fields keep their defaults
        assert_eq!(config.placement.similar_length_window, 2);
        assert_eq!(config.cards.deck_size, 5);
        assert_eq!(config.cards.max_active, 2);
        assert_eq!(config.scoring.base_word_points, 100);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let result = GameConfig::from_toml_str("[placement]\nmax_attempts = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default("/nonexistent/wordhunt.toml").unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
