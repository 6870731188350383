use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::types::GameMode;

/// Scoring weights for the bot. The defaults are hand-picked, not tuned; every
/// term can be overridden from config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotWeights {
    /// Per reachable cell found by the flood fill. Should dominate the sum.
    pub space: i64,
    pub wall_distance: i64,
    /// Added to the current heading while its space is near-maximal.
    pub straight_bonus: i64,
    /// "Near-maximal": at least this fraction of the best candidate's space.
    pub straight_space_ratio: f64,
    pub lookahead: i64,
    pub lookahead_depth: usize,
    pub mobility: i64,
    pub opponent_avoid_bonus: i64,
    pub opponent_distance_threshold: i32,
    pub flood_fill_cap: usize,
    /// Upper bound of a random amount added to each score. Zero is deterministic.
    pub jitter: i64,
}

impl Default for BotWeights {
    fn default() -> Self {
        Self {
            space: 10,
            wall_distance: 2,
            straight_bonus: 15,
            straight_space_ratio: 0.9,
            lookahead: 3,
            lookahead_depth: 8,
            mobility: 5,
            opponent_avoid_bonus: 4,
            opponent_distance_threshold: 5,
            flood_fill_cap: 400,
            jitter: 0,
        }
    }
}

impl Validate for BotWeights {
    fn validate(&self) -> Result<(), String> {
        let weights = [
            ("space", self.space),
            ("wall_distance", self.wall_distance),
            ("straight_bonus", self.straight_bonus),
            ("lookahead", self.lookahead),
            ("mobility", self.mobility),
            ("opponent_avoid_bonus", self.opponent_avoid_bonus),
            ("jitter", self.jitter),
        ];
        for (name, value) in weights {
            if value < 0 {
                return Err(format!("Bot weight '{}' must not be negative", name));
            }
        }
        if !(0.0..=1.0).contains(&self.straight_space_ratio) {
            return Err("straight_space_ratio must be between 0.0 and 1.0".to_string());
        }
        if self.flood_fill_cap == 0 {
            return Err("flood_fill_cap must be at least 1".to_string());
        }
        if self.lookahead_depth > 64 {
            return Err("lookahead_depth must be at most 64".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl BotDifficulty {
    pub fn weights(&self) -> BotWeights {
        match self {
            BotDifficulty::Easy => BotWeights {
                flood_fill_cap: 60,
                lookahead_depth: 3,
                mobility: 2,
                jitter: 80,
                ..BotWeights::default()
            },
            BotDifficulty::Medium => BotWeights::default(),
            BotDifficulty::Hard => BotWeights {
                flood_fill_cap: 1500,
                lookahead_depth: 16,
                straight_bonus: 8,
                mobility: 8,
                ..BotWeights::default()
            },
        }
    }
}

/// Everything a round needs besides its spawn policy and RNG.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSettings {
    pub width: i32,
    pub height: i32,
    pub mode: GameMode,
    pub bot_weights: BotWeights,
}

impl RoundSettings {
    pub fn new(width: i32, height: i32, mode: GameMode) -> Self {
        Self {
            width,
            height,
            mode,
            bot_weights: BotWeights::default(),
        }
    }

    pub fn with_bot_weights(mut self, bot_weights: BotWeights) -> Self {
        self.bot_weights = bot_weights;
        self
    }
}

impl Validate for RoundSettings {
    fn validate(&self) -> Result<(), String> {
        if self.width < 3 || self.height < 3 {
            return Err(format!(
                "Arena {}x{} has no interior, need at least 3x3",
                self.width, self.height
            ));
        }
        self.bot_weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for difficulty in [BotDifficulty::Easy, BotDifficulty::Medium, BotDifficulty::Hard] {
            assert!(difficulty.weights().validate().is_ok());
        }
        assert_eq!(BotDifficulty::default().weights(), BotWeights::default());
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let weights = BotWeights {
            mobility: -1,
            ..BotWeights::default()
        };
        let error = weights.validate().unwrap_err();
        assert!(error.contains("mobility"));
    }

    #[test]
    fn test_zero_cap_is_rejected() {
        let weights = BotWeights {
            flood_fill_cap: 0,
            ..BotWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let weights: BotWeights = serde_yaml_ng::from_str("space: 20\njitter: 3\n").unwrap();
        assert_eq!(weights.space, 20);
        assert_eq!(weights.jitter, 3);
        assert_eq!(weights.flood_fill_cap, BotWeights::default().flood_fill_cap);
    }

    #[test]
    fn test_round_settings_reject_degenerate_arena() {
        assert!(RoundSettings::new(40, 20, GameMode::VsBot).validate().is_ok());
        assert!(RoundSettings::new(2, 20, GameMode::VsBot).validate().is_err());

        let settings = RoundSettings::new(40, 20, GameMode::VsBot).with_bot_weights(BotWeights {
            straight_space_ratio: 1.5,
            ..BotWeights::default()
        });
        assert!(settings.validate().is_err());
    }
}
