use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
pub(crate) use tron_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use tron_common::games::tron::{BotDifficulty, BotWeights, GameMode, DEFAULT_SPAWN_MARGIN};

pub const CONFIG_FILE: &str = "tron_runner_config.yaml";

pub fn get_config_manager(path: &str) -> ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum GameSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub fn tick_interval(&self) -> Duration {
        match self {
            GameSpeed::Slow => Duration::from_millis(150),
            GameSpeed::Normal => Duration::from_millis(100),
            GameSpeed::Fast => Duration::from_millis(50),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct RunnerConfig {
    pub arena: ArenaConfig,
    pub mode: GameMode,
    pub speed: GameSpeed,
    /// Overrides `speed` when set.
    pub tick_interval_ms: Option<u64>,
    pub spawn_margin: i32,
    /// Random when unset.
    pub seed: Option<u64>,
    pub rounds: u32,
    pub max_ticks_per_round: u64,
    /// Human seats get a bot pilot; with it off they ride straight.
    pub autopilot: bool,
    pub bot: BotConfig,
}

impl RunnerConfig {
    pub fn tick_interval(&self) -> Duration {
        match self.tick_interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.speed.tick_interval(),
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.arena.validate()?;
        self.bot.validate()?;
        if let Some(ms) = self.tick_interval_ms
            && !(1..=1000).contains(&ms)
        {
            return Err("tick_interval_ms must be between 1 and 1000".to_string());
        }
        if self.spawn_margin < 2 {
            return Err("spawn_margin must be at least 2".to_string());
        }
        let min_side = 2 * self.spawn_margin + 4;
        if self.arena.width < min_side || self.arena.height < min_side {
            return Err(format!(
                "arena must be at least {}x{} for spawn_margin {}",
                min_side, min_side, self.spawn_margin
            ));
        }
        if self.rounds == 0 {
            return Err("rounds must be greater than 0".to_string());
        }
        if self.max_ticks_per_round == 0 {
            return Err("max_ticks_per_round must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig {
                width: 80,
                height: 24,
            },
            mode: GameMode::VsBot,
            speed: GameSpeed::Normal,
            tick_interval_ms: None,
            spawn_margin: DEFAULT_SPAWN_MARGIN,
            seed: None,
            rounds: 3,
            max_ticks_per_round: 10_000,
            autopilot: true,
            bot: BotConfig::default(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
}

impl Validate for ArenaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.width > 1000 || self.height > 1000 {
            return Err("arena dimensions must not exceed 1000x1000".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize, Clone)]
pub struct BotConfig {
    pub difficulty: BotDifficulty,
    /// Replaces the difficulty preset entirely when present.
    pub weights: Option<BotWeights>,
}

impl BotConfig {
    pub fn effective_weights(&self) -> BotWeights {
        self.weights
            .clone()
            .unwrap_or_else(|| self.difficulty.weights())
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<(), String> {
        self.effective_weights().validate()
    }
}
