use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::time::interval;
use tron_common::games::SessionRng;
use tron_common::games::tron::{
    BotController, EntityId, RandomSideSpawn, RoundError, RoundSettings, RoundState, SeatKind,
    TronRound, Winner,
};
use tron_common::log;

use crate::config::RunnerConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Won(EntityId),
    Tie,
    /// Single-player round that ended in a crash.
    Survived { ticks: u64 },
    /// Stopped by the tick cap while still playing.
    Unfinished,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<RoundOutcome>,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn wins(&self) -> BTreeMap<EntityId, u32> {
        let mut wins = BTreeMap::new();
        for outcome in &self.outcomes {
            if let RoundOutcome::Won(id) = outcome {
                *wins.entry(*id).or_insert(0) += 1;
            }
        }
        wins
    }

    pub fn ties(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| **outcome == RoundOutcome::Tie)
            .count()
    }

    pub fn log_table(&self) {
        log!(
            "Played {} round(s){}",
            self.outcomes.len(),
            if self.interrupted { ", interrupted" } else { "" }
        );
        for (id, count) in self.wins() {
            log!("  {:<10} {} win(s)", id.to_string(), count);
        }
        let ties = self.ties();
        if ties > 0 {
            log!("  {:<10} {}", "ties", ties);
        }
        let longest_ride = self
            .outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                RoundOutcome::Survived { ticks } => Some(*ticks),
                _ => None,
            })
            .max();
        if let Some(ticks) = longest_ride {
            log!("  {:<10} {} ticks", "best run", ticks);
        }
        let unfinished = self
            .outcomes
            .iter()
            .filter(|outcome| **outcome == RoundOutcome::Unfinished)
            .count();
        if unfinished > 0 {
            log!("  {:<10} {}", "unfinished", unfinished);
        }
    }
}

pub fn create_round(config: &RunnerConfig) -> Result<TronRound, RoundError> {
    let settings = RoundSettings::new(config.arena.width, config.arena.height, config.mode)
        .with_bot_weights(config.bot.effective_weights());
    let rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };

    let mut round = TronRound::new(
        &settings,
        Box::new(RandomSideSpawn::new(config.spawn_margin)),
        rng,
    )?;

    if config.autopilot {
        for (id, kind) in round.entity_ids().into_iter().zip(config.mode.seats()) {
            if *kind == SeatKind::Human {
                round.set_pilot(id, Some(Box::new(BotController::new(settings.bot_weights.clone()))));
            }
        }
    }

    Ok(round)
}

/// Plays `config.rounds` rounds back to back, one tick per interval. Clearing
/// `running` stops the run at the next tick boundary.
pub async fn run_game_loop(
    config: &RunnerConfig,
    running: Arc<AtomicBool>,
) -> Result<RunSummary, RoundError> {
    let mut round = create_round(config)?;
    let mut summary = RunSummary::default();
    let mut tick_interval_timer = interval(config.tick_interval());

    for round_index in 0..config.rounds {
        if round_index > 0 {
            round.restart()?;
        }

        let outcome = loop {
            tick_interval_timer.tick().await;

            if !running.load(Ordering::Relaxed) {
                summary.interrupted = true;
                break None;
            }

            let result = round.tick();
            if result.state == RoundState::GameOver {
                break Some(match result.winner {
                    Some(Winner::Entity(id)) => RoundOutcome::Won(id),
                    Some(Winner::Tie) => RoundOutcome::Tie,
                    None => RoundOutcome::Survived {
                        ticks: round.tick_count(),
                    },
                });
            }

            if round.tick_count() >= config.max_ticks_per_round {
                log!(
                    "Round {} reached the cap of {} ticks",
                    round_index + 1,
                    config.max_ticks_per_round
                );
                break Some(RoundOutcome::Unfinished);
            }
        };

        let Some(outcome) = outcome else {
            break;
        };
        log!(
            "Round {}/{}: {:?} after {} ticks ({}s)",
            round_index + 1,
            config.rounds,
            outcome,
            round.tick_count(),
            round.elapsed_seconds()
        );
        summary.outcomes.push(outcome);
    }

    Ok(summary)
}
