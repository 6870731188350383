use std::time::{Duration, Instant};

use crate::games::SessionRng;
use crate::{debug_log, log};
use super::bot_controller::BotController;
use super::collision::{hits_other_trail, hits_own_trail, hits_wall};
use super::error::RoundError;
use super::light_cycle::LightCycle;
use super::policy::{ArenaView, HeadingPolicy, Opponent};
use super::settings::RoundSettings;
use super::spawn::{Spawn, SpawnPolicy};
use super::types::{
    Arena, Direction, EntityId, GameMode, LossReason, Point, RoundState, SeatKind, Winner,
};

/// Wall ring plus a single interior cell.
const MIN_ARENA_SIDE: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loss {
    pub entity: EntityId,
    pub reason: LossReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub state: RoundState,
    pub surviving: Vec<EntityId>,
    pub winner: Option<Winner>,
    /// Entities eliminated by this tick.
    pub losses: Vec<Loss>,
}

/// Elapsed time since round start, frozen when the round ends.
#[derive(Clone, Copy, Debug)]
pub struct RoundClock {
    started: Instant,
    frozen_at: Option<Instant>,
}

impl RoundClock {
    pub fn start_at(started: Instant) -> Self {
        Self {
            started,
            frozen_at: None,
        }
    }

    pub fn freeze_at(&mut self, at: Instant) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(at);
        }
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.frozen_at
            .unwrap_or(now)
            .saturating_duration_since(self.started)
    }
}

struct Seat {
    cycle: LightCycle,
    pilot: Option<Box<dyn HeadingPolicy>>,
    loss: Option<LossReason>,
}

impl Seat {
    fn is_alive(&self) -> bool {
        self.loss.is_none()
    }
}

/// One round of 1–3 light cycles. Bots are ordinary cycles with a heading
/// policy attached; everyone else is steered through `set_heading`.
///
/// A tick either moves every live cycle one cell or eliminates the ones whose
/// move would collide. The round ends once a single-player cycle is gone or at
/// most one cycle of a multi-player round is left; the survivor, if any, wins.
pub struct TronRound {
    arena: Arena,
    mode: GameMode,
    seats: Vec<Seat>,
    spawn_policy: Box<dyn SpawnPolicy>,
    rng: SessionRng,
    state: RoundState,
    winner: Option<Winner>,
    clock: RoundClock,
    tick: u64,
}

/// Round with default bot weights.
pub fn init_round(
    width: i32,
    height: i32,
    mode: GameMode,
    spawn_policy: Box<dyn SpawnPolicy>,
    rng: SessionRng,
) -> Result<TronRound, RoundError> {
    TronRound::new(&RoundSettings::new(width, height, mode), spawn_policy, rng)
}

impl TronRound {
    pub fn new(
        settings: &RoundSettings,
        mut spawn_policy: Box<dyn SpawnPolicy>,
        mut rng: SessionRng,
    ) -> Result<Self, RoundError> {
        let arena = Arena::new(settings.width, settings.height);
        if arena.width < MIN_ARENA_SIDE || arena.height < MIN_ARENA_SIDE {
            return Err(RoundError::ArenaTooSmall {
                width: arena.width,
                height: arena.height,
                min_width: MIN_ARENA_SIDE,
                min_height: MIN_ARENA_SIDE,
            });
        }
        let seat_kinds = settings.mode.seats();

        spawn_policy.check(&arena, seat_kinds.len())?;
        let spawns = spawn_policy.spawn(&arena, seat_kinds.len(), &mut rng);
        Self::validate_spawns(&arena, seat_kinds.len(), &spawns)?;

        let seats = seat_kinds
            .iter()
            .zip(spawns)
            .enumerate()
            .map(|(index, (kind, spawn))| {
                let pilot: Option<Box<dyn HeadingPolicy>> = match kind {
                    SeatKind::Bot => Some(Box::new(BotController::new(settings.bot_weights.clone()))),
                    SeatKind::Human => None,
                };
                Seat {
                    cycle: LightCycle::new(EntityId::new(index as u8 + 1), spawn),
                    pilot,
                    loss: None,
                }
            })
            .collect();

        log!(
            "Round created: {:?} on {}x{}, seed {}",
            settings.mode,
            arena.width,
            arena.height,
            rng.seed()
        );

        Ok(Self {
            arena,
            mode: settings.mode,
            seats,
            spawn_policy,
            rng,
            state: RoundState::Playing,
            winner: None,
            clock: RoundClock::start_at(Instant::now()),
            tick: 0,
        })
    }

    fn validate_spawns(arena: &Arena, expected: usize, spawns: &[Spawn]) -> Result<(), RoundError> {
        if spawns.len() != expected {
            return Err(RoundError::SpawnCountMismatch {
                expected,
                provided: spawns.len(),
            });
        }
        for (index, spawn) in spawns.iter().enumerate() {
            if !spawn.is_safe(arena) {
                return Err(RoundError::UnsafeSpawn {
                    entity: EntityId::new(index as u8 + 1),
                    position: spawn.position,
                });
            }
            if spawns[..index].iter().any(|other| other.position == spawn.position) {
                return Err(RoundError::OverlappingSpawns {
                    position: spawn.position,
                });
            }
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed_at(Instant::now())
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.seats.iter().map(|seat| seat.cycle.id()).collect()
    }

    pub fn cycles(&self) -> impl Iterator<Item = &LightCycle> {
        self.seats.iter().map(|seat| &seat.cycle)
    }

    pub fn cycle(&self, id: EntityId) -> Option<&LightCycle> {
        self.seat(id).map(|seat| &seat.cycle)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.seat(id).is_some_and(Seat::is_alive)
    }

    pub fn loss_reason(&self, id: EntityId) -> Option<LossReason> {
        self.seat(id).and_then(|seat| seat.loss)
    }

    pub fn is_piloted(&self, id: EntityId) -> bool {
        self.seat(id).is_some_and(|seat| seat.pilot.is_some())
    }

    fn seat(&self, id: EntityId) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.cycle.id() == id)
    }

    fn seat_mut(&mut self, id: EntityId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.cycle.id() == id)
    }

    /// Replaces (or with `None` removes) the heading policy of a seat.
    pub fn set_pilot(&mut self, id: EntityId, pilot: Option<Box<dyn HeadingPolicy>>) -> bool {
        match self.seat_mut(id) {
            Some(seat) => {
                seat.pilot = pilot;
                true
            }
            None => false,
        }
    }

    /// Returns whether the heading was installed.
    pub fn set_heading(&mut self, id: EntityId, direction: Direction) -> bool {
        if self.state != RoundState::Playing {
            return false;
        }
        match self.seat_mut(id) {
            Some(seat) if seat.is_alive() => seat.cycle.set_heading(direction),
            _ => false,
        }
    }

    pub fn tick(&mut self) -> TickResult {
        if self.state != RoundState::Playing {
            return self.result(Vec::new());
        }

        self.tick += 1;
        self.steer_piloted();

        let live: Vec<usize> = (0..self.seats.len())
            .filter(|&index| self.seats[index].is_alive())
            .collect();
        let candidates: Vec<(usize, Point)> = live
            .iter()
            .map(|&index| (index, self.seats[index].cycle.next_cell()))
            .collect();

        let mut verdicts: Vec<Option<LossReason>> = vec![None; self.seats.len()];

        for (position, &(first, cell)) in candidates.iter().enumerate() {
            for &(second, other_cell) in &candidates[position + 1..] {
                if cell == other_cell {
                    verdicts[first] = Some(LossReason::HeadToHead(self.seats[second].cycle.id()));
                    verdicts[second] = Some(LossReason::HeadToHead(self.seats[first].cycle.id()));
                }
            }
        }

        for &(index, cell) in &candidates {
            if verdicts[index].is_none() {
                verdicts[index] = self.collision_at(index, cell);
            }
        }

        let mut losses = Vec::new();
        for (index, verdict) in verdicts.into_iter().enumerate() {
            if let Some(reason) = verdict {
                let seat = &mut self.seats[index];
                seat.loss = Some(reason);
                losses.push(Loss {
                    entity: seat.cycle.id(),
                    reason,
                });
                log!(
                    "{} lost at {} heading {:?}: {:?}",
                    seat.cycle.id(),
                    seat.cycle.position(),
                    seat.cycle.heading(),
                    reason
                );
            }
        }

        let survivors: Vec<usize> = live
            .iter()
            .copied()
            .filter(|&index| self.seats[index].is_alive())
            .collect();

        let round_over = if self.seats.len() == 1 {
            survivors.is_empty()
        } else {
            survivors.len() <= 1
        };

        if round_over {
            self.finish(&survivors);
        } else {
            for &index in &survivors {
                self.seats[index].cycle.move_forward();
            }
            debug_log!("Tick {}: {} cycles moved", self.tick, survivors.len());
        }

        self.result(losses)
    }

    fn steer_piloted(&mut self) {
        let Self {
            arena, seats, rng, ..
        } = self;

        for index in 0..seats.len() {
            if !seats[index].is_alive() {
                continue;
            }
            let Some(mut pilot) = seats[index].pilot.take() else {
                continue;
            };

            let choice = {
                let view = ArenaView {
                    arena: *arena,
                    me: &seats[index].cycle,
                    opponents: seats
                        .iter()
                        .enumerate()
                        .filter(|&(other, _)| other != index)
                        .map(|(_, seat)| Opponent {
                            cycle: &seat.cycle,
                            alive: seat.is_alive(),
                        })
                        .collect(),
                };
                pilot.choose_heading(&view, rng)
            };

            let seat = &mut seats[index];
            if let Some(direction) = choice {
                seat.cycle.set_heading(direction);
            }
            seat.pilot = Some(pilot);
        }
    }

    fn collision_at(&self, index: usize, cell: Point) -> Option<LossReason> {
        let seat = &self.seats[index];
        if hits_wall(cell, &self.arena) {
            return Some(LossReason::WallCollision);
        }
        if hits_own_trail(cell, seat.cycle.trail()) {
            return Some(LossReason::SelfCollision);
        }
        self.seats
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index)
            .find(|(_, other)| hits_other_trail(cell, other.cycle.trail()))
            .map(|(_, other)| LossReason::TrailCollision(other.cycle.id()))
    }

    fn finish(&mut self, survivors: &[usize]) {
        self.state = RoundState::GameOver;
        self.clock.freeze_at(Instant::now());

        if self.seats.len() > 1 {
            let winner = match survivors {
                [only] => Winner::Entity(self.seats[*only].cycle.id()),
                _ => Winner::Tie,
            };
            self.winner = Some(winner);
            log!(
                "Round over after {} ticks ({}s): winner {}",
                self.tick,
                self.elapsed_seconds(),
                winner
            );
        } else {
            log!(
                "Round over after {} ticks ({}s)",
                self.tick,
                self.elapsed_seconds()
            );
        }
    }

    fn result(&self, losses: Vec<Loss>) -> TickResult {
        TickResult {
            state: self.state,
            surviving: self
                .seats
                .iter()
                .filter(|seat| seat.is_alive())
                .map(|seat| seat.cycle.id())
                .collect(),
            winner: self.winner,
            losses,
        }
    }

    /// Fresh spawns for every seat, winner cleared, clock and tick counter
    /// restarted. Seat identities and pilots are kept. Spawns are checked the
    /// same way as on creation; a rejected set leaves the round untouched.
    pub fn restart(&mut self) -> Result<(), RoundError> {
        let spawns = self
            .spawn_policy
            .spawn(&self.arena, self.seats.len(), &mut self.rng);
        Self::validate_spawns(&self.arena, self.seats.len(), &spawns)?;

        for (seat, spawn) in self.seats.iter_mut().zip(spawns) {
            seat.cycle.reset(spawn);
            seat.loss = None;
            if let Some(pilot) = seat.pilot.as_mut() {
                pilot.reset();
            }
        }

        self.state = RoundState::Playing;
        self.winner = None;
        self.clock = RoundClock::start_at(Instant::now());
        self.tick = 0;
        log!("Round restarted");
        Ok(())
    }
}
