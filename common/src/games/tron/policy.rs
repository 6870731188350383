use std::collections::VecDeque;

use crate::games::SessionRng;
use super::light_cycle::LightCycle;
use super::types::{Arena, Direction, Point};

pub struct Opponent<'a> {
    pub cycle: &'a LightCycle,
    pub alive: bool,
}

/// What a pilot is allowed to see: the arena, its own cycle and every other
/// trail. Nothing about what the others will do next.
pub struct ArenaView<'a> {
    pub arena: Arena,
    pub me: &'a LightCycle,
    pub opponents: Vec<Opponent<'a>>,
}

impl<'a> ArenaView<'a> {
    pub fn live_opponent_heads(&self) -> impl Iterator<Item = Point> + '_ {
        self.opponents
            .iter()
            .filter(|opponent| opponent.alive)
            .map(|opponent| opponent.cycle.position())
    }
}

/// Steers one seat. Returning `None` keeps the current heading; a returned
/// heading still goes through the no-reverse rule.
pub trait HeadingPolicy: Send {
    fn choose_heading(&mut self, view: &ArenaView<'_>, rng: &mut SessionRng) -> Option<Direction>;

    /// Called on restart.
    fn reset(&mut self) {}
}

/// Replays a fixed list of per-tick decisions, then keeps heading.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    script: Vec<Option<Direction>>,
    remaining: VecDeque<Option<Direction>>,
}

impl ScriptedPolicy {
    pub fn new(script: Vec<Option<Direction>>) -> Self {
        Self {
            remaining: script.iter().copied().collect(),
            script,
        }
    }
}

impl HeadingPolicy for ScriptedPolicy {
    fn choose_heading(&mut self, _view: &ArenaView<'_>, _rng: &mut SessionRng) -> Option<Direction> {
        self.remaining.pop_front().flatten()
    }

    fn reset(&mut self) {
        self.remaining = self.script.iter().copied().collect();
    }
}
