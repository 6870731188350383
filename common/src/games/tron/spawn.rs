use crate::games::SessionRng;
use super::collision::hits_wall;
use super::error::RoundError;
use super::types::{Arena, Direction, EntityId, Point};

pub const DEFAULT_SPAWN_MARGIN: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub position: Point,
    pub heading: Direction,
}

impl Spawn {
    pub fn new(position: Point, heading: Direction) -> Self {
        Self { position, heading }
    }

    /// Inside the interior and one step along the heading is still inside.
    pub fn is_safe(&self, arena: &Arena) -> bool {
        arena.is_interior(self.position) && !hits_wall(self.position.step(self.heading), arena)
    }
}

pub trait SpawnPolicy: Send {
    /// Checked once when the round is created; `spawn` may assume it passed.
    fn check(&self, arena: &Arena, count: usize) -> Result<(), RoundError>;

    fn spawn(&mut self, arena: &Arena, count: usize, rng: &mut SessionRng) -> Vec<Spawn>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn from_index(index: usize) -> Side {
        Side::ALL[index % Side::ALL.len()]
    }

    /// Points away from the side's wall.
    pub fn inward_heading(&self) -> Direction {
        match self {
            Side::Top => Direction::Down,
            Side::Right => Direction::Left,
            Side::Bottom => Direction::Up,
            Side::Left => Direction::Right,
        }
    }
}

/// Entity 1 starts on a random side, entity 2 on the opposite one and entity 3
/// on the side clockwise of entity 1. Each entity sits `margin` cells in from
/// its wall at a random offset along it, heading inward. Offsets on the left and
/// right sides stay two rows clear of the top and bottom spawn rows, so no two
/// cycles share a spawn cell or the cell of their first move.
#[derive(Clone, Debug)]
pub struct RandomSideSpawn {
    margin: i32,
}

const SIDE_OFFSETS: [usize; 4] = [0, 2, 1, 3];

impl RandomSideSpawn {
    pub fn new(margin: i32) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    fn position_on_side(&self, side: Side, arena: &Arena, rng: &mut SessionRng) -> Point {
        let m = self.margin;
        match side {
            Side::Top => Point::new(m + rng.random_range(0..arena.width - 2 * m), m),
            Side::Right => Point::new(arena.width - m, m + 2 + rng.random_range(0..arena.height - 2 * m - 3)),
            Side::Bottom => Point::new(m + rng.random_range(0..arena.width - 2 * m), arena.height - m),
            Side::Left => Point::new(m, m + 2 + rng.random_range(0..arena.height - 2 * m - 3)),
        }
    }
}

impl Default for RandomSideSpawn {
    fn default() -> Self {
        Self::new(DEFAULT_SPAWN_MARGIN)
    }
}

impl SpawnPolicy for RandomSideSpawn {
    fn check(&self, arena: &Arena, count: usize) -> Result<(), RoundError> {
        if self.margin < 2 {
            return Err(RoundError::InvalidMargin {
                margin: self.margin,
            });
        }
        // Opposite spawns end up at least four cells apart.
        let min_side = 2 * self.margin + 4;
        if arena.width < min_side || arena.height < min_side {
            return Err(RoundError::ArenaTooSmall {
                width: arena.width,
                height: arena.height,
                min_width: min_side,
                min_height: min_side,
            });
        }
        if count > SIDE_OFFSETS.len() {
            return Err(RoundError::SpawnCountMismatch {
                expected: count,
                provided: SIDE_OFFSETS.len(),
            });
        }
        Ok(())
    }

    fn spawn(&mut self, arena: &Arena, count: usize, rng: &mut SessionRng) -> Vec<Spawn> {
        let first_side = rng.random_range(0..Side::ALL.len());
        SIDE_OFFSETS
            .iter()
            .take(count)
            .map(|offset| {
                let side = Side::from_index(first_side + offset);
                Spawn::new(self.position_on_side(side, arena, rng), side.inward_heading())
            })
            .collect()
    }
}

/// Same spawn points every round, in entity order.
#[derive(Clone, Debug)]
pub struct FixedSpawn {
    spawns: Vec<Spawn>,
}

impl FixedSpawn {
    pub fn new(spawns: Vec<Spawn>) -> Self {
        Self { spawns }
    }
}

impl SpawnPolicy for FixedSpawn {
    fn check(&self, arena: &Arena, count: usize) -> Result<(), RoundError> {
        if self.spawns.len() != count {
            return Err(RoundError::SpawnCountMismatch {
                expected: count,
                provided: self.spawns.len(),
            });
        }
        for (index, spawn) in self.spawns.iter().enumerate() {
            if !spawn.is_safe(arena) {
                return Err(RoundError::UnsafeSpawn {
                    entity: EntityId::new(index as u8 + 1),
                    position: spawn.position,
                });
            }
        }
        Ok(())
    }

    fn spawn(&mut self, _arena: &Arena, count: usize, _rng: &mut SessionRng) -> Vec<Spawn> {
        self.spawns.iter().take(count).copied().collect()
    }
}
