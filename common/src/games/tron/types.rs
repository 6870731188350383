use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(&self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan_distance(&self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Canonical enumeration order. The bot breaks score ties by this order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }

    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u8);

impl EntityId {
    pub const FIRST: EntityId = EntityId(1);
    pub const SECOND: EntityId = EntityId(2);
    pub const THIRD: EntityId = EntityId(3);

    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity-{}", self.0)
    }
}

/// Arena dimensions including the wall ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
}

impl Arena {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_interior(&self, point: Point) -> bool {
        point.x >= 1 && point.x <= self.width - 2 && point.y >= 1 && point.y <= self.height - 2
    }

    pub fn interior_cell_count(&self) -> usize {
        ((self.width - 2).max(0) * (self.height - 2).max(0)) as usize
    }

    /// Distance to the closest wall cell; zero for cells on the wall ring.
    pub fn wall_distance(&self, point: Point) -> i32 {
        let horizontal = point.x.min(self.width - 1 - point.x);
        let vertical = point.y.min(self.height - 1 - point.y);
        horizontal.min(vertical).max(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    SinglePlayer,
    TwoPlayer,
    VsBot,
    TwoPlayerVsBot,
}

/// Who steers a seat by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatKind {
    Human,
    Bot,
}

impl GameMode {
    pub fn seats(&self) -> &'static [SeatKind] {
        match self {
            GameMode::SinglePlayer => &[SeatKind::Human],
            GameMode::TwoPlayer => &[SeatKind::Human, SeatKind::Human],
            GameMode::VsBot => &[SeatKind::Human, SeatKind::Bot],
            GameMode::TwoPlayerVsBot => &[SeatKind::Human, SeatKind::Human, SeatKind::Bot],
        }
    }

    pub fn entity_count(&self) -> usize {
        self.seats().len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Playing,
    GameOver,
    /// Reserved; the core never enters it.
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Tie,
    Entity(EntityId),
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Tie => write!(f, "tie"),
            Winner::Entity(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LossReason {
    WallCollision,
    SelfCollision,
    TrailCollision(EntityId),
    HeadToHead(EntityId),
}
