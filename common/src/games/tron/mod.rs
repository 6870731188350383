mod bot_controller;
mod collision;
mod error;
mod light_cycle;
mod occupancy;
mod policy;
mod round;
mod settings;
mod spawn;
mod trail;
mod types;

pub use bot_controller::{BotController, CandidateScore};
pub use collision::{check_trail_collision, check_wall_collision, SELF_TAIL_EXCLUSION};
pub use error::RoundError;
pub use light_cycle::LightCycle;
pub use occupancy::OccupancyGrid;
pub use policy::{ArenaView, HeadingPolicy, Opponent, ScriptedPolicy};
pub use round::{init_round, Loss, RoundClock, TickResult, TronRound};
pub use settings::{BotDifficulty, BotWeights, RoundSettings};
pub use spawn::{FixedSpawn, RandomSideSpawn, Side, Spawn, SpawnPolicy, DEFAULT_SPAWN_MARGIN};
pub use trail::{SegmentShape, Trail, TrailSegment};
pub use types::{
    Arena, Direction, EntityId, GameMode, LossReason, Point, RoundState, SeatKind, Winner,
};
