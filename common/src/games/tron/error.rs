use std::fmt;

use super::types::{EntityId, Point};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundError {
    ArenaTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
    InvalidMargin {
        margin: i32,
    },
    SpawnCountMismatch {
        expected: usize,
        provided: usize,
    },
    UnsafeSpawn {
        entity: EntityId,
        position: Point,
    },
    OverlappingSpawns {
        position: Point,
    },
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::ArenaTooSmall {
                width,
                height,
                min_width,
                min_height,
            } => write!(
                f,
                "Arena {}x{} is too small, spawning needs at least {}x{}",
                width, height, min_width, min_height
            ),
            RoundError::InvalidMargin { margin } => {
                write!(f, "Spawn margin must be at least 2, got {}", margin)
            }
            RoundError::SpawnCountMismatch { expected, provided } => write!(
                f,
                "Expected {} spawn points, spawn policy provides {}",
                expected, provided
            ),
            RoundError::UnsafeSpawn { entity, position } => write!(
                f,
                "Spawn of {} at {} is outside the arena or its first move hits a wall",
                entity, position
            ),
            RoundError::OverlappingSpawns { position } => {
                write!(f, "Two entities share the spawn cell {}", position)
            }
        }
    }
}

impl std::error::Error for RoundError {}
