use super::spawn::Spawn;
use super::trail::Trail;
use super::types::{Direction, EntityId, Point};

#[derive(Clone, Debug)]
pub struct LightCycle {
    id: EntityId,
    position: Point,
    heading: Direction,
    trail: Trail,
}

impl LightCycle {
    pub fn new(id: EntityId, spawn: Spawn) -> Self {
        Self {
            id,
            position: spawn.position,
            heading: spawn.heading,
            trail: Trail::new(spawn.position, spawn.heading),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Direction of the most recent move (the spawn heading before the first move).
    pub fn last_moved(&self) -> Direction {
        self.trail.head().entered_from
    }

    /// A 180° turn is measured against both the pending heading and the last
    /// executed move, so two quick turns within one tick cannot fold the cycle
    /// back onto the cell it just left.
    pub fn accepts_heading(&self, heading: Direction) -> bool {
        !heading.is_opposite(&self.heading) && !heading.is_opposite(&self.last_moved())
    }

    pub fn set_heading(&mut self, heading: Direction) -> bool {
        if !self.accepts_heading(heading) {
            return false;
        }
        self.heading = heading;
        true
    }

    pub fn next_cell(&self) -> Point {
        self.position.step(self.heading)
    }

    pub fn move_forward(&mut self) {
        let next = self.next_cell();
        self.position = next;
        self.trail.append_head(next, self.heading);
    }

    /// Same identity, fresh spawn.
    pub fn reset(&mut self, spawn: Spawn) {
        self.position = spawn.position;
        self.heading = spawn.heading;
        self.trail.reset(spawn.position, spawn.heading);
    }
}
