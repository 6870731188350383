use super::trail::Trail;
use super::types::{Arena, Point};

/// Own-trail segments ignored by self-collision: the current head and the cell
/// being vacated this tick.
pub const SELF_TAIL_EXCLUSION: usize = 2;

pub fn check_wall_collision(x: i32, y: i32, width: i32, height: i32) -> bool {
    x <= 0 || x >= width - 1 || y <= 0 || y >= height - 1
}

pub fn check_trail_collision(x: i32, y: i32, trail: &Trail, tail_exclusion: usize) -> bool {
    trail.contains_excluding_tail(Point::new(x, y), tail_exclusion)
}

pub fn hits_wall(cell: Point, arena: &Arena) -> bool {
    check_wall_collision(cell.x, cell.y, arena.width, arena.height)
}

pub fn hits_own_trail(cell: Point, trail: &Trail) -> bool {
    check_trail_collision(cell.x, cell.y, trail, SELF_TAIL_EXCLUSION)
}

pub fn hits_other_trail(cell: Point, trail: &Trail) -> bool {
    check_trail_collision(cell.x, cell.y, trail, 0)
}
