use std::collections::VecDeque;

use super::policy::ArenaView;
use super::types::{Arena, Direction, Point};

/// Dense blocked-cell map: the wall ring plus every trail cell.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    arena: Arena,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(arena: Arena) -> Self {
        let width = arena.width.max(0);
        let height = arena.height.max(0);
        let mut blocked = vec![false; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    blocked[(y * width + x) as usize] = true;
                }
            }
        }
        Self { arena, blocked }
    }

    pub fn from_view(view: &ArenaView<'_>) -> Self {
        let mut grid = Self::new(view.arena);
        grid.block_all(view.me.trail().cells());
        for opponent in &view.opponents {
            grid.block_all(opponent.cycle.trail().cells());
        }
        grid
    }

    fn index(&self, point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 || point.x >= self.arena.width || point.y >= self.arena.height {
            return None;
        }
        Some((point.y * self.arena.width + point.x) as usize)
    }

    pub fn block(&mut self, point: Point) {
        if let Some(index) = self.index(point) {
            self.blocked[index] = true;
        }
    }

    pub fn block_all(&mut self, points: impl IntoIterator<Item = Point>) {
        for point in points {
            self.block(point);
        }
    }

    /// Anything outside the grid counts as blocked.
    pub fn is_blocked(&self, point: Point) -> bool {
        self.index(point).is_none_or(|index| self.blocked[index])
    }

    /// Breadth-first count of free cells reachable from `start`, including
    /// `start` itself, stopping once `cap` cells have been counted.
    pub fn flood_fill(&self, start: Point, cap: usize) -> usize {
        if cap == 0 || self.is_blocked(start) {
            return 0;
        }

        let mut visited = vec![false; self.blocked.len()];
        let mut queue = VecDeque::new();
        if let Some(index) = self.index(start) {
            visited[index] = true;
        }
        queue.push_back(start);
        let mut count = 1;

        while let Some(cell) = queue.pop_front() {
            for direction in Direction::ALL {
                if count >= cap {
                    return count;
                }
                let next = cell.step(direction);
                let Some(index) = self.index(next) else {
                    continue;
                };
                if visited[index] || self.blocked[index] {
                    continue;
                }
                visited[index] = true;
                count += 1;
                queue.push_back(next);
            }
        }

        count
    }

    /// Free cells in a straight line from `from` (exclusive), up to `depth`.
    pub fn straight_run(&self, from: Point, direction: Direction, depth: usize) -> usize {
        let mut cell = from;
        let mut steps = 0;
        while steps < depth {
            cell = cell.step(direction);
            if self.is_blocked(cell) {
                break;
            }
            steps += 1;
        }
        steps
    }
}
