use crate::debug_log;
use crate::games::SessionRng;
use super::collision::{hits_other_trail, hits_own_trail, hits_wall};
use super::occupancy::OccupancyGrid;
use super::policy::{ArenaView, HeadingPolicy};
use super::settings::BotWeights;
use super::types::{Direction, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateScore {
    pub direction: Direction,
    pub cell: Point,
    pub available_space: usize,
    pub score: i64,
}

/// Picks the heading with the most room to manoeuvre. Every safe heading is
/// flood-filled, then scored on space, wall clearance, keeping course, a
/// straight look-ahead, one-step mobility and distance to the nearest rival.
#[derive(Clone, Debug, Default)]
pub struct BotController {
    weights: BotWeights,
}

impl BotController {
    pub fn new(weights: BotWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &BotWeights {
        &self.weights
    }

    pub fn calculate_move(&self, view: &ArenaView<'_>, rng: &mut SessionRng) -> Direction {
        let candidates = self.score_candidates(view, rng);

        let mut best: Option<&CandidateScore> = None;
        for candidate in &candidates {
            if best.is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) => candidate.direction,
            None => {
                debug_log!(
                    "{} has no safe heading at {}, holding {:?}",
                    view.me.id(),
                    view.me.position(),
                    view.me.heading()
                );
                view.me.heading()
            }
        }
    }

    /// Safe candidates in Up, Down, Left, Right order with their scores.
    pub fn score_candidates(&self, view: &ArenaView<'_>, rng: &mut SessionRng) -> Vec<CandidateScore> {
        let safe = Self::safe_candidates(view);
        if safe.is_empty() {
            return Vec::new();
        }

        let grid = OccupancyGrid::from_view(view);
        let spaces: Vec<usize> = safe
            .iter()
            .map(|&(_, cell)| grid.flood_fill(cell, self.weights.flood_fill_cap))
            .collect();
        let best_space = spaces.iter().copied().max().unwrap_or(0);

        let origin = view.me.position();
        let current_rival_distance = Self::nearest_rival_distance(view, origin);

        safe.iter()
            .zip(spaces)
            .map(|(&(direction, cell), available_space)| {
                // Weights come from config unbounded, so every term saturates.
                let mut score = self.weights.space.saturating_mul(available_space as i64);

                score = score.saturating_add(
                    self.weights
                        .wall_distance
                        .saturating_mul(view.arena.wall_distance(cell) as i64),
                );

                let near_best =
                    available_space as f64 >= best_space as f64 * self.weights.straight_space_ratio;
                if direction == view.me.heading() && near_best {
                    score = score.saturating_add(self.weights.straight_bonus);
                }

                let run = grid.straight_run(cell, direction, self.weights.lookahead_depth);
                score = score.saturating_add(self.weights.lookahead.saturating_mul(run as i64));

                let onward = Self::mobility(&grid, cell, direction) as i64;
                score = score.saturating_add(self.weights.mobility.saturating_mul(onward));

                if let (Some(before), Some(after)) =
                    (current_rival_distance, Self::nearest_rival_distance(view, cell))
                    && after > before
                    && after > self.weights.opponent_distance_threshold
                {
                    score = score.saturating_add(self.weights.opponent_avoid_bonus);
                }

                if self.weights.jitter > 0 {
                    score = score.saturating_add(rng.random_range(0..=self.weights.jitter));
                }

                CandidateScore {
                    direction,
                    cell,
                    available_space,
                    score,
                }
            })
            .collect()
    }

    fn safe_candidates(view: &ArenaView<'_>) -> Vec<(Direction, Point)> {
        let me = view.me;
        Direction::ALL
            .into_iter()
            .filter(|&direction| me.accepts_heading(direction))
            .map(|direction| (direction, me.position().step(direction)))
            .filter(|&(_, cell)| {
                !hits_wall(cell, &view.arena)
                    && !hits_own_trail(cell, me.trail())
                    && view
                        .opponents
                        .iter()
                        .all(|opponent| !hits_other_trail(cell, opponent.cycle.trail()))
            })
            .collect()
    }

    /// Free neighbours of `cell`, not counting the way back.
    fn mobility(grid: &OccupancyGrid, cell: Point, arrived_by: Direction) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| !direction.is_opposite(&arrived_by))
            .filter(|&direction| !grid.is_blocked(cell.step(direction)))
            .count()
    }

    fn nearest_rival_distance(view: &ArenaView<'_>, from: Point) -> Option<i32> {
        view.live_opponent_heads()
            .map(|head| from.manhattan_distance(head))
            .min()
    }
}

impl HeadingPolicy for BotController {
    fn choose_heading(&mut self, view: &ArenaView<'_>, rng: &mut SessionRng) -> Option<Direction> {
        Some(self.calculate_move(view, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validate;
    use crate::games::tron::light_cycle::LightCycle;
    use crate::games::tron::policy::Opponent;
    use crate::games::tron::spawn::Spawn;
    use crate::games::tron::types::{Arena, EntityId};

    fn cycle(id: EntityId, x: i32, y: i32, heading: Direction) -> LightCycle {
        LightCycle::new(id, Spawn::new(Point::new(x, y), heading))
    }

    fn drive(cycle: &mut LightCycle, moves: &[Direction]) {
        for &direction in moves {
            cycle.set_heading(direction);
            cycle.move_forward();
        }
    }

    fn view<'a>(arena: Arena, me: &'a LightCycle, others: &'a [LightCycle]) -> ArenaView<'a> {
        ArenaView {
            arena,
            me,
            opponents: others
                .iter()
                .map(|cycle| Opponent { cycle, alive: true })
                .collect(),
        }
    }

    #[test]
    fn test_never_picks_reverse_or_wall() {
        let arena = Arena::new(10, 10);
        let me = cycle(EntityId::SECOND, 8, 4, Direction::Right);
        let bot = BotController::default();
        let mut rng = SessionRng::new(42);

        let choice = bot.calculate_move(&view(arena, &me, &[]), &mut rng);
        assert_ne!(choice, Direction::Left);
        assert_ne!(choice, Direction::Right);
        assert!(matches!(choice, Direction::Up | Direction::Down));
    }

    #[test]
    fn test_avoids_opponent_trail() {
        let arena = Arena::new(12, 12);
        let me = cycle(EntityId::SECOND, 5, 5, Direction::Right);
        let mut opponent = cycle(EntityId::FIRST, 6, 2, Direction::Down);
        drive(&mut opponent, &[Direction::Down; 6]);

        let bot = BotController::default();
        let mut rng = SessionRng::new(42);
        let others = [opponent];
        let scores = bot.score_candidates(&view(arena, &me, &others), &mut rng);

        assert!(scores.iter().all(|c| c.direction != Direction::Right));
        let choice = bot.calculate_move(&view(arena, &me, &others), &mut rng);
        assert_ne!(choice, Direction::Right);
    }

    #[test]
    fn test_skips_blocked_and_reverse_headings() {
        let arena = Arena::new(16, 10);
        let mut wall = cycle(EntityId::FIRST, 4, 1, Direction::Down);
        drive(&mut wall, &[Direction::Down; 7]);
        let mut me = cycle(EntityId::SECOND, 6, 8, Direction::Left);
        drive(&mut me, &[Direction::Left, Direction::Up, Direction::Up, Direction::Up]);
        assert_eq!(me.position(), Point::new(5, 5));

        let bot = BotController::default();
        let others = [wall];
        let scores = bot.score_candidates(&view(arena, &me, &others), &mut SessionRng::new(1));
        let directions: Vec<Direction> = scores.iter().map(|c| c.direction).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Right]);
        assert!(scores.iter().all(|c| c.available_space > 0));
    }

    #[test]
    fn test_escapes_dead_end_pocket() {
        // Two rival trails on rows 4 and 6 plus the own trail on column 5 seal
        // off the four cells (1..=4, 5). Turning Left walks into that pocket.
        let arena = Arena::new(12, 12);
        let mut upper = cycle(EntityId::FIRST, 4, 4, Direction::Left);
        drive(&mut upper, &[Direction::Left; 3]);
        let mut lower = cycle(EntityId::THIRD, 4, 6, Direction::Left);
        drive(&mut lower, &[Direction::Left; 3]);
        let mut me = cycle(EntityId::SECOND, 5, 10, Direction::Up);
        drive(&mut me, &[Direction::Up; 5]);
        assert_eq!(me.position(), Point::new(5, 5));

        let bot = BotController::default();
        let others = [upper, lower];
        let scores = bot.score_candidates(&view(arena, &me, &others), &mut SessionRng::new(5));
        let left = scores.iter().find(|c| c.direction == Direction::Left).unwrap();
        let up = scores.iter().find(|c| c.direction == Direction::Up).unwrap();
        assert_eq!(left.available_space, 4);
        assert!(up.available_space > left.available_space);

        let choice = bot.calculate_move(&view(arena, &me, &others), &mut SessionRng::new(5));
        assert_ne!(choice, Direction::Left);
        assert_ne!(choice, Direction::Down);
    }

    #[test]
    fn test_no_safe_heading_keeps_current() {
        let arena = Arena::new(10, 10);
        // Cornered at (1, 1) with the only open side taken by a rival.
        let mut me = cycle(EntityId::SECOND, 2, 2, Direction::Up);
        drive(&mut me, &[Direction::Up, Direction::Left]);
        assert_eq!(me.position(), Point::new(1, 1));
        let mut blocker = cycle(EntityId::FIRST, 1, 3, Direction::Up);
        drive(&mut blocker, &[Direction::Up]);

        let bot = BotController::default();
        let others = [blocker];
        let mut rng = SessionRng::new(3);
        assert!(bot.score_candidates(&view(arena, &me, &others), &mut rng).is_empty());
        assert_eq!(bot.calculate_move(&view(arena, &me, &others), &mut rng), Direction::Left);
    }

    #[test]
    fn test_ties_break_in_canonical_order() {
        let arena = Arena::new(21, 21);
        let me = cycle(EntityId::SECOND, 10, 10, Direction::Right);
        let weights = BotWeights {
            space: 0,
            wall_distance: 0,
            straight_bonus: 0,
            lookahead: 0,
            mobility: 0,
            opponent_avoid_bonus: 0,
            ..BotWeights::default()
        };
        let bot = BotController::new(weights);
        // Up, Down and Right all score zero; Up comes first.
        assert_eq!(
            bot.calculate_move(&view(arena, &me, &[]), &mut SessionRng::new(0)),
            Direction::Up
        );
    }

    #[test]
    fn test_holds_course_in_open_field() {
        let arena = Arena::new(40, 40);
        let me = cycle(EntityId::SECOND, 20, 20, Direction::Left);
        let bot = BotController::default();
        assert_eq!(
            bot.calculate_move(&view(arena, &me, &[]), &mut SessionRng::new(0)),
            Direction::Left
        );
    }

    #[test]
    fn test_space_never_drops_when_own_trail_shrinks() {
        let arena = Arena::new(14, 14);
        let opponent = {
            let mut c = cycle(EntityId::FIRST, 10, 1, Direction::Down);
            drive(&mut c, &[Direction::Down; 8]);
            c
        };
        let moves = [
            Direction::Up,
            Direction::Up,
            Direction::Up,
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Down,
        ];
        let bot = BotController::new(BotWeights {
            flood_fill_cap: usize::MAX,
            ..BotWeights::default()
        });
        let others = [opponent];

        // Same final position each time, but a longer history behind it.
        let mut previous: Option<Vec<CandidateScore>> = None;
        for skipped in (0..3).rev() {
            let mut me = cycle(EntityId::SECOND, 4, 9 - skipped as i32, Direction::Up);
            drive(&mut me, &moves[skipped..]);
            let scores = bot.score_candidates(&view(arena, &me, &others), &mut SessionRng::new(0));
            if let Some(shorter) = &previous {
                for candidate in &scores {
                    if let Some(before) = shorter.iter().find(|c| c.direction == candidate.direction) {
                        assert!(before.available_space >= candidate.available_space);
                    }
                }
            }
            previous = Some(scores);
        }
    }

    #[test]
    fn test_huge_weights_saturate_instead_of_overflowing() {
        let arena = Arena::new(40, 20);
        let me = cycle(EntityId::SECOND, 20, 10, Direction::Right);
        let weights = BotWeights {
            space: i64::MAX / 2,
            wall_distance: i64::MAX,
            straight_bonus: i64::MAX,
            lookahead: i64::MAX,
            mobility: i64::MAX,
            opponent_avoid_bonus: i64::MAX,
            jitter: i64::MAX,
            ..BotWeights::default()
        };
        assert!(weights.validate().is_ok());

        let bot = BotController::new(weights);
        let mut rng = SessionRng::new(42);
        let scores = bot.score_candidates(&view(arena, &me, &[]), &mut rng);

        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|c| c.score == i64::MAX));
        // Equal saturated scores fall back to the canonical order.
        assert_eq!(bot.calculate_move(&view(arena, &me, &[]), &mut rng), Direction::Up);
    }

    #[test]
    fn test_jitter_is_seeded() {
        let arena = Arena::new(30, 30);
        let me = cycle(EntityId::SECOND, 15, 15, Direction::Up);
        let bot = BotController::new(BotWeights {
            jitter: 500,
            ..BotWeights::default()
        });
        let first = bot.score_candidates(&view(arena, &me, &[]), &mut SessionRng::new(11));
        let second = bot.score_candidates(&view(arena, &me, &[]), &mut SessionRng::new(11));
        assert_eq!(first, second);
    }
}
