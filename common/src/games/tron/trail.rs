use std::collections::HashMap;

use super::types::{Direction, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrailSegment {
    pub cell: Point,
    pub entered_from: Direction,
    pub exited_to: Direction,
    pub is_head: bool,
}

/// Glyph hint for renderers. Corner names list the two screen edges the trail
/// touches inside the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentShape {
    Horizontal,
    Vertical,
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
}

impl TrailSegment {
    pub fn is_turn(&self) -> bool {
        self.entered_from != self.exited_to
    }

    pub fn shape(&self) -> SegmentShape {
        if !self.is_turn() || self.entered_from.is_opposite(&self.exited_to) {
            return if self.entered_from.is_horizontal() {
                SegmentShape::Horizontal
            } else {
                SegmentShape::Vertical
            };
        }

        // Moving in `entered_from` means the trail came in through the opposite edge.
        let came_through = self.entered_from.opposite();
        let vertical_edge = if came_through.is_horizontal() {
            self.exited_to
        } else {
            came_through
        };
        let horizontal_edge = if came_through.is_horizontal() {
            came_through
        } else {
            self.exited_to
        };

        match (vertical_edge, horizontal_edge) {
            (Direction::Up, Direction::Right) => SegmentShape::UpRight,
            (Direction::Up, _) => SegmentShape::UpLeft,
            (_, Direction::Right) => SegmentShape::DownRight,
            _ => SegmentShape::DownLeft,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Trail {
    segments: Vec<TrailSegment>,
    first_index: HashMap<Point, usize>,
}

impl Trail {
    pub fn new(start: Point, heading: Direction) -> Self {
        let mut trail = Self {
            segments: Vec::new(),
            first_index: HashMap::new(),
        };
        trail.seed(start, heading);
        trail
    }

    /// Drops every segment and starts over with a single head.
    pub fn reset(&mut self, start: Point, heading: Direction) {
        self.segments.clear();
        self.first_index.clear();
        self.seed(start, heading);
    }

    fn seed(&mut self, start: Point, heading: Direction) {
        self.segments.push(TrailSegment {
            cell: start,
            entered_from: heading,
            exited_to: heading,
            is_head: true,
        });
        self.first_index.insert(start, 0);
    }

    pub fn append_head(&mut self, cell: Point, heading: Direction) {
        if let Some(head) = self.segments.last_mut() {
            head.is_head = false;
            head.exited_to = heading;
        }
        self.first_index.entry(cell).or_insert(self.segments.len());
        self.segments.push(TrailSegment {
            cell,
            entered_from: heading,
            exited_to: heading,
            is_head: true,
        });
    }

    pub fn head(&self) -> &TrailSegment {
        self.segments
            .last()
            .expect("Trail is seeded on construction and never emptied")
    }

    pub fn segments(&self) -> &[TrailSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, cell: Point) -> bool {
        self.first_index.contains_key(&cell)
    }

    /// True if `cell` occurs among the oldest `len - tail_exclusion` segments.
    pub fn contains_excluding_tail(&self, cell: Point, tail_exclusion: usize) -> bool {
        let checked = self.segments.len().saturating_sub(tail_exclusion);
        self.first_index
            .get(&cell)
            .is_some_and(|&index| index < checked)
    }

    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments.iter().map(|segment| segment.cell)
    }
}
