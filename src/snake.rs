use std::collections::VecDeque;

use anyhow::Result;
use log::debug;

use crate::clock::Cadence;
use crate::grid::Bounds;
use crate::term::{Palette, Screen};
use crate::{Coord, Coords};
use Heading::*;
use MoveResult::*;

/// Compass heading. The discriminants are the ordinals turns are
/// computed on, clockwise order starting from East.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    Clockwise,
    Anticlockwise,
}

impl Heading {
    #[cfg(test)]
    pub const ALL: [Heading; 4] = [East, South, West, North];

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    /// Any integer maps onto a heading, negatives included.
    pub fn from_ordinal(n: i32) -> Heading {
        match n.rem_euclid(4) {
            0 => East,
            1 => South,
            2 => West,
            3 => North,
            r => unreachable!("rem_euclid(4) gave {}", r),
        }
    }

    pub fn clockwise(self) -> Heading {
        Heading::from_ordinal(self.ordinal() + 1)
    }

    pub fn anticlockwise(self) -> Heading {
        Heading::from_ordinal(self.ordinal() - 1)
    }

    pub fn reverse(self) -> Heading {
        Heading::from_ordinal(self.ordinal() + 2)
    }

    pub fn turned(self, turn: Turn) -> Heading {
        match turn {
            Turn::Clockwise => self.clockwise(),
            Turn::Anticlockwise => self.anticlockwise(),
        }
    }

    pub fn delta(self) -> (Coord, Coord) {
        match self {
            East => (1, 0),
            South => (0, 1),
            West => (-1, 0),
            North => (0, -1),
        }
    }

    pub fn step(self, pos: Coords) -> Coords {
        let (dx, dy) = self.delta();
        (pos.0 + dx, pos.1 + dy)
    }

    pub fn head_char(self) -> char {
        match self {
            East => '▶',
            South => '▼',
            West => '◀',
            North => '▲',
        }
    }
}

/// Glyph for a body cell entered heading `prev` and left heading `cur`.
///
/// Panics on a reversal, which the snake can never perform.
pub fn body_char(prev: Heading, cur: Heading) -> char {
    match (prev, cur) {
        (East, East) => '─',
        (East, South) => '┐',
        (East, North) => '┘',
        (South, East) => '└',
        (South, South) => '│',
        (South, West) => '┘',
        (West, South) => '┌',
        (West, West) => '─',
        (West, North) => '└',
        (North, East) => '┌',
        (North, West) => '┐',
        (North, North) => '│',
        (p, c) => panic!("no body glyph for reversal {:?} -> {:?}", p, c),
    }
}

/// One occupied cell, with the headings the snake had when passing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Segment {
    pos: Coords,
    pose: (Heading, Heading),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed,
}

pub struct Snake {
    heading: Heading,
    prev_heading: Heading,
    // Tail first, head last
    body: VecDeque<Segment>,
    grow_next_move: bool,
    dead: bool,
    timer: Cadence,
}

impl Snake {
    pub fn new(pos: Coords, heading: Heading, period_ms: u64) -> Self {
        let mut body = VecDeque::new();
        body.push_back(Segment { pos, pose: (heading, heading) });

        Snake {
            heading,
            prev_heading: heading,
            body,
            grow_next_move: false,
            dead: false,
            timer: Cadence::new(period_ms),
        }
    }

    pub fn head(&self) -> Coords {
        self.body.back().map(|s| s.pos).unwrap_or_else(|| unreachable!("snake without a head"))
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn body(&self) -> impl Iterator<Item = Coords> + '_ {
        self.body.iter().map(|s| s.pos)
    }

    pub fn score(&self) -> usize {
        self.body.len()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    /// Latches a turn for the next move. A turn that would point the snake
    /// back the way it came is dropped.
    pub fn turn(&mut self, turn: Turn) {
        let next = self.heading.turned(turn);
        if next == self.prev_heading.reverse() {
            debug!("Ignoring {:?} turn, {:?} would reverse {:?}", turn, next, self.prev_heading);
            return;
        }
        self.heading = next;
    }

    /// True if `pos` is occupied by any part of the snake except the head.
    pub fn eaten_itself(&self, pos: Coords) -> bool {
        pos != self.head() && self.body().any(|p| p == pos)
    }

    /// Advances the move timer and returns how many moves are due. A dead
    /// snake never has moves due.
    pub fn tick(&mut self, elapsed_ms: u64) -> u32 {
        let due = self.timer.advance(elapsed_ms);
        if self.dead {
            0
        } else {
            due
        }
    }

    /// Moves the head one cell: straight on if possible, otherwise
    /// clockwise, otherwise anticlockwise. With all three blocked the
    /// snake dies where it is.
    pub fn move_step(&mut self, bounds: Bounds) -> MoveResult {
        if self.dead {
            return Crashed;
        }

        let old_head = self.head();
        let heading = self.heading;
        if let Some(seg) = self.body.back_mut() {
            seg.pose = (self.prev_heading, heading);
        }

        let choice = [heading, heading.clockwise(), heading.anticlockwise()]
            .iter()
            .map(|&h| (h, h.step(old_head)))
            .find(|&(_, pos)| bounds.contains(pos) && !self.eaten_itself(pos));

        let (new_heading, new_head) = match choice {
            Some(c) => c,
            None => {
                self.dead = true;
                return Crashed;
            }
        };

        self.body.push_back(Segment { pos: new_head, pose: (new_heading, new_heading) });

        let old_tail = if self.grow_next_move {
            self.grow_next_move = false;
            None
        } else {
            self.body.pop_front().map(|s| s.pos)
        };

        self.heading = new_heading;
        self.prev_heading = new_heading;

        Moved { new_head, old_tail }
    }

    pub fn render<S: Screen>(&self, screen: &mut S) -> Result<()> {
        screen.draw(self.head(), self.heading.head_char(), Palette::Snake, true)?;

        for seg in self.body.iter().take(self.body.len() - 1) {
            let (prev, cur) = seg.pose;
            screen.draw(seg.pos, body_char(prev, cur), Palette::Snake, true)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: &[Coords], heading: Heading) -> Self {
        let mut snake = Snake::new(cells[0], heading, 15);
        snake.body = cells
            .iter()
            .map(|&pos| Segment { pos, pose: (heading, heading) })
            .collect();
        snake
    }
}
