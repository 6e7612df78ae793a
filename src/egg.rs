use anyhow::Result;
use rand::Rng;

use crate::clock::Cadence;
use crate::grid::Bounds;
use crate::term::{Palette, Screen};
use crate::Coords;

pub const EGG_ANIMATION: [char; 8] = ['-', '\\', '|', '/', '-', '\\', '|', '/'];

/// A spinning egg sitting still somewhere on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Egg {
    pos: Coords,
    frame: usize,
    timer: Cadence,
}

impl Egg {
    /// Places an egg on a random cell. Both the starting frame and the
    /// animation timer are random so a field of eggs doesn't spin in
    /// lockstep.
    pub fn spawn<R: Rng>(bounds: Bounds, period_ms: u64, rng: &mut R) -> Option<Self> {
        let pos = bounds.random_cell(rng)?;
        let frame = rng.gen_range(0..EGG_ANIMATION.len());
        let offset = rng.gen_range(0..period_ms);
        Some(Egg::new(pos, frame, period_ms, offset))
    }

    pub fn new(pos: Coords, frame: usize, period_ms: u64, offset_ms: u64) -> Self {
        Egg {
            pos,
            frame: frame % EGG_ANIMATION.len(),
            timer: Cadence::with_offset(period_ms, offset_ms),
        }
    }

    pub fn pos(&self) -> Coords {
        self.pos
    }

    pub fn glyph(&self) -> char {
        EGG_ANIMATION[self.frame]
    }

    pub fn tick(&mut self, elapsed_ms: u64) {
        let phases = self.timer.advance(elapsed_ms) as usize;
        self.frame = (self.frame + phases) % EGG_ANIMATION.len();
    }

    pub fn render<S: Screen>(&self, screen: &mut S) -> Result<()> {
        screen.draw(self.pos, self.glyph(), Palette::Egg, false)
    }
}
