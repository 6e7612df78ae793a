use rand::Rng;

use crate::{Coord, Coords, TermInt};

/// True if (x, y) is on the playable area. The top and bottom rows are
/// reserved for text.
pub fn in_bounds(x: Coord, y: Coord, width: Coord, height: Coord) -> bool {
    0 <= x && x < width && 1 <= y && y < height - 1
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub width: TermInt,
    pub height: TermInt,
}

impl Bounds {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        Bounds { width, height }
    }

    pub fn contains(&self, pos: Coords) -> bool {
        in_bounds(pos.0, pos.1, self.width as Coord, self.height as Coord)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height < 3
    }

    /// Uniformly random playable cell, None when there are none.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Option<Coords> {
        if self.is_empty() {
            return None;
        }

        let x = rng.gen_range(0..self.width as Coord);
        let y = rng.gen_range(1..self.height as Coord - 1);
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_in_bounds_edges() {
        assert!(in_bounds(0, 1, 10, 10));
        assert!(in_bounds(9, 8, 10, 10));

        assert!(!in_bounds(-1, 5, 10, 10));
        assert!(!in_bounds(10, 5, 10, 10));
        assert!(!in_bounds(5, 0, 10, 10));
        assert!(!in_bounds(5, 9, 10, 10));
    }

    #[test]
    fn test_degenerate_bounds() {
        let mut rng = StdRng::seed_from_u64(7);

        for bounds in [Bounds::new(0, 10), Bounds::new(10, 2), Bounds::new(10, 0)].iter() {
            assert!(bounds.is_empty());
            assert_eq!(bounds.random_cell(&mut rng), None);
        }

        let single_row = Bounds::new(4, 3);
        assert!(!single_row.is_empty());
        assert_eq!(single_row.random_cell(&mut rng).map(|c| c.1), Some(1));
    }

    #[test]
    fn test_random_cells_are_in_bounds() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let bounds = Bounds::new(12, 7);

        for _ in 0..1000 {
            let cell = bounds.random_cell(&mut rng).unwrap();
            assert!(bounds.contains(cell), "{:?} outside {:?}", cell, bounds);
        }
    }
}
