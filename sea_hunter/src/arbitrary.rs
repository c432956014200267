use std::collections::BTreeSet;

use quickcheck::{Arbitrary, Gen};

use crate::{CellContent, Coord, FishId, Grid, MovementCard, CARD_CATALOG};

impl Arbitrary for MovementCard {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&CARD_CATALOG).unwrap()
    }
}

/// A small board with some cells taken, and a point to query moves from.
#[derive(Clone, Debug)]
pub struct OccupiedGridInput {
    pub size: u32,
    pub occupied: BTreeSet<Coord>,
    // May itself be occupied, or even lie off the board
    pub origin: Coord,
    pub budget: u32,
}

impl OccupiedGridInput {
    pub fn build(&self) -> Grid {
        let mut grid = Grid::new(self.size);
        for (i, c) in self.occupied.iter().enumerate() {
            let content = if i % 2 == 0 {
                CellContent::Vessel(i)
            } else {
                CellContent::Fish(FishId(i))
            };
            grid.place(c.x, c.y, content).unwrap();
        }
        grid
    }
}

impl Arbitrary for OccupiedGridInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = 2 + u32::arbitrary(g) % 9;
        let side = size as i32;
        let mut occupied = BTreeSet::new();
        for _ in 0..u8::arbitrary(g) % 16 {
            let x = (u8::arbitrary(g) as i32) % side;
            let y = (u8::arbitrary(g) as i32) % side;
            occupied.insert(Coord::new(x, y));
        }
        // One cell of slack on each side
        let origin = Coord::new(
            (u8::arbitrary(g) as i32) % (side + 2) - 1,
            (u8::arbitrary(g) as i32) % (side + 2) - 1,
        );
        OccupiedGridInput {
            size,
            occupied,
            origin,
            budget: u32::arbitrary(g) % 8,
        }
    }
}
