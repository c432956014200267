mod cell;
mod coord;

pub use cell::*;
pub use coord::*;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ActionRejected;

/// Largest side length a grid can have.
pub const MAX_BOARD_SIZE: u32 = 1024;

/// A square map of cells, each holding at most one vessel or fish.
///
/// Coordinates outside `[0, size)` are never stored. Queries about them
/// answer as if the cell were blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    /// Row-major, indexed by `y * size + x`.
    cells: Vec<CellContent>,
}

impl Grid {
    /// Creates an empty `size` x `size` grid. Sizes above [`MAX_BOARD_SIZE`]
    /// are clamped to it.
    pub fn new(size: u32) -> Self {
        let side = size.min(MAX_BOARD_SIZE) as usize;
        Self {
            size: side as i32,
            cells: vec![CellContent::Empty; side * side],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size && y < self.size
    }

    /// Out-of-bounds positions count as occupied.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(idx) => !self.cells[idx].is_empty(),
            None => true,
        }
    }

    /// The content of a cell, or `None` when out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<CellContent> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Puts an occupant into an empty cell.
    pub fn place(&mut self, x: i32, y: i32, occupant: CellContent) -> Result<(), ActionRejected> {
        let idx = self
            .index(x, y)
            .ok_or(ActionRejected::InvalidPosition { x, y })?;
        if !self.cells[idx].is_empty() {
            return Err(ActionRejected::CellOccupied { x, y });
        }
        self.cells[idx] = occupant;
        Ok(())
    }

    /// Clears a cell, returning what was in it.
    pub fn remove(&mut self, x: i32, y: i32) -> Option<CellContent> {
        let idx = self.index(x, y)?;
        let previous = std::mem::take(&mut self.cells[idx]);
        (!previous.is_empty()).then_some(previous)
    }

    /// Moves whatever is at `from` to `to`.
    ///
    /// Returns `false` and leaves the grid untouched when either endpoint is
    /// out of bounds, `from` is empty, or `to` is already taken.
    pub fn move_occupant(&mut self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> bool {
        let (Some(from), Some(to)) = (self.index(from_x, from_y), self.index(to_x, to_y)) else {
            return false;
        };
        if from == to || self.cells[from].is_empty() || !self.cells[to].is_empty() {
            return false;
        }
        self.cells[to] = std::mem::take(&mut self.cells[from]);
        true
    }

    /// All unoccupied in-bounds cells within Manhattan distance `max_manhattan`
    /// of `(x, y)`, excluding `(x, y)` itself.
    ///
    /// The cells are listed with `dx` ascending and, for equal `dx`, `dy`
    /// ascending. Callers that break ties by position rely on this order.
    pub fn valid_moves(&self, x: i32, y: i32, max_manhattan: u32) -> Vec<Coord> {
        // No cell is further away than the board's own diameter.
        let k = max_manhattan.min(2 * self.size as u32 + 2) as i32;
        let last = self.size - 1;
        let mut moves = Vec::new();
        for dx in (-k).max(-x)..=k.min(last - x) {
            // Restricting dy to the remaining budget yields the diamond directly.
            let rest = k - dx.abs();
            for dy in (-rest).max(-y)..=rest.min(last - y) {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if !self.is_occupied(nx, ny) {
                    moves.push(Coord::new(nx, ny));
                }
            }
        }
        moves
    }

    /// Every empty cell, column by column.
    pub fn unoccupied_positions(&self) -> Vec<Coord> {
        let mut free = Vec::new();
        for x in 0..self.size {
            for y in 0..self.size {
                if !self.is_occupied(x, y) {
                    free.push(Coord::new(x, y));
                }
            }
        }
        free
    }

    /// Samples uniformly among the cells that are empty right now.
    ///
    /// Returns `None` when the board is full.
    pub fn random_unoccupied<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        self.unoccupied_positions().choose(rng).copied()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_position(x, y)
            .then(|| (y * self.size + x) as usize)
    }
}
