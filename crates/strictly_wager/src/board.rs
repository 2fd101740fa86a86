//! The 3x3 board and the marks written onto it.

use crate::position::Position;
use crate::types::{PlayerNumber, Principal};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A mark left on a square by an accepted turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Cell {
    /// Turn counter value at the moment the mark was placed.
    turn: u32,
    /// Seat of the player who placed the mark.
    player_number: PlayerNumber,
    /// Principal who placed the mark.
    player: Principal,
}

/// 3x3 board of optional marks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Option<Cell>; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the mark at the given position.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.squares[pos.to_index()].as_ref()
    }

    /// Writes a mark, replacing whatever was there.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.squares[pos.to_index()] = Some(cell);
    }

    /// Removes the mark at the position, returning it.
    pub fn clear(&mut self, pos: Position) -> Option<Cell> {
        self.squares[pos.to_index()].take()
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Seat that owns the square, if any.
    pub fn owner(&self, pos: Position) -> Option<PlayerNumber> {
        self.get(pos).map(|cell| cell.player_number)
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Option<Cell>; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }
}
