//! First-class actions against a running match.
//!
//! Actions carry the caller's intent exactly as submitted, including wire
//! values that may be out of range. Contracts decide whether they apply.

use crate::position::Position;
use crate::types::{PlayerNumber, Principal};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A request to place a mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Turn {
    /// Who submitted the turn.
    caller: Principal,
    /// Turn counter the caller believes is current.
    turn_number: u32,
    /// Seat the caller claims to play (wire value `1` or `2`).
    player_number: u8,
    /// Target square (wire index).
    square: u8,
}

impl Turn {
    /// Target square, if in bounds.
    pub fn position(&self) -> Option<Position> {
        Position::from_square(self.square)
    }

    /// Claimed seat, if the wire value names one.
    pub fn seat(&self) -> Option<PlayerNumber> {
        PlayerNumber::from_u8(self.player_number)
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "turn {} by {} (seat {}) -> square {}",
            self.turn_number, self.caller, self.player_number, self.square
        )
    }
}

/// A request to clear an occupied square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Bomb {
    /// Who dropped the bomb.
    caller: Principal,
    /// Target square (wire index).
    square: u8,
}

impl Bomb {
    /// Target square, if in bounds.
    pub fn position(&self) -> Option<Position> {
        Position::from_square(self.square)
    }
}

impl std::fmt::Display for Bomb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bomb by {} -> square {}", self.caller, self.square)
    }
}
