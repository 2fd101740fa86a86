//! Win detection.

use crate::board::Board;
use crate::position::Position;
use crate::types::PlayerNumber;
use tracing::instrument;

/// The 8 winning lines: rows, columns, diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(seat)` when all three squares of a line carry the same
/// player number, `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<PlayerNumber> {
    for [a, b, c] in LINES {
        if let Some(seat) = board.owner(a)
            && board.owner(b) == Some(seat)
            && board.owner(c) == Some(seat)
        {
            return Some(seat);
        }
    }

    None
}
