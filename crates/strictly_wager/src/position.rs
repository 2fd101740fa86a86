//! Board squares addressed by name or by wire index.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A square on the board (wire index 0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Top-left (square 0)
    TopLeft,
    /// Top-center (square 1)
    TopCenter,
    /// Top-right (square 2)
    TopRight,
    /// Middle-left (square 3)
    MiddleLeft,
    /// Center (square 4)
    Center,
    /// Middle-right (square 5)
    MiddleRight,
    /// Bottom-left (square 6)
    BottomLeft,
    /// Bottom-center (square 7)
    BottomCenter,
    /// Bottom-right (square 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in wire order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        match self {
            Position::TopLeft => 0,
            Position::TopCenter => 1,
            Position::TopRight => 2,
            Position::MiddleLeft => 3,
            Position::Center => 4,
            Position::MiddleRight => 5,
            Position::BottomLeft => 6,
            Position::BottomCenter => 7,
            Position::BottomRight => 8,
        }
    }

    /// Creates a position from a wire square number; `None` when out of bounds.
    #[instrument]
    pub fn from_square(square: u8) -> Option<Self> {
        Self::ALL.get(usize::from(square)).copied()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.to_index())
    }
}
