//! Decision state of a match.

use crate::types::Principal;
use serde::{Deserialize, Serialize};

/// Outcome of a match.
///
/// `Pending` and `Draw` are distinct states, so "not decided yet" can never
/// be confused with "decided with no winner".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "winner", rename_all = "lowercase")]
pub enum Outcome {
    /// Match still running.
    #[default]
    Pending,
    /// Match ended without a winner (full board or admin force-draw).
    Draw,
    /// Match won by the given principal.
    Won(Principal),
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<&Principal> {
        match self {
            Outcome::Won(player) => Some(player),
            Outcome::Pending | Outcome::Draw => None,
        }
    }

    /// Returns true once the outcome is decided.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    /// Returns true if the match was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pending => write!(f, "Pending"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Won(player) => write!(f, "{} wins", player),
        }
    }
}
