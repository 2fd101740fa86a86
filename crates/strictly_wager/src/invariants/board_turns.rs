//! Board turn invariant: every mark carries a unique turn below the counter.

use super::Invariant;
use crate::game::Match;
use std::collections::HashSet;

/// Invariant: Each mark was placed by an accepted turn.
///
/// Turn ids on the board are strictly below the counter and pairwise
/// distinct. Bombs may remove marks, so gaps are allowed.
pub struct BoardTurnsInvariant;

impl Invariant<Match> for BoardTurnsInvariant {
    fn holds(game: &Match) -> bool {
        let mut seen = HashSet::new();
        game.board()
            .squares()
            .iter()
            .flatten()
            .all(|cell| *cell.turn() < *game.turn() && seen.insert(*cell.turn()))
    }

    fn description() -> &'static str {
        "Board turn ids are below the counter and distinct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::tests::{fresh, play};

    #[test]
    fn test_fresh_match_holds() {
        assert!(BoardTurnsInvariant::holds(&fresh()));
    }

    #[test]
    fn test_holds_after_turns() {
        let mut game = fresh();
        for square in [4, 0, 8] {
            play(&mut game, square).unwrap();
        }
        assert!(BoardTurnsInvariant::holds(&game));
    }

    #[test]
    fn test_rewound_counter_violates() {
        let mut game = fresh();
        play(&mut game, 4).unwrap();
        assert!(!BoardTurnsInvariant::holds(&game.with_counters(0, 3)));
    }
}
