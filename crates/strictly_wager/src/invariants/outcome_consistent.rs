//! Outcome invariant: the recorded outcome agrees with the board.

use super::Invariant;
use crate::game::Match;
use crate::outcome::Outcome;
use crate::rules;

/// Invariant: The outcome matches the board and settlement follows it.
///
/// A won match shows a line for the winner's seat; a pending match shows no
/// line and still has an empty square. Draws may be forced on any board.
/// Claims and paid fees only exist once the match is decided.
pub struct OutcomeConsistentInvariant;

impl Invariant<Match> for OutcomeConsistentInvariant {
    fn holds(game: &Match) -> bool {
        let line = rules::check_winner(game.board());
        let board_agrees = match game.outcome() {
            Outcome::Pending => line.is_none() && !rules::is_full(game.board()),
            Outcome::Won(winner) => {
                line.is_some() && line == game.player_number_of(winner)
            }
            Outcome::Draw => true,
        };
        let settled = game.claimed().iter().any(|c| *c) || *game.fees_paid();
        board_agrees && (!settled || game.outcome().is_terminal())
    }

    fn description() -> &'static str {
        "Outcome agrees with the board and claims follow a decided outcome"
    }
}
