//! Bomb ledger invariant: every bomb is either left or used.

use super::Invariant;
use crate::game::Match;

/// Invariant: `bombs_remaining + items_used == bomb_cap`.
pub struct BombLedgerInvariant;

impl Invariant<Match> for BombLedgerInvariant {
    fn holds(game: &Match) -> bool {
        u16::from(*game.bombs_remaining()) + u16::from(*game.items_used())
            == u16::from(*game.bomb_cap())
    }

    fn description() -> &'static str {
        "Remaining plus used bombs equals the cap"
    }
}
