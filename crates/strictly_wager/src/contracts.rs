//! Contract-based validation for match transitions.
//!
//! Contracts define correctness through preconditions and postconditions.
//! Each precondition is a named struct; composites fix the order in which
//! they run, which is also the order in which callers see failures.

use crate::action::{Bomb, Turn};
use crate::error::EngineError;
use crate::game::Match;
use crate::invariants::{InvariantSet, MatchInvariants};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), EngineError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), EngineError>;
}

// ─────────────────────────────────────────────────────────────
//  Shared Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The match must still accept actions.
pub struct MatchIsLive;

impl MatchIsLive {
    /// Fails with [`EngineError::MatchOver`] on a decided match.
    #[instrument(skip(game), fields(match_id = game.id()))]
    pub fn check(game: &Match) -> Result<(), EngineError> {
        if game.is_live() {
            Ok(())
        } else {
            warn!(outcome = %game.outcome(), "Action on finished match");
            Err(EngineError::MatchOver)
        }
    }
}

/// Precondition: The target square must exist.
pub struct SquareInBounds;

impl SquareInBounds {
    /// Fails with [`EngineError::OutOfBounds`] for squares past 8.
    #[instrument]
    pub fn check(square: u8) -> Result<(), EngineError> {
        if crate::position::Position::from_square(square).is_some() {
            Ok(())
        } else {
            Err(EngineError::OutOfBounds(square))
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Turn Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The claimed seat is the active one and belongs to the caller.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`EngineError::OutOfTurn`].
    #[instrument(skip(game, turn), fields(seat = turn.player_number()))]
    pub fn check(turn: &Turn, game: &Match) -> Result<(), EngineError> {
        match turn.seat() {
            Some(seat) if seat == *game.active_player() && game.player(seat) == turn.caller() => {
                Ok(())
            }
            _ => {
                warn!(
                    caller = %turn.caller(),
                    active = %game.active_player(),
                    "Turn submitted out of turn"
                );
                Err(EngineError::OutOfTurn)
            }
        }
    }
}

/// Precondition: The caller's turn number matches the counter.
pub struct TurnTokenMatches;

impl TurnTokenMatches {
    /// Fails with [`EngineError::OutOfTurn`] on a stale or future token.
    #[instrument(skip(game, turn))]
    pub fn check(turn: &Turn, game: &Match) -> Result<(), EngineError> {
        if turn.turn_number() == game.turn() {
            Ok(())
        } else {
            warn!(
                submitted = turn.turn_number(),
                expected = game.turn(),
                "Turn number mismatch"
            );
            Err(EngineError::OutOfTurn)
        }
    }
}

/// Precondition: The target square is free.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Fails with [`EngineError::SquareOccupied`].
    #[instrument(skip(game))]
    pub fn check(square: u8, game: &Match) -> Result<(), EngineError> {
        let position =
            crate::position::Position::from_square(square).ok_or(EngineError::OutOfBounds(square))?;
        if game.board().is_empty(position) {
            Ok(())
        } else {
            Err(EngineError::SquareOccupied(position))
        }
    }
}

/// Composite precondition for turns.
pub struct LegalTurn;

impl LegalTurn {
    /// Validates all preconditions for a turn, in reporting order.
    #[instrument(skip(turn, game))]
    pub fn check(turn: &Turn, game: &Match) -> Result<(), EngineError> {
        MatchIsLive::check(game)?;
        SquareInBounds::check(*turn.square())?;
        PlayersTurn::check(turn, game)?;
        TurnTokenMatches::check(turn, game)?;
        SquareIsEmpty::check(*turn.square(), game)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Bomb Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The caller plays in this match.
pub struct CallerIsParticipant;

impl CallerIsParticipant {
    /// Fails with [`EngineError::Unauthorized`].
    #[instrument(skip(game, bomb), fields(caller = %bomb.caller()))]
    pub fn check(bomb: &Bomb, game: &Match) -> Result<(), EngineError> {
        if game.player_number_of(bomb.caller()).is_some() {
            Ok(())
        } else {
            warn!("Bomb from non-participant");
            Err(EngineError::Unauthorized)
        }
    }
}

/// Precondition: The bombed square holds a mark.
pub struct SquareIsOccupied;

impl SquareIsOccupied {
    /// Fails with [`EngineError::SquareEmpty`].
    #[instrument(skip(game))]
    pub fn check(square: u8, game: &Match) -> Result<(), EngineError> {
        let position =
            crate::position::Position::from_square(square).ok_or(EngineError::OutOfBounds(square))?;
        if game.board().is_empty(position) {
            Err(EngineError::SquareEmpty(position))
        } else {
            Ok(())
        }
    }
}

/// Precondition: The shared bomb counter is not exhausted.
pub struct BombsRemain;

impl BombsRemain {
    /// Fails with [`EngineError::NoBombsRemaining`].
    #[instrument(skip(game), fields(remaining = game.bombs_remaining()))]
    pub fn check(game: &Match) -> Result<(), EngineError> {
        if *game.bombs_remaining() > 0 {
            Ok(())
        } else {
            Err(EngineError::NoBombsRemaining)
        }
    }
}

/// Composite precondition for bombs.
pub struct LegalBomb;

impl LegalBomb {
    /// Validates all preconditions for a bomb, in reporting order.
    #[instrument(skip(bomb, game))]
    pub fn check(bomb: &Bomb, game: &Match) -> Result<(), EngineError> {
        MatchIsLive::check(game)?;
        SquareInBounds::check(*bomb.square())?;
        CallerIsParticipant::check(bomb, game)?;
        SquareIsOccupied::check(*bomb.square(), game)?;
        BombsRemain::check(game)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Contracts (Pre + Post)
// ─────────────────────────────────────────────────────────────

fn check_invariants(after: &Match) -> Result<(), EngineError> {
    MatchInvariants::check_all(after).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        EngineError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
    })
}

/// Contract for turns.
///
/// Postconditions: exactly one more mark, counter advanced by one, plus the
/// match invariants.
pub struct TurnContract;

impl Contract<Match, Turn> for TurnContract {
    fn pre(game: &Match, action: &Turn) -> Result<(), EngineError> {
        LegalTurn::check(action, game)
    }

    fn post(before: &Match, after: &Match) -> Result<(), EngineError> {
        if *after.turn() != before.turn() + 1 {
            return Err(EngineError::InvariantViolation(
                "Turn counter must advance by exactly one".to_string(),
            ));
        }
        if after.board().occupied() != before.board().occupied() + 1 {
            return Err(EngineError::InvariantViolation(
                "A turn must add exactly one mark".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Contract for bombs.
///
/// Postconditions: exactly one mark fewer, counter untouched, plus the match
/// invariants.
pub struct BombContract;

impl Contract<Match, Bomb> for BombContract {
    fn pre(game: &Match, action: &Bomb) -> Result<(), EngineError> {
        LegalBomb::check(action, game)
    }

    fn post(before: &Match, after: &Match) -> Result<(), EngineError> {
        if after.turn() != before.turn() || after.active_player() != before.active_player() {
            return Err(EngineError::InvariantViolation(
                "A bomb must not consume a turn".to_string(),
            ));
        }
        if after.board().occupied() + 1 != before.board().occupied() {
            return Err(EngineError::InvariantViolation(
                "A bomb must remove exactly one mark".to_string(),
            ));
        }
        check_invariants(after)
    }
}
