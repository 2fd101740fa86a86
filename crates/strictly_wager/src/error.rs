//! Engine error types.

use crate::award::AwardError;
use crate::position::Position;
use crate::token::TokenError;
use crate::types::{Amount, Currency, MatchId};
use serde::Serialize;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Caller mistake; safe to retry with corrected input.
    Validation,
    /// The action can never apply to this match in its current lifecycle.
    State,
    /// Caller lacks the right to perform the action.
    Authorization,
    /// Referenced match or award does not exist.
    NotFound,
    /// An external capability (token or award registry) refused the action.
    External,
    /// Engine bookkeeping failed; indicates a bug.
    Internal,
}

/// Error returned by every mutating engine action and by keyed queries.
///
/// A failed action leaves engine state untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// The match is not in progress.
    #[display("Match is over")]
    MatchOver,

    /// Buy-in amount differs from the required stake.
    #[display("Incorrect buy-in: expected {} but got {}", expected, actual)]
    IncorrectBuyIn {
        /// Required stake.
        expected: Amount,
        /// Offered amount.
        actual: Amount,
    },

    /// Fewer than two players registered.
    #[display("Not enough players to start a match")]
    NotEnoughPlayers,

    /// Both player slots are taken.
    #[display("Match already has two players")]
    TooManyPlayers,

    /// Wrong seat, wrong caller for the seat, or stale turn number.
    #[display("Out of turn")]
    OutOfTurn,

    /// Square index outside 0-8.
    #[display("Square {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(u8),

    /// Square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The registered players already have a running match.
    #[display("Match {} is already in progress", _0)]
    MatchInProgress(MatchId),

    /// Buy-in paid in a currency the lobby does not accept.
    #[display("Currency {} not accepted, lobby takes {}", offered, accepted)]
    CurrencyNotAccepted {
        /// Currency offered by the caller.
        offered: Currency,
        /// Currency the lobby accepts.
        accepted: Currency,
    },

    /// The shared bomb counter is exhausted.
    #[display("No bombs remaining")]
    NoBombsRemaining,

    /// Bomb aimed at an empty square.
    #[display("Square {} is empty", _0)]
    SquareEmpty(Position),

    /// Caller may not perform the action.
    #[display("Unauthorized")]
    Unauthorized,

    /// No award exists for the match.
    #[display("No award for match {}", _0)]
    UnknownMatch(MatchId),

    /// No match with the given id.
    #[display("Match {} not found", _0)]
    MatchNotFound(MatchId),

    /// No match has been started yet.
    #[display("No active match")]
    NoActiveMatch,

    /// Token capability refused a transfer.
    #[display("Token error: {}", _0)]
    Token(TokenError),

    /// Award capability refused a mint or burn.
    #[display("Award error: {}", _0)]
    Award(AwardError),

    /// Amount arithmetic overflowed.
    #[display("Arithmetic overflow")]
    Overflow,

    /// A postcondition failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl EngineError {
    /// Stable numeric code for the failure kind.
    pub fn code(&self) -> u32 {
        match self {
            EngineError::MatchOver => 3001,
            EngineError::IncorrectBuyIn { .. } => 3002,
            EngineError::NotEnoughPlayers => 3003,
            EngineError::TooManyPlayers => 3004,
            EngineError::OutOfTurn => 3005,
            EngineError::OutOfBounds(_) => 3006,
            EngineError::SquareOccupied(_) => 3007,
            EngineError::MatchInProgress(_) => 3008,
            EngineError::CurrencyNotAccepted { .. } => 3009,
            EngineError::NoBombsRemaining => 3011,
            EngineError::SquareEmpty(_) => 3012,
            EngineError::Unauthorized => 2100,
            EngineError::UnknownMatch(_) => 2002,
            EngineError::MatchNotFound(_) | EngineError::NoActiveMatch => 4004,
            EngineError::Token(_) => 5001,
            EngineError::Award(_) => 5002,
            EngineError::Overflow => 5003,
            EngineError::InvariantViolation(_) => 5000,
        }
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::MatchOver => "match-over",
            EngineError::IncorrectBuyIn { .. } => "incorrect-buy-in",
            EngineError::NotEnoughPlayers => "not-enough-players",
            EngineError::TooManyPlayers => "too-many-players",
            EngineError::OutOfTurn => "out-of-turn",
            EngineError::OutOfBounds(_) => "out-of-bounds",
            EngineError::SquareOccupied(_) => "square-occupied",
            EngineError::MatchInProgress(_) => "match-in-progress",
            EngineError::CurrencyNotAccepted { .. } => "currency-not-accepted",
            EngineError::NoBombsRemaining => "no-bombs-remaining",
            EngineError::SquareEmpty(_) => "square-empty",
            EngineError::Unauthorized => "unauthorized",
            EngineError::UnknownMatch(_) => "unknown-match",
            EngineError::MatchNotFound(_) | EngineError::NoActiveMatch => "not-found",
            EngineError::Token(_) => "token",
            EngineError::Award(_) => "award",
            EngineError::Overflow => "overflow",
            EngineError::InvariantViolation(_) => "invariant-violation",
        }
    }

    /// Retry semantics of the failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::IncorrectBuyIn { .. }
            | EngineError::OutOfTurn
            | EngineError::OutOfBounds(_)
            | EngineError::SquareOccupied(_)
            | EngineError::SquareEmpty(_)
            | EngineError::CurrencyNotAccepted { .. } => ErrorCategory::Validation,
            EngineError::MatchOver
            | EngineError::NotEnoughPlayers
            | EngineError::TooManyPlayers
            | EngineError::MatchInProgress(_)
            | EngineError::NoBombsRemaining => ErrorCategory::State,
            EngineError::Unauthorized => ErrorCategory::Authorization,
            EngineError::UnknownMatch(_)
            | EngineError::MatchNotFound(_)
            | EngineError::NoActiveMatch => ErrorCategory::NotFound,
            EngineError::Token(_) | EngineError::Award(_) => ErrorCategory::External,
            EngineError::Overflow | EngineError::InvariantViolation(_) => ErrorCategory::Internal,
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Token(err) => Some(err),
            EngineError::Award(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TokenError> for EngineError {
    fn from(err: TokenError) -> Self {
        EngineError::Token(err)
    }
}

impl From<AwardError> for EngineError {
    fn from(err: AwardError) -> Self {
        EngineError::Award(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_distinguish_kinds() {
        assert_eq!(EngineError::Unauthorized.code(), 2100);
        assert_eq!(EngineError::MatchNotFound(999).code(), 4004);
        assert_eq!(EngineError::UnknownMatch(999).code(), 2002);
        assert_eq!(EngineError::SquareEmpty(Position::TopLeft).code(), 3012);
        assert_ne!(
            EngineError::NoBombsRemaining.code(),
            EngineError::SquareEmpty(Position::Center).code()
        );
    }

    #[test]
    fn test_categories_follow_retry_semantics() {
        assert_eq!(
            EngineError::IncorrectBuyIn { expected: 1, actual: 2 }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(EngineError::MatchOver.category(), ErrorCategory::State);
        assert_eq!(EngineError::Unauthorized.category(), ErrorCategory::Authorization);
    }

    #[test]
    fn test_display_mentions_amounts() {
        let err = EngineError::IncorrectBuyIn {
            expected: 1_000_000,
            actual: 500_000,
        };
        assert_eq!(err.to_string(), "Incorrect buy-in: expected 1000000 but got 500000");
    }
}
