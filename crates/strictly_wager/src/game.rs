//! The match record and its turn state machine.
//!
//! A [`Match`] owns everything the engine knows about one game: seats, stake,
//! pool, board, turn counter, bombs, outcome and settlement flags. Transitions
//! check their preconditions through [`crate::contracts`] and, in debug
//! builds, their postconditions through [`crate::invariants`].

use crate::action::{Bomb, Turn};
use crate::board::{Board, Cell};
use crate::contracts::{BombContract, Contract, TurnContract};
use crate::error::EngineError;
use crate::outcome::Outcome;
use crate::rules;
use crate::types::{Amount, Currency, MatchId, PlayerNumber, Principal};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// One wagered game between two seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Match {
    /// Sequence number, starting at `1`.
    id: MatchId,
    /// Seat one then seat two.
    players: [Principal; 2],
    /// Settlement currency.
    currency: Currency,
    /// Stake each player paid.
    stake: Amount,
    /// Funds held for this match (stakes plus bomb fees).
    pool: Amount,
    /// Current board.
    board: Board,
    /// Seat expected to move next.
    active_player: PlayerNumber,
    /// Next expected turn number; counts accepted turns.
    turn: u32,
    /// Bombs left, shared by both seats.
    bombs_remaining: u8,
    /// Bombs the match started with.
    bomb_cap: u8,
    /// Bombs used so far.
    items_used: u8,
    /// Decision state.
    outcome: Outcome,
    /// Settlement taken, per seat.
    claimed: [bool; 2],
    /// Holder of the award minted for this match.
    nft_owner: Option<Principal>,
    /// Whether the creator cut has left custody.
    fees_paid: bool,
}

impl Match {
    /// Opens a fresh match: empty board, turn 0, seat one to move.
    #[instrument(skip(players), fields(one = %players[0], two = %players[1]))]
    pub fn start(
        id: MatchId,
        players: [Principal; 2],
        currency: Currency,
        stake: Amount,
        pool: Amount,
        bomb_cap: u8,
    ) -> Self {
        info!(id, %currency, stake, pool, "Match started");
        Self {
            id,
            players,
            currency,
            stake,
            pool,
            board: Board::new(),
            active_player: PlayerNumber::One,
            turn: 0,
            bombs_remaining: bomb_cap,
            bomb_cap,
            items_used: 0,
            outcome: Outcome::Pending,
            claimed: [false; 2],
            nft_owner: None,
            fees_paid: false,
        }
    }

    /// Principal sitting in `seat`.
    pub fn player(&self, seat: PlayerNumber) -> &Principal {
        &self.players[seat.index()]
    }

    /// Seat held by `principal`, if they play in this match.
    pub fn player_number_of(&self, principal: &Principal) -> Option<PlayerNumber> {
        [PlayerNumber::One, PlayerNumber::Two]
            .into_iter()
            .find(|seat| self.player(*seat) == principal)
    }

    /// True while turns and bombs are accepted.
    pub fn is_live(&self) -> bool {
        !self.outcome.is_terminal()
    }

    /// Whether `seat` has taken its settlement.
    pub fn has_claimed(&self, seat: PlayerNumber) -> bool {
        self.claimed[seat.index()]
    }

    /// Applies a turn and evaluates the board.
    ///
    /// Returns the outcome after the turn. On error the match is unchanged.
    #[instrument(skip(self), fields(match_id = self.id, turn = %action))]
    pub fn apply_turn(&mut self, action: &Turn) -> Result<&Outcome, EngineError> {
        TurnContract::pre(self, action)?;
        let before = self.clone();

        let position = action.position().ok_or(EngineError::OutOfBounds(*action.square()))?;
        let seat = self.active_player;
        self.board
            .set(position, Cell::new(self.turn, seat, action.caller().clone()));
        self.turn += 1;
        self.active_player = seat.opponent();
        self.outcome = self.evaluate();
        debug!(%position, next_turn = self.turn, outcome = %self.outcome, "Turn applied");

        if cfg!(debug_assertions)
            && let Err(err) = TurnContract::post(&before, self)
        {
            *self = before;
            return Err(err);
        }

        Ok(&self.outcome)
    }

    /// Clears the bombed square and books the bomb fee into the pool.
    ///
    /// Returns the mark that was removed. On error the match is unchanged.
    #[instrument(skip(self), fields(match_id = self.id, bomb = %action))]
    pub fn apply_bomb(&mut self, action: &Bomb, fee: Amount) -> Result<Cell, EngineError> {
        BombContract::pre(self, action)?;
        let before = self.clone();

        let position = action.position().ok_or(EngineError::OutOfBounds(*action.square()))?;
        let pool = self.pool.checked_add(fee).ok_or(EngineError::Overflow)?;
        let removed = self
            .board
            .clear(position)
            .ok_or(EngineError::SquareEmpty(position))?;
        self.pool = pool;
        self.bombs_remaining -= 1;
        self.items_used += 1;
        debug!(
            %position,
            bombs_remaining = self.bombs_remaining,
            pool = self.pool,
            "Bomb applied"
        );

        if cfg!(debug_assertions)
            && let Err(err) = BombContract::post(&before, self)
        {
            *self = before;
            return Err(err);
        }

        Ok(removed)
    }

    /// Ends a live match as a draw regardless of the board.
    #[instrument(skip(self), fields(match_id = self.id))]
    pub fn force_draw(&mut self) -> Result<(), EngineError> {
        if !self.is_live() {
            return Err(EngineError::MatchOver);
        }
        self.outcome = Outcome::Draw;
        info!("Match forced to a draw");
        Ok(())
    }

    /// Records that `seat` took its settlement.
    pub fn mark_claimed(&mut self, seat: PlayerNumber) {
        self.claimed[seat.index()] = true;
    }

    /// Records that the creator cut left custody.
    pub fn mark_fees_paid(&mut self) {
        self.fees_paid = true;
    }

    /// Records the award holder.
    pub fn set_nft_owner(&mut self, owner: Option<Principal>) {
        self.nft_owner = owner;
    }

    #[cfg(test)]
    pub(crate) fn with_counters(mut self, turn: u32, bombs_remaining: u8) -> Self {
        self.turn = turn;
        self.bombs_remaining = bombs_remaining;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_claimed(mut self, seat: PlayerNumber) -> Self {
        self.claimed[seat.index()] = true;
        self
    }

    fn evaluate(&self) -> Outcome {
        if let Some(seat) = rules::check_winner(&self.board) {
            Outcome::Won(self.player(seat).clone())
        } else if rules::is_draw(&self.board) {
            Outcome::Draw
        } else {
            Outcome::Pending
        }
    }
}
