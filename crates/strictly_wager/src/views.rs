//! Read-only projections of engine state.

use crate::award::AwardRegistry;
use crate::board::Board;
use crate::config::Creator;
use crate::engine::MatchEngine;
use crate::error::EngineError;
use crate::fees::{PoolSplit, percent_of};
use crate::game::Match;
use crate::outcome::Outcome;
use crate::token::TokenLedger;
use crate::types::{Amount, Currency, MatchId, PlayerNumber, Principal};
use derive_getters::Getters;
use serde::Serialize;
use tracing::instrument;

/// Fee split of a single stake in the preferred currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct FeeInfo {
    /// Currency the figures are denominated in.
    currency: Currency,
    /// Percent withheld for creators.
    creator_percent: u8,
    /// Creator share of one stake.
    creator_cut: Amount,
    /// Prize share of one stake.
    match_cut: Amount,
    /// Creators sharing the cut.
    creators: Vec<Creator>,
}

/// Snapshot of the current match (or of the lobby when none has started).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct GameState {
    /// Most recently started match.
    current_match_id: Option<MatchId>,
    /// Whether that match still accepts turns.
    match_in_progress: bool,
    /// Principal expected to move, while in progress.
    active_player: Option<Principal>,
    /// Next expected turn number.
    turn_number: u32,
    /// Current board.
    board: Board,
    /// Decision state of the current match.
    outcome: Outcome,
    /// Filled lobby seats.
    lobby_players: usize,
}

/// One surviving mark, in play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct MoveRecord {
    /// Square index.
    square: u8,
    /// Turn that placed the mark.
    turn: u32,
    /// Seat that placed the mark.
    player_number: PlayerNumber,
    /// Principal that placed the mark.
    player: Principal,
}

/// Outcome and surviving marks of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct MatchHistory {
    /// Match id.
    match_id: MatchId,
    /// Seat one then seat two.
    players: [Principal; 2],
    /// Decision state.
    winner: Outcome,
    /// Marks still on the board, ordered by turn.
    moves: Vec<MoveRecord>,
    /// Bombs used.
    items_used: u8,
}

/// Bomb counters of the current match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
pub struct BombStatus {
    /// Bombs left to either seat.
    bombs_remaining: u8,
    /// Bombs a match starts with.
    bomb_cap: u8,
    /// Bombs used so far.
    items_used: u8,
    /// Price of one bomb.
    bomb_cost: Amount,
}

impl<L: TokenLedger, A: AwardRegistry> MatchEngine<L, A> {
    /// Per-stake fee split in the preferred currency.
    #[instrument(skip(self))]
    pub fn fee_info(&self) -> FeeInfo {
        let currency = *self.config.preferred_currency();
        let split = PoolSplit::of(self.config.buy_in().for_currency(currency), self.config.fees());
        FeeInfo {
            currency,
            creator_percent: *self.config.fees().creator_percent(),
            creator_cut: *split.creator_cut(),
            match_cut: *split.prize(),
            creators: self.config.fees().creators().clone(),
        }
    }

    /// Current match state, or an empty board while the lobby fills.
    #[instrument(skip(self))]
    pub fn current_game_state(&self) -> GameState {
        let lobby_players = self.lobby.player_count();
        match self.current.and_then(|id| self.matches.get(&id)) {
            Some(game) => GameState {
                current_match_id: Some(*game.id()),
                match_in_progress: game.is_live(),
                active_player: game
                    .is_live()
                    .then(|| game.player(*game.active_player()).clone()),
                turn_number: *game.turn(),
                board: game.board().clone(),
                outcome: game.outcome().clone(),
                lobby_players,
            },
            None => GameState {
                current_match_id: None,
                match_in_progress: false,
                active_player: None,
                turn_number: 0,
                board: Board::new(),
                outcome: Outcome::Pending,
                lobby_players,
            },
        }
    }

    /// Outcome and surviving marks of a match.
    #[instrument(skip(self))]
    pub fn match_history(&self, match_id: MatchId) -> Result<MatchHistory, EngineError> {
        let game = self.stored_match(match_id)?;
        let mut moves: Vec<MoveRecord> = game
            .board()
            .squares()
            .iter()
            .zip(0u8..)
            .filter_map(|(cell, square)| {
                cell.as_ref().map(|cell| MoveRecord {
                    square,
                    turn: *cell.turn(),
                    player_number: *cell.player_number(),
                    player: cell.player().clone(),
                })
            })
            .collect();
        moves.sort_by_key(|record| record.turn);
        Ok(MatchHistory {
            match_id,
            players: game.players().clone(),
            winner: game.outcome().clone(),
            moves,
            items_used: *game.items_used(),
        })
    }

    /// Decision state of a match.
    #[instrument(skip(self))]
    pub fn match_winner(&self, match_id: MatchId) -> Result<Outcome, EngineError> {
        Ok(self.stored_match(match_id)?.outcome().clone())
    }

    /// Board of a match.
    #[instrument(skip(self))]
    pub fn match_data(&self, match_id: MatchId) -> Result<Board, EngineError> {
        Ok(self.stored_match(match_id)?.board().clone())
    }

    /// Full record of a match.
    pub fn match_record(&self, match_id: MatchId) -> Result<&Match, EngineError> {
        self.stored_match(match_id)
    }

    /// Bomb counters of the running match, or of a fresh one if none runs.
    #[instrument(skip(self))]
    pub fn bomb_status(&self) -> BombStatus {
        let percent = *self.config.bomb_cost_percent();
        match self.running_match() {
            Some(game) => BombStatus {
                bombs_remaining: *game.bombs_remaining(),
                bomb_cap: *game.bomb_cap(),
                items_used: *game.items_used(),
                bomb_cost: percent_of(*game.stake(), percent),
            },
            None => {
                let currency = self
                    .lobby
                    .currency()
                    .unwrap_or(*self.config.preferred_currency());
                BombStatus {
                    bombs_remaining: *self.config.bomb_cap(),
                    bomb_cap: *self.config.bomb_cap(),
                    items_used: 0,
                    bomb_cost: percent_of(self.config.buy_in().for_currency(currency), percent),
                }
            }
        }
    }

    /// Filled lobby seats.
    pub fn player_count(&self) -> usize {
        self.lobby.player_count()
    }

    /// Prize portion of the current pot: the running match's pool, or the
    /// lobby's stakes before a match starts.
    #[instrument(skip(self))]
    pub fn match_balance(&self) -> Result<Amount, EngineError> {
        let pot = match self.running_match() {
            Some(game) => *game.pool(),
            None => self.lobby.pot()?,
        };
        Ok(*PoolSplit::of(pot, self.config.fees()).prize())
    }

    /// Creator share of one stake in the preferred currency.
    pub fn creator_cut(&self) -> Amount {
        *self.fee_info().creator_cut()
    }

    /// Token balance of `owner`.
    pub fn balance_of(&self, currency: Currency, owner: &Principal) -> Amount {
        self.treasury.ledger(currency).balance_of(owner)
    }
}
