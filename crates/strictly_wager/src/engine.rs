//! The match engine: registration, play and settlement over an explicit store.
//!
//! Every public action either applies completely or returns one
//! [`EngineError`] and leaves the engine untouched. Actions that touch a
//! match work on a copy and commit it only after the token and award
//! capabilities have accepted their part.

use crate::action::{Bomb, Turn};
use crate::award::{AwardRegistry, InMemoryAwards};
use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;
use crate::fees::{DrawSplit, PoolSplit, payout_batch, percent_of};
use crate::game::Match;
use crate::lobby::{Lobby, Registration};
use crate::outcome::Outcome;
use crate::token::{InMemoryLedger, TokenLedger, Transfer, Treasury};
use crate::types::{Amount, Currency, MatchId, Principal};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Owns the lobby, every match record, and the capabilities that move value.
#[derive(Debug)]
pub struct MatchEngine<L = InMemoryLedger, A = InMemoryAwards> {
    pub(crate) config: EngineConfig,
    pub(crate) treasury: Treasury<L>,
    pub(crate) awards: A,
    pub(crate) lobby: Lobby,
    pub(crate) matches: BTreeMap<MatchId, Match>,
    pub(crate) current: Option<MatchId>,
    last_id: MatchId,
}

impl MatchEngine<InMemoryLedger, InMemoryAwards> {
    /// Engine backed by in-process ledgers and award registry.
    pub fn in_memory(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(config, Treasury::in_memory(), InMemoryAwards::new())
    }
}

impl<L: TokenLedger, A: AwardRegistry> MatchEngine<L, A> {
    /// Creates an engine with an empty lobby and no matches.
    ///
    /// Fails when `config` does not pass [`EngineConfig::validate`].
    #[instrument(skip_all, fields(admin = %config.admin().principal()))]
    pub fn new(
        config: EngineConfig,
        treasury: Treasury<L>,
        awards: A,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!("Creating match engine");
        Ok(Self {
            config,
            treasury,
            awards,
            lobby: Lobby::new(),
            matches: BTreeMap::new(),
            current: None,
            last_id: 0,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Token ledgers.
    pub fn treasury(&self) -> &Treasury<L> {
        &self.treasury
    }

    /// Mutable token ledgers, for funding accounts outside the engine.
    pub fn treasury_mut(&mut self) -> &mut Treasury<L> {
        &mut self.treasury
    }

    /// Award registry.
    pub fn awards(&self) -> &A {
        &self.awards
    }

    /// Registration slots.
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Most recently started match, finished or not.
    pub fn current_match_id(&self) -> Option<MatchId> {
        self.current
    }

    /// The current match while it still accepts turns.
    pub fn running_match(&self) -> Option<&Match> {
        self.current
            .and_then(|id| self.matches.get(&id))
            .filter(|game| game.is_live())
    }

    // ─────────────────────────────────────────────────────────────
    //  Registration
    // ─────────────────────────────────────────────────────────────

    /// Pays the stake into custody and takes a lobby seat.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn buy_in(
        &mut self,
        caller: &Principal,
        amount: Amount,
        currency: Currency,
    ) -> Result<bool, EngineError> {
        self.lobby.check_admission(caller)?;

        let accepted = self
            .lobby
            .currency()
            .unwrap_or(*self.config.preferred_currency());
        if currency != accepted {
            warn!(offered = %currency, %accepted, "Currency not accepted");
            return Err(EngineError::CurrencyNotAccepted {
                offered: currency,
                accepted,
            });
        }

        let expected = self.config.buy_in().for_currency(currency);
        if amount != expected {
            warn!(expected, amount, "Incorrect buy-in");
            return Err(EngineError::IncorrectBuyIn {
                expected,
                actual: amount,
            });
        }

        let custody = self.config.custody().clone();
        self.treasury
            .ledger_mut(currency)
            .transfer(caller, &[Transfer::new(custody, amount)])?;
        let players = self
            .lobby
            .admit(Registration::new(caller.clone(), currency, amount))?;
        info!(players, %currency, amount, "Buy-in accepted");
        Ok(true)
    }

    /// Selects the currency the next lobby accepts. Admin only.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn set_preferred_currency(
        &mut self,
        caller: &Principal,
        currency: Currency,
    ) -> Result<Currency, EngineError> {
        self.config.admin().authorize(caller)?;
        self.config.set_preferred_currency(currency);
        info!(%currency, "Preferred currency changed");
        Ok(currency)
    }

    // ─────────────────────────────────────────────────────────────
    //  Start
    // ─────────────────────────────────────────────────────────────

    /// Opens a match for the two registered players and returns its id.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn start_match(&mut self, caller: &Principal) -> Result<MatchId, EngineError> {
        let Some(players) = self.lobby.seated_pair() else {
            warn!(players = self.lobby.player_count(), "Not enough players");
            return Err(EngineError::NotEnoughPlayers);
        };
        if let Some(running) = self.lobby.locked_to() {
            warn!(running, "Match already in progress");
            return Err(EngineError::MatchInProgress(running));
        }
        if !self.config.admin().is(caller) && !self.lobby.contains(caller) {
            warn!("Start refused for outsider");
            return Err(EngineError::Unauthorized);
        }

        let currency = self
            .lobby
            .currency()
            .ok_or(EngineError::NotEnoughPlayers)?;
        let stake = self.config.buy_in().for_currency(currency);
        let pool = self.lobby.pot()?;
        let id = self.last_id.checked_add(1).ok_or(EngineError::Overflow)?;

        let game = Match::start(id, players, currency, stake, pool, *self.config.bomb_cap());
        self.matches.insert(id, game);
        self.last_id = id;
        self.current = Some(id);
        self.lobby.lock(id);
        info!(match_id = id, pool, "Match opened");
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────────
    //  Play
    // ─────────────────────────────────────────────────────────────

    /// Places a mark in the current match. Returns `true` only for the
    /// winning move.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn process_turn(
        &mut self,
        caller: &Principal,
        turn_number: u32,
        player_number: u8,
        square: u8,
    ) -> Result<bool, EngineError> {
        let mut game = self.current_match()?.clone();
        let turn = Turn::new(caller.clone(), turn_number, player_number, square);
        let outcome = game.apply_turn(&turn)?.clone();

        match &outcome {
            Outcome::Won(winner) => {
                self.awards.mint(*game.id(), winner)?;
                game.set_nft_owner(Some(winner.clone()));
                info!(match_id = game.id(), winner = %winner, "Match won");
            }
            Outcome::Draw => info!(match_id = game.id(), "Match drawn"),
            Outcome::Pending => debug!(next_turn = game.turn(), "Turn accepted"),
        }

        self.commit(game);
        Ok(outcome.winner().is_some())
    }

    /// Clears an occupied square in the current match, charging the bomb fee.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn use_bomb(&mut self, caller: &Principal, square: u8) -> Result<bool, EngineError> {
        let mut game = self.current_match()?.clone();
        let fee = percent_of(*game.stake(), *self.config.bomb_cost_percent());
        let removed = game.apply_bomb(&Bomb::new(caller.clone(), square), fee)?;

        if fee > 0 {
            let custody = self.config.custody().clone();
            self.treasury
                .ledger_mut(*game.currency())
                .transfer(caller, &[Transfer::new(custody, fee)])?;
        }

        info!(
            match_id = game.id(),
            square,
            removed = %removed.player(),
            fee,
            bombs_remaining = game.bombs_remaining(),
            "Bomb used"
        );
        self.commit(game);
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────
    //  Settlement
    // ─────────────────────────────────────────────────────────────

    /// Pays the prize of a won match to its winner, once.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn claim(&mut self, caller: &Principal, match_id: MatchId) -> Result<bool, EngineError> {
        let mut game = self.stored_match(match_id)?.clone();
        let seat = match game.outcome() {
            Outcome::Won(winner) if winner == caller => game.player_number_of(caller),
            _ => None,
        };
        let Some(seat) = seat.filter(|seat| !game.has_claimed(*seat)) else {
            warn!(match_id, outcome = %game.outcome(), "Claim refused");
            return Err(EngineError::Unauthorized);
        };

        let split = PoolSplit::of(*game.pool(), self.config.fees());
        let creators = (!game.fees_paid()).then_some(*split.creator_cut());
        self.pay_out(&game, caller, *split.prize(), creators)?;

        game.mark_claimed(seat);
        if creators.is_some() {
            game.mark_fees_paid();
        }
        info!(match_id, prize = split.prize(), "Prize claimed");
        self.commit(game);
        Ok(true)
    }

    /// Pays a participant's share of a drawn match, once per seat.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn claim_draw(
        &mut self,
        caller: &Principal,
        match_id: MatchId,
    ) -> Result<bool, EngineError> {
        let mut game = self.stored_match(match_id)?.clone();
        let seat = game
            .player_number_of(caller)
            .filter(|seat| game.outcome().is_draw() && !game.has_claimed(*seat));
        let Some(seat) = seat else {
            warn!(match_id, outcome = %game.outcome(), "Draw claim refused");
            return Err(EngineError::Unauthorized);
        };

        let split = DrawSplit::of(*game.pool(), self.config.fees());
        let creators = (!game.fees_paid()).then_some(*split.creators());
        self.pay_out(&game, caller, *split.per_player(), creators)?;

        game.mark_claimed(seat);
        if creators.is_some() {
            game.mark_fees_paid();
        }
        info!(match_id, share = split.per_player(), "Draw share claimed");
        self.commit(game);
        Ok(true)
    }

    /// Ends the running match as a draw and frees the lobby. Admin only.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn admin_force_draw(&mut self, caller: &Principal) -> Result<bool, EngineError> {
        self.config.admin().authorize(caller)?;
        let mut game = self
            .running_match()
            .cloned()
            .ok_or(EngineError::NoActiveMatch)?;
        game.force_draw()?;
        info!(match_id = game.id(), "Admin forced draw");
        self.commit(game);
        Ok(true)
    }

    /// Burns the award of a won match. Only its holder may burn it.
    #[instrument(skip(self), fields(caller = %caller))]
    pub fn burn_award(&mut self, caller: &Principal, match_id: MatchId) -> Result<bool, EngineError> {
        let Some(holder) = self.awards.owner_of(match_id) else {
            warn!(match_id, "No award to burn");
            return Err(EngineError::UnknownMatch(match_id));
        };
        if holder != *caller {
            warn!(match_id, holder = %holder, "Burn refused for non-holder");
            return Err(EngineError::Unauthorized);
        }

        self.awards.burn(match_id, caller)?;
        if let Some(game) = self.matches.get_mut(&match_id) {
            game.set_nft_owner(None);
        }
        info!(match_id, "Award burned");
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    pub(crate) fn stored_match(&self, match_id: MatchId) -> Result<&Match, EngineError> {
        self.matches
            .get(&match_id)
            .ok_or(EngineError::MatchNotFound(match_id))
    }

    fn current_match(&self) -> Result<&Match, EngineError> {
        self.current
            .and_then(|id| self.matches.get(&id))
            .ok_or(EngineError::MatchOver)
    }

    fn pay_out(
        &mut self,
        game: &Match,
        claimant: &Principal,
        amount: Amount,
        creators: Option<Amount>,
    ) -> Result<(), EngineError> {
        let legs = payout_batch(claimant, amount, creators, self.config.fees());
        if legs.is_empty() {
            return Ok(());
        }
        let custody = self.config.custody().clone();
        self.treasury
            .ledger_mut(*game.currency())
            .transfer(&custody, &legs)?;
        debug!(legs = legs.len(), "Payout transferred");
        Ok(())
    }

    fn commit(&mut self, game: Match) {
        if !game.is_live() && self.lobby.locked_to() == Some(*game.id()) {
            self.lobby.reset();
        }
        self.matches.insert(*game.id(), game);
    }
}
