//! Player registration ahead of a match.

use crate::error::EngineError;
use crate::types::{Amount, Currency, MatchId, Principal};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A paid seat in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, derive_new::new)]
pub struct Registration {
    /// Who bought in.
    player: Principal,
    /// Currency paid.
    currency: Currency,
    /// Amount paid.
    stake: Amount,
}

/// The two player slots feeding the next match.
///
/// Slots fill in buy-in order. Once a match starts, the lobby stays full and
/// locked to that match until it reaches a terminal outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lobby {
    entries: Vec<Registration>,
    locked_to: Option<MatchId>,
}

impl Lobby {
    /// Both seats.
    pub const CAPACITY: usize = 2;

    /// Creates an empty lobby.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filled seats.
    pub fn player_count(&self) -> usize {
        self.entries.len()
    }

    /// Filled seats in buy-in order.
    pub fn entries(&self) -> &[Registration] {
        &self.entries
    }

    /// Match the seats were handed to, if one is running.
    pub fn locked_to(&self) -> Option<MatchId> {
        self.locked_to
    }

    /// Checks whether `player` already holds a seat.
    pub fn contains(&self, player: &Principal) -> bool {
        self.entries.iter().any(|e| e.player == *player)
    }

    /// Currency of the first seat, which every later seat must match.
    pub fn currency(&self) -> Option<Currency> {
        self.entries.first().map(|e| e.currency)
    }

    /// Total staked by the filled seats.
    pub fn pot(&self) -> Result<Amount, EngineError> {
        self.entries
            .iter()
            .try_fold(0 as Amount, |acc, e| acc.checked_add(e.stake))
            .ok_or(EngineError::Overflow)
    }

    /// Checks that `player` could take a seat, without taking it.
    #[instrument(skip(self))]
    pub fn check_admission(&self, player: &Principal) -> Result<(), EngineError> {
        if self.entries.len() >= Self::CAPACITY || self.locked_to.is_some() {
            warn!(player = %player, "Lobby already has 2 players");
            return Err(EngineError::TooManyPlayers);
        }
        if self.contains(player) {
            warn!(player = %player, "Player already registered");
            return Err(EngineError::Unauthorized);
        }
        Ok(())
    }

    /// Takes a seat. Returns the number of filled seats afterwards.
    #[instrument(skip(self), fields(player = %registration.player))]
    pub fn admit(&mut self, registration: Registration) -> Result<usize, EngineError> {
        self.check_admission(&registration.player)?;
        if let Some(currency) = self.currency()
            && currency != registration.currency
        {
            return Err(EngineError::CurrencyNotAccepted {
                offered: registration.currency,
                accepted: currency,
            });
        }
        self.entries.push(registration);
        info!(players = self.entries.len(), "Player admitted");
        Ok(self.entries.len())
    }

    /// Both seated players in seat order, once the lobby is full.
    pub fn seated_pair(&self) -> Option<[Principal; 2]> {
        match self.entries.as_slice() {
            [one, two] => Some([one.player.clone(), two.player.clone()]),
            _ => None,
        }
    }

    /// Hands the seats to a running match.
    pub fn lock(&mut self, match_id: MatchId) {
        debug!(match_id, "Lobby locked");
        self.locked_to = Some(match_id);
    }

    /// Empties both seats so fresh buy-ins can start the next match.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(previous_players = self.entries.len(), "Lobby reset");
        self.entries.clear();
        self.locked_to = None;
    }
}
