//! Token capability used for stake custody and payouts.
//!
//! The engine never owns balances itself. It asks a [`TokenLedger`] to move
//! funds and only commits its own state once the ledger has accepted the
//! whole batch.

use crate::types::{Amount, Currency, Principal};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// One leg of a batch transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Transfer {
    /// Recipient.
    to: Principal,
    /// Amount in base units.
    amount: Amount,
}

/// Failure reported by a token capability.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TokenError {
    /// Sender cannot cover the batch.
    #[display("{} has {} but needs {}", owner, available, needed)]
    InsufficientBalance {
        /// Account being debited.
        owner: Principal,
        /// Total the batch needs.
        needed: Amount,
        /// Current balance.
        available: Amount,
    },
    /// Amount arithmetic overflowed.
    #[display("Token amount overflow")]
    Overflow,
    /// The ledger refused for its own reasons.
    #[display("Transfer rejected: {}", reason)]
    Rejected {
        /// Reason given by the ledger.
        reason: String,
    },
}

/// Fungible token interface (mint/transfer/balance of the external ledger).
pub trait TokenLedger: std::fmt::Debug + Send {
    /// Ticker of the token.
    fn symbol(&self) -> &str;

    /// Current balance of `owner`.
    fn balance_of(&self, owner: &Principal) -> Amount;

    /// Moves every leg out of `from`.
    ///
    /// Implementations apply either all legs or none of them.
    fn transfer(&mut self, from: &Principal, legs: &[Transfer]) -> Result<(), TokenError>;
}

/// Sum of a batch, or `None` on overflow.
pub fn batch_total(legs: &[Transfer]) -> Option<Amount> {
    legs.iter()
        .try_fold(0 as Amount, |acc, leg| acc.checked_add(leg.amount))
}

/// In-process ledger holding balances in a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    symbol: String,
    balances: HashMap<Principal, Amount>,
}

impl InMemoryLedger {
    /// Creates an empty ledger for the given ticker.
    #[instrument(skip(symbol), fields(symbol = %symbol.as_ref()))]
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self {
            symbol: symbol.as_ref().to_string(),
            balances: HashMap::new(),
        }
    }

    /// Credits `amount` out of thin air (the test faucet).
    #[instrument(skip(self), fields(symbol = %self.symbol))]
    pub fn mint(&mut self, to: &Principal, amount: Amount) -> Result<Amount, TokenError> {
        let balance = self.balances.entry(to.clone()).or_default();
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        info!(to = %to, amount, balance = *balance, "Minted tokens");
        Ok(*balance)
    }
}

impl TokenLedger for InMemoryLedger {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, owner: &Principal) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    #[instrument(skip(self, legs), fields(symbol = %self.symbol, legs = legs.len()))]
    fn transfer(&mut self, from: &Principal, legs: &[Transfer]) -> Result<(), TokenError> {
        let needed = batch_total(legs).ok_or(TokenError::Overflow)?;
        let available = self.balance_of(from);
        if available < needed {
            warn!(from = %from, needed, available, "Insufficient balance");
            return Err(TokenError::InsufficientBalance {
                owner: from.clone(),
                needed,
                available,
            });
        }

        // Validate every credit before touching any balance.
        for leg in legs {
            if leg.to != *from {
                self.balance_of(&leg.to)
                    .checked_add(leg.amount)
                    .ok_or(TokenError::Overflow)?;
            }
        }

        self.balances.insert(from.clone(), available - needed);
        for leg in legs {
            let balance = self.balances.entry(leg.to.clone()).or_default();
            *balance = balance.saturating_add(leg.amount);
            debug!(to = %leg.to, amount = leg.amount, "Credited");
        }
        Ok(())
    }
}

/// The two token capabilities, selected by [`Currency`].
#[derive(Debug, Clone)]
pub struct Treasury<L> {
    native: L,
    wrapped: L,
}

impl<L: TokenLedger> Treasury<L> {
    /// Creates a treasury from the native and wrapped ledgers.
    pub fn new(native: L, wrapped: L) -> Self {
        Self { native, wrapped }
    }

    /// Ledger for the currency.
    pub fn ledger(&self, currency: Currency) -> &L {
        match currency {
            Currency::Native => &self.native,
            Currency::Wrapped => &self.wrapped,
        }
    }

    /// Mutable ledger for the currency.
    pub fn ledger_mut(&mut self, currency: Currency) -> &mut L {
        match currency {
            Currency::Native => &mut self.native,
            Currency::Wrapped => &mut self.wrapped,
        }
    }
}

impl Treasury<InMemoryLedger> {
    /// Empty in-memory ledgers for both currencies.
    pub fn in_memory() -> Self {
        Self::new(InMemoryLedger::new("STX"), InMemoryLedger::new("sBTC"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    fn bob() -> Principal {
        Principal::new("bob")
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut ledger = InMemoryLedger::new("STX");
        ledger.mint(&alice(), 100).unwrap();
        ledger
            .transfer(&alice(), &[Transfer::new(bob(), 40)])
            .unwrap();
        assert_eq!(ledger.balance_of(&alice()), 60);
        assert_eq!(ledger.balance_of(&bob()), 40);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut ledger = InMemoryLedger::new("STX");
        ledger.mint(&alice(), 100).unwrap();
        let carol = Principal::new("carol");
        let result = ledger.transfer(
            &alice(),
            &[Transfer::new(bob(), 60), Transfer::new(carol.clone(), 60)],
        );
        assert!(matches!(
            result,
            Err(TokenError::InsufficientBalance { needed: 120, available: 100, .. })
        ));
        assert_eq!(ledger.balance_of(&alice()), 100);
        assert_eq!(ledger.balance_of(&bob()), 0);
        assert_eq!(ledger.balance_of(&carol), 0);
    }

    #[test]
    fn test_transfer_conserves_supply() {
        let mut ledger = InMemoryLedger::new("sBTC");
        ledger.mint(&alice(), 1_000).unwrap();
        ledger.mint(&bob(), 500).unwrap();
        ledger
            .transfer(&alice(), &[Transfer::new(bob(), 250), Transfer::new(alice(), 10)])
            .unwrap();
        assert_eq!(ledger.balance_of(&alice()) + ledger.balance_of(&bob()), 1_500);
        assert_eq!(ledger.balance_of(&alice()), 750);
    }

    #[test]
    fn test_treasury_selects_by_currency() {
        let mut treasury = Treasury::in_memory();
        treasury
            .ledger_mut(Currency::Wrapped)
            .mint(&alice(), 7)
            .unwrap();
        assert_eq!(treasury.ledger(Currency::Wrapped).balance_of(&alice()), 7);
        assert_eq!(treasury.ledger(Currency::Native).balance_of(&alice()), 0);
        assert_eq!(treasury.ledger(Currency::Native).symbol(), "STX");
    }
}
