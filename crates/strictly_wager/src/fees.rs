//! Fee arithmetic for the settlement ledger.
//!
//! All splits truncate toward zero and hand the truncation remainder to a
//! named recipient, so every split sums exactly to its input.

use crate::config::{Creator, FeeSchedule};
use crate::token::Transfer;
use crate::types::{Amount, Principal};
use derive_getters::Getters;
use serde::Serialize;
use tracing::instrument;

/// `floor(amount * percent / 100)` without intermediate overflow.
pub fn percent_of(amount: Amount, percent: u8) -> Amount {
    let scaled = u128::from(amount) * u128::from(percent) / 100;
    Amount::try_from(scaled).unwrap_or(Amount::MAX)
}

/// How a pool divides between creators and the prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
pub struct PoolSplit {
    /// Withheld for creators.
    creator_cut: Amount,
    /// Paid to the winner (or shared on a draw).
    prize: Amount,
}

impl PoolSplit {
    /// Splits `pool` by the schedule's creator percent.
    #[instrument(skip(schedule))]
    pub fn of(pool: Amount, schedule: &FeeSchedule) -> Self {
        let creator_cut = percent_of(pool, *schedule.creator_percent()).min(pool);
        Self {
            creator_cut,
            prize: pool - creator_cut,
        }
    }
}

/// Amounts owed when a drawn match settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Getters)]
pub struct DrawSplit {
    /// Paid to each of the two players.
    per_player: Amount,
    /// Creator cut plus the odd unit of an uneven prize.
    creators: Amount,
}

impl DrawSplit {
    /// Splits `pool` for a draw.
    #[instrument(skip(schedule))]
    pub fn of(pool: Amount, schedule: &FeeSchedule) -> Self {
        let split = PoolSplit::of(pool, schedule);
        let per_player = split.prize / 2;
        Self {
            per_player,
            creators: pool - per_player * 2,
        }
    }
}

/// Divides `cut` among creators by their percent; the first creator absorbs
/// the truncation remainder. Zero-amount legs are dropped.
///
/// The legs never sum past `cut`, even when the shares exceed 100.
#[instrument(skip(creators))]
pub fn creator_legs(cut: Amount, creators: &[Creator]) -> Vec<Transfer> {
    let Some((first, rest)) = creators.split_first() else {
        return Vec::new();
    };

    let mut remaining = cut;
    let rest_legs: Vec<Transfer> = rest
        .iter()
        .map(|c| {
            let amount = percent_of(cut, *c.percent()).min(remaining);
            remaining -= amount;
            Transfer::new(c.address().clone(), amount)
        })
        .collect();
    let first_leg = Transfer::new(first.address().clone(), remaining);

    std::iter::once(first_leg)
        .chain(rest_legs)
        .filter(|leg| *leg.amount() > 0)
        .collect()
}

/// Builds the payout batch for one claimant, adding creator legs when the
/// match has not paid its creators yet.
pub fn payout_batch(
    claimant: &Principal,
    amount: Amount,
    creator_total: Option<Amount>,
    schedule: &FeeSchedule,
) -> Vec<Transfer> {
    let mut legs = Vec::new();
    if amount > 0 {
        legs.push(Transfer::new(claimant.clone(), amount));
    }
    if let Some(total) = creator_total {
        legs.extend(creator_legs(total, schedule.creators()));
    }
    legs
}
