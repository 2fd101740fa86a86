//! Award capability: one trophy per won match.

use crate::types::{MatchId, Principal};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Failure reported by the award registry.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AwardError {
    /// An award for the match already exists.
    #[display("Award for match {} already minted", match_id)]
    AlreadyMinted {
        /// Match the award belongs to.
        match_id: MatchId,
    },
    /// No award exists for the match.
    #[display("No award for match {}", match_id)]
    NotMinted {
        /// Match that was looked up.
        match_id: MatchId,
    },
    /// The award is held by someone else.
    #[display("{} does not hold the award for match {}", caller, match_id)]
    NotHolder {
        /// Match the award belongs to.
        match_id: MatchId,
        /// Principal that tried to act on it.
        caller: Principal,
    },
}

/// Non-fungible award registry keyed by match id.
pub trait AwardRegistry: std::fmt::Debug + Send {
    /// Mints the award for `match_id` to `owner`.
    fn mint(&mut self, match_id: MatchId, owner: &Principal) -> Result<(), AwardError>;

    /// Burns the award for `match_id`; only its holder may burn it.
    fn burn(&mut self, match_id: MatchId, holder: &Principal) -> Result<(), AwardError>;

    /// Current holder of the award for `match_id`.
    fn owner_of(&self, match_id: MatchId) -> Option<Principal>;
}

/// Registry kept in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAwards {
    holders: BTreeMap<MatchId, Principal>,
}

impl InMemoryAwards {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AwardRegistry for InMemoryAwards {
    #[instrument(skip(self))]
    fn mint(&mut self, match_id: MatchId, owner: &Principal) -> Result<(), AwardError> {
        if self.holders.contains_key(&match_id) {
            warn!(match_id, "Award already minted");
            return Err(AwardError::AlreadyMinted { match_id });
        }
        self.holders.insert(match_id, owner.clone());
        info!(match_id, owner = %owner, "Award minted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn burn(&mut self, match_id: MatchId, holder: &Principal) -> Result<(), AwardError> {
        match self.holders.get(&match_id) {
            None => Err(AwardError::NotMinted { match_id }),
            Some(owner) if owner != holder => Err(AwardError::NotHolder {
                match_id,
                caller: holder.clone(),
            }),
            Some(_) => {
                self.holders.remove(&match_id);
                info!(match_id, holder = %holder, "Award burned");
                Ok(())
            }
        }
    }

    fn owner_of(&self, match_id: MatchId) -> Option<Principal> {
        self.holders.get(&match_id).cloned()
    }
}
