//! Shared server state.

use std::sync::Arc;
use strictly_wager::{Amount, MatchEngine};
use tokio::sync::Mutex;

/// Engine handle shared by every request.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<MatchEngine>>,
    faucet_amount: Amount,
}

impl AppState {
    /// Wraps an engine for sharing across handlers.
    ///
    /// `faucet_amount` is minted when a faucet request names no amount.
    pub fn new(engine: MatchEngine, faucet_amount: Amount) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            faucet_amount,
        }
    }

    /// The shared engine.
    pub fn engine(&self) -> &Arc<Mutex<MatchEngine>> {
        &self.engine
    }

    /// Default faucet grant.
    pub fn faucet_amount(&self) -> Amount {
        self.faucet_amount
    }
}
