//! Strictly Wager - a wagered tic-tac-toe match engine
//!
//! Two players buy in with an exact stake, play a turn-checked game with a
//! shared bomb power-up, and settle the pool through one-shot claims.
//!
//! # Architecture
//!
//! - **Lobby**: two paid seats feeding the next match
//! - **Game**: the match record and its contract-checked turn state machine
//! - **Rules**: pure win and draw evaluation over the board
//! - **Engine**: registration, play and settlement over an explicit match store
//! - **Capabilities**: [`TokenLedger`] and [`AwardRegistry`] move value on the engine's behalf
//! - **Views**: serializable read models for clients
//!
//! # Example
//!
//! ```
//! use strictly_wager::{Currency, EngineConfig, MatchEngine, Principal};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = MatchEngine::in_memory(EngineConfig::default())?;
//! let (one, two) = (Principal::new("wallet_1"), Principal::new("wallet_2"));
//! for player in [&one, &two] {
//!     engine.treasury_mut().ledger_mut(Currency::Native).mint(player, 1_000_000)?;
//!     engine.buy_in(player, 1_000_000, Currency::Native)?;
//! }
//! let match_id = engine.start_match(&one)?;
//! assert!(!engine.process_turn(&one, 0, 1, 4)?);
//! assert_eq!(engine.match_balance()?, 1_000_000);
//! # let _ = (match_id, two);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod award;
mod board;
mod config;
mod contracts;
mod engine;
mod error;
mod fees;
mod game;
mod invariants;
mod lobby;
mod outcome;
mod position;
mod rules;
mod token;
mod types;
mod views;

// Crate-level exports - Identity and domain types
pub use types::{Amount, Currency, MatchId, PlayerNumber, Principal};

// Crate-level exports - Board and rules
pub use board::{Board, Cell};
pub use outcome::Outcome;
pub use position::Position;
pub use rules::{LINES, check_winner, is_draw, is_full};

// Crate-level exports - Match state machine
pub use action::{Bomb, Turn};
pub use contracts::{BombContract, Contract, LegalBomb, LegalTurn, TurnContract};
pub use game::Match;
pub use invariants::{Invariant, InvariantSet, InvariantViolation, MatchInvariants};
pub use lobby::{Lobby, Registration};

// Crate-level exports - Engine and settlement
pub use engine::MatchEngine;
pub use fees::{DrawSplit, PoolSplit, creator_legs, percent_of};

// Crate-level exports - Capabilities
pub use award::{AwardError, AwardRegistry, InMemoryAwards};
pub use token::{InMemoryLedger, TokenError, TokenLedger, Transfer, Treasury};

// Crate-level exports - Configuration and errors
pub use config::{Admin, BuyIn, ConfigError, Creator, EngineConfig, FeeSchedule};
pub use error::{EngineError, ErrorCategory};

// Crate-level exports - Read models
pub use views::{BombStatus, FeeInfo, GameState, MatchHistory, MoveRecord};
