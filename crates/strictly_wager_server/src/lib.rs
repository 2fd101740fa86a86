//! Strictly Wager Server - REST surface for the match engine
//!
//! Every route locks one shared [`MatchEngine`](strictly_wager::MatchEngine)
//! for the duration of the call, so engine actions stay serialized. The
//! caller's identity is read from the `x-principal` header.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod error;
mod state;

// Crate-level exports - Routing
pub use api::{PRINCIPAL_HEADER, router};

// Crate-level exports - Shared state and errors
pub use error::{ApiError, ErrorBody};
pub use state::AppState;
