//! Core identity types shared by every facet of the engine.

use serde::{Deserialize, Serialize};

/// Sequence number assigned to a match when it starts. The first match is `1`.
pub type MatchId = u64;

/// Token amount in base units of the match currency.
pub type Amount = u64;

/// An account identity.
///
/// Signing and wallet management live outside the engine; a principal is
/// whatever the caller authenticated as.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from any string-like identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Settlement currency of a match.
///
/// Both players of a match pay in the same currency; the engine only uses
/// this to pick the token capability and the stake size.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Currency {
    /// The host chain's native asset.
    Native,
    /// The wrapped bitcoin token.
    Wrapped,
}

/// Which seat a player occupies. Player one always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayerNumber {
    /// First seat (first to buy in, first to move).
    One,
    /// Second seat.
    Two,
}

impl PlayerNumber {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            PlayerNumber::One => PlayerNumber::Two,
            PlayerNumber::Two => PlayerNumber::One,
        }
    }

    /// Zero-based seat index.
    pub fn index(self) -> usize {
        match self {
            PlayerNumber::One => 0,
            PlayerNumber::Two => 1,
        }
    }

    /// Parses the wire value (`1` or `2`).
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(PlayerNumber::One),
            2 => Some(PlayerNumber::Two),
            _ => None,
        }
    }
}

impl From<PlayerNumber> for u8 {
    fn from(number: PlayerNumber) -> Self {
        match number {
            PlayerNumber::One => 1,
            PlayerNumber::Two => 2,
        }
    }
}

impl TryFrom<u8> for PlayerNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| format!("Invalid player number: {}", value))
    }
}

impl std::fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}
