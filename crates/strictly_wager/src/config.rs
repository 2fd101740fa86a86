//! Engine configuration loaded from TOML.

use crate::error::EngineError;
use crate::types::{Amount, Currency, Principal};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A named recipient of part of the creator cut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Creator {
    /// Display name.
    name: String,
    /// Account credited with the share.
    address: Principal,
    /// Share of the creator cut, out of 100.
    percent: u8,
}

/// Process-wide fee split between creators and the match prize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FeeSchedule {
    /// Percent of every pool withheld for creators.
    #[serde(default = "default_creator_percent")]
    creator_percent: u8,
    /// Creators sharing the cut; percents sum to 100.
    #[serde(default = "default_creators")]
    creators: Vec<Creator>,
}

impl FeeSchedule {
    /// Creates a fee schedule.
    pub fn new(creator_percent: u8, creators: Vec<Creator>) -> Self {
        Self {
            creator_percent,
            creators,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(default_creator_percent(), default_creators())
    }
}

/// Exact stake per currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BuyIn {
    /// Stake in native units.
    #[serde(default = "default_native_buy_in")]
    native: Amount,
    /// Stake in wrapped-asset units.
    #[serde(default = "default_wrapped_buy_in")]
    wrapped: Amount,
}

impl BuyIn {
    /// Creates a buy-in table.
    pub fn new(native: Amount, wrapped: Amount) -> Self {
        Self { native, wrapped }
    }

    /// Stake required for the currency.
    pub fn for_currency(&self, currency: Currency) -> Amount {
        match currency {
            Currency::Native => self.native,
            Currency::Wrapped => self.wrapped,
        }
    }
}

impl Default for BuyIn {
    fn default() -> Self {
        Self::new(default_native_buy_in(), default_wrapped_buy_in())
    }
}

/// The privileged role allowed to force draws and switch currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Admin(Principal);

impl Admin {
    /// Grants the admin role to `principal`.
    pub fn new(principal: Principal) -> Self {
        Self(principal)
    }

    /// Principal holding the role.
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Fails with [`EngineError::Unauthorized`] unless `caller` holds the role.
    #[instrument(skip(self))]
    pub fn authorize(&self, caller: &Principal) -> Result<(), EngineError> {
        if *caller == self.0 {
            Ok(())
        } else {
            warn!(caller = %caller, "Admin action refused");
            Err(EngineError::Unauthorized)
        }
    }

    /// True when `caller` holds the role.
    pub fn is(&self, caller: &Principal) -> bool {
        *caller == self.0
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct EngineConfig {
    /// Admin role.
    #[serde(default = "default_admin")]
    admin: Admin,
    /// Account that holds staked funds until settlement.
    #[serde(default = "default_custody")]
    custody: Principal,
    /// Currency accepted by a fresh lobby.
    #[serde(default = "default_currency")]
    preferred_currency: Currency,
    /// Exact stakes.
    #[serde(default)]
    buy_in: BuyIn,
    /// Bombs available per match (shared by both players).
    #[serde(default = "default_bomb_cap")]
    bomb_cap: u8,
    /// Bomb price as a percent of the stake.
    #[serde(default = "default_bomb_cost_percent")]
    bomb_cost_percent: u8,
    /// Fee split.
    #[serde(default)]
    fees: FeeSchedule,
}

#[instrument]
fn default_creator_percent() -> u8 {
    50
}

#[instrument]
fn default_creators() -> Vec<Creator> {
    vec![Creator::new(
        "DeOrganized".to_string(),
        Principal::new("ST3VZSF1PEM2Q1780M589P5DT53W4Y0YK4M3T7923"),
        100,
    )]
}

#[instrument]
fn default_native_buy_in() -> Amount {
    1_000_000
}

#[instrument]
fn default_wrapped_buy_in() -> Amount {
    150_000
}

#[instrument]
fn default_admin() -> Admin {
    Admin::new(Principal::new("deployer"))
}

#[instrument]
fn default_custody() -> Principal {
    Principal::new("strictly_wager.custody")
}

#[instrument]
fn default_currency() -> Currency {
    Currency::Native
}

#[instrument]
fn default_bomb_cap() -> u8 {
    3
}

#[instrument]
fn default_bomb_cost_percent() -> u8 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            custody: default_custody(),
            preferred_currency: default_currency(),
            buy_in: BuyIn::default(),
            bomb_cap: default_bomb_cap(),
            bomb_cost_percent: default_bomb_cost_percent(),
            fees: FeeSchedule::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            admin = %config.admin.principal(),
            currency = %config.preferred_currency,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks the cross-field constraints serde cannot express.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buy_in.native == 0 || self.buy_in.wrapped == 0 {
            return Err(ConfigError::new("Buy-in amounts must be positive"));
        }
        if self.bomb_cost_percent > 100 {
            return Err(ConfigError::new("bomb_cost_percent must be at most 100"));
        }
        if self.fees.creator_percent > 100 {
            return Err(ConfigError::new("creator_percent must be at most 100"));
        }
        if self.fees.creator_percent > 0 {
            let total: u32 = self.fees.creators.iter().map(|c| u32::from(c.percent)).sum();
            if total != 100 {
                return Err(ConfigError::new(format!(
                    "Creator shares must sum to 100, got {}",
                    total
                )));
            }
        }
        if *self.admin.principal() == self.custody {
            return Err(ConfigError::new("Admin and custody must be different principals"));
        }
        Ok(())
    }

    /// Returns a copy with a different admin.
    pub fn with_admin(mut self, admin: Principal) -> Self {
        self.admin = Admin::new(admin);
        self
    }

    /// Returns a copy with a different currency for fresh lobbies.
    pub fn with_preferred_currency(mut self, currency: Currency) -> Self {
        self.preferred_currency = currency;
        self
    }

    /// Returns a copy with a different fee schedule.
    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Returns a copy with different stakes.
    pub fn with_buy_in(mut self, buy_in: BuyIn) -> Self {
        self.buy_in = buy_in;
        self
    }

    pub(crate) fn set_preferred_currency(&mut self, currency: Currency) {
        self.preferred_currency = currency;
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
