//! Ledger configuration.

use crate::domain::amount::Balance;
use crate::domain::identity::Identity;
use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

/// Tunables of the ledger, loadable from a JSON file.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SuretyConfig {
    /// Owner of the storage layer: may pause the ledger and authorize callers.
    pub owner: Identity,
    /// Identity the business-logic layer commits under.
    pub app_identity: Identity,
    /// Airline registered when the ledger is first created.
    pub genesis_airline: Option<Identity>,
    pub genesis_airline_name: String,
    /// Cumulative funding an airline must supply before it may act.
    pub funding_threshold: Balance,
    /// Payout per unit of premium on an airline-caused delay.
    pub payout_multiplier: Decimal,
    /// Below this many registered airlines, registration needs no votes.
    pub bootstrap_airline_limit: usize,
    /// Largest premium accepted per policy; `None` lifts the cap.
    pub max_premium: Option<Balance>,
    pub grant_default_balance_on_registration: bool,
    pub default_passenger_balance: Balance,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            owner: Identity::new("owner"),
            app_identity: Identity::new("app"),
            genesis_airline: None,
            genesis_airline_name: "Genesis Airline".to_string(),
            funding_threshold: Balance::new(dec!(10)),
            payout_multiplier: dec!(1.5),
            bootstrap_airline_limit: 4,
            max_premium: Some(Balance::new(dec!(1))),
            grant_default_balance_on_registration: false,
            default_passenger_balance: Balance::new(dec!(5)),
        }
    }
}

impl SuretyConfig {
    /// Loads a JSON config file, filling unspecified keys with defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
